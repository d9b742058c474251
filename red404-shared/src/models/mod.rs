//! Request and response shapes exchanged with the red404 backend.

pub mod auth;
pub mod errors;
pub mod user;

pub use auth::{
    ApiEnvelope, ApiOutcome, LoginData, LoginRequest, LoginResponse, RegisterRequest,
    RegisterResponse,
};
pub use errors::ErrorResponse;
pub use user::User;
