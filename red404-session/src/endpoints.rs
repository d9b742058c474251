//! Login and registration calls against the backend.

use shared::{
    config::EndpointsConfig,
    models::{
        ApiEnvelope, ApiOutcome, LoginData, LoginRequest, LoginResponse, RegisterRequest,
        RegisterResponse,
    },
};
use tracing::{info, instrument, warn};

use crate::{
    error::{ApiError, AuthError},
    http::HttpClient,
};

pub const LOGIN_FALLBACK: &str = "Login failed";
pub const REGISTER_FALLBACK: &str = "sign up failed";

/// Shortest password the sign-in and sign-up forms accept.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Paths of the credential endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthEndpoints {
    pub login: String,
    pub register: String,
}

impl Default for AuthEndpoints {
    fn default() -> Self {
        EndpointsConfig::default().into()
    }
}

impl From<EndpointsConfig> for AuthEndpoints {
    fn from(config: EndpointsConfig) -> Self {
        Self {
            login: config.login,
            register: config.register,
        }
    }
}

/// Check credentials locally before anything goes over the wire.
///
/// # Errors
/// Returns [`AuthError::InvalidCredentials`] naming the first problem.
pub fn validate_credentials(credentials: &LoginRequest) -> Result<(), AuthError> {
    let email = credentials.email.trim();
    if email.is_empty() {
        return Err(AuthError::InvalidCredentials("email is required".into()));
    }
    if !email.contains('@') {
        return Err(AuthError::InvalidCredentials(
            "email must be a valid address".into(),
        ));
    }
    if credentials.password.is_empty() {
        return Err(AuthError::InvalidCredentials("password is required".into()));
    }
    if credentials.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AuthError::InvalidCredentials(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// `POST` the login form.
///
/// # Errors
/// Validation failures, backend rejections (with the backend's message) and
/// transport failures (reported as `"Login failed"`).
#[instrument(skip(client, endpoints, request), fields(email = %request.email))]
pub async fn login_user<C>(
    client: &C,
    endpoints: &AuthEndpoints,
    request: &LoginRequest,
) -> Result<LoginResponse, AuthError>
where
    C: HttpClient,
{
    validate_credentials(request)?;

    let envelope: ApiEnvelope<LoginData> = client
        .post(&endpoints.login, request)
        .await
        .map_err(|err| into_auth_error(err, LOGIN_FALLBACK))?;

    match envelope.into_outcome() {
        ApiOutcome::Ok { data, message } => {
            info!(user_id = %data.user.id, "login accepted");
            Ok(LoginResponse {
                success: true,
                message: message.unwrap_or_default(),
                data,
            })
        }
        ApiOutcome::Err { message } => Err(rejected(message, LOGIN_FALLBACK)),
    }
}

/// `POST` the registration form.
///
/// # Errors
/// Validation failures, backend rejections (with the backend's message) and
/// transport failures (reported as `"sign up failed"`).
#[instrument(skip(client, endpoints, request), fields(email = %request.email))]
pub async fn register_user<C>(
    client: &C,
    endpoints: &AuthEndpoints,
    request: &RegisterRequest,
) -> Result<RegisterResponse, AuthError>
where
    C: HttpClient,
{
    validate_credentials(&request.credentials())?;

    let envelope: RegisterResponse = client
        .post(&endpoints.register, request)
        .await
        .map_err(|err| into_auth_error(err, REGISTER_FALLBACK))?;

    if envelope.success {
        info!("registration accepted");
        Ok(envelope)
    } else {
        Err(rejected(envelope.message, REGISTER_FALLBACK))
    }
}

fn rejected(message: Option<String>, fallback: &'static str) -> AuthError {
    let message = message
        .filter(|message| !message.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string());
    warn!(%message, "credential request declined");
    AuthError::Rejected { message }
}

fn into_auth_error(err: ApiError, fallback: &'static str) -> AuthError {
    match err.backend_message() {
        Some(message) => rejected(Some(message.to_string()), fallback),
        None => {
            warn!(error = %err, "credential request failed");
            AuthError::Request {
                fallback,
                source: err,
            }
        }
    }
}
