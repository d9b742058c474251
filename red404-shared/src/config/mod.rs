pub mod client;

pub use client::{Config, ConfigError, EndpointsConfig};
