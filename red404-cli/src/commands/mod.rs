//! Subcommand implementations.

pub mod completion;
pub mod config;
pub mod open;
pub mod register;
pub mod session;
