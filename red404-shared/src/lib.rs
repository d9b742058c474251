#![cfg_attr(not(test), forbid(unsafe_code))]

//! Wire models and configuration shared by the red404 session library and CLI.

pub mod config;
pub mod models;
