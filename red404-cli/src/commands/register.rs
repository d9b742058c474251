use anyhow::{Context, Result};
use clap::Args;
use session::SessionService;
use shared::models::RegisterRequest;

use super::session::read_password;

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Email for the new account
    #[arg(long, short)]
    pub email: String,

    /// Extra profile field sent with the request, as `key=value`; repeatable
    #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
    pub fields: Vec<(String, String)>,

    /// Read the password from the first line of stdin instead of prompting
    #[arg(long)]
    pub password_stdin: bool,
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected KEY=VALUE, got `{raw}`")),
    }
}

/// Create an account. Registration does not sign in.
pub async fn register(session: &SessionService, args: &RegisterArgs) -> Result<()> {
    let password = read_password(args.password_stdin)?;
    let request = args
        .fields
        .iter()
        .fold(RegisterRequest::new(&args.email, password), |request, (key, value)| {
            request.with_field(key, value)
        });

    let response = session
        .register(&request)
        .await
        .context("registration failed")?;

    println!("Registered {}", args.email);
    if let Some(message) = response.message.filter(|message| !message.is_empty()) {
        println!("{message}");
    }
    println!("Run `red404 session login` to sign in.");
    Ok(())
}
