use std::io::{self, Write};

use anyhow::{Context, Result, bail};
use clap::{Args, Subcommand};
use rpassword::prompt_password;
use session::SessionService;
use shared::config::Config;

#[derive(Subcommand, Debug)]
pub enum SessionCommand {
    /// Sign in and store the session locally
    Login(LoginArgs),
    /// Forget the stored session
    Logout,
    /// Show who is signed in
    Status,
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email; prompted for when omitted
    #[arg(long, short)]
    pub email: Option<String>,

    /// Read the password from the first line of stdin instead of prompting
    #[arg(long)]
    pub password_stdin: bool,
}

pub async fn run(config: &Config, session: &SessionService, command: &SessionCommand) -> Result<()> {
    match command {
        SessionCommand::Login(args) => login(config, session, args).await,
        SessionCommand::Logout => logout(session),
        SessionCommand::Status => {
            status(config, session);
            Ok(())
        }
    }
}

async fn login(config: &Config, session: &SessionService, args: &LoginArgs) -> Result<()> {
    session.initialize();

    let email = match &args.email {
        Some(email) => email.clone(),
        None => prompt("Email: ")?,
    };
    let password = read_password(args.password_stdin)?;

    let response = session
        .login(&email, &password)
        .await
        .context("login failed")?;

    println!("Logged in as {}", response.data.user.email);
    if !response.message.is_empty() {
        println!("{}", response.message);
    }
    println!(
        "session stored at {}",
        config.resolved_storage_path().display()
    );
    Ok(())
}

fn logout(session: &SessionService) -> Result<()> {
    let state = session.initialize();
    session
        .logout()
        .context("failed to remove the stored session")?;

    match state.user {
        Some(user) => println!("Logged out {}", user.email),
        None => println!("No active session"),
    }
    Ok(())
}

fn status(config: &Config, session: &SessionService) {
    let state = session.initialize();
    match state.user {
        Some(user) if state.is_authenticated => {
            println!("Logged in as {} (id {})", user.email, user.id);
            println!(
                "session stored at {}",
                config.resolved_storage_path().display()
            );
        }
        _ => println!("Not logged in"),
    }
}

pub(crate) fn prompt(message: &str) -> Result<String> {
    print!("{message}");
    io::stdout().flush().ok();
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    let trimmed = input.trim().to_string();
    if trimmed.is_empty() {
        bail!("input must not be empty");
    }
    Ok(trimmed)
}

pub(crate) fn read_password(from_stdin: bool) -> Result<String> {
    if !from_stdin {
        return prompt_password("Password: ").context("failed to read password");
    }

    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("failed to read password from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
