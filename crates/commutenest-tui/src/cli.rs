//! One-shot account commands run from the command line instead of the TUI.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use tracing::info;

use commutenest_core::{AuthClient, AuthResponse, Config, StoredToken, TokenStore};

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Login,
    OAuthGoogle {
        token: String,
        email: String,
        name: String,
        google_id: String,
    },
    Logout,
}

pub const USAGE: &str = "\
Usage: commutenest [--login | --logout | --oauth-google <token> <email> <name> <google_id>]

Without arguments the terminal interface starts.";

/// Parse arguments after the program name. `None` means start the TUI.
pub fn parse(args: &[String]) -> Result<Option<Command>> {
    let Some(flag) = args.first() else {
        return Ok(None);
    };

    let command = match flag.as_str() {
        "--login" => Command::Login,
        "--logout" => Command::Logout,
        "--oauth-google" => match &args[1..] {
            [token, email, name, google_id] => Command::OAuthGoogle {
                token: token.clone(),
                email: email.clone(),
                name: name.clone(),
                google_id: google_id.clone(),
            },
            _ => bail!("--oauth-google takes four arguments\n\n{}", USAGE),
        },
        other => bail!("Unknown argument: {}\n\n{}", other, USAGE),
    };

    if !matches!(command, Command::OAuthGoogle { .. }) && args.len() > 1 {
        bail!("{} takes no arguments\n\n{}", flag, USAGE);
    }
    Ok(Some(command))
}

fn token_store(config: &Config) -> TokenStore {
    TokenStore::new(config.cache_dir().unwrap_or_else(|_| PathBuf::from("./cache")))
}

pub async fn run(command: Command, mut config: Config) -> Result<()> {
    let tokens = token_store(&config);
    let api = AuthClient::new(&config.api_base_url(), config.request_timeout())?;

    let result = match command {
        Command::Logout => {
            tokens.clear()?;
            println!("Logged out.");
            return Ok(());
        }
        Command::Login => {
            let (email, password) = prompt_credentials(config.default_email())?;
            api.login(&email, &password).await
        }
        Command::OAuthGoogle {
            token,
            email,
            name,
            google_id,
        } => api.google_oauth(&token, &email, &name, &google_id).await,
    };

    let response: AuthResponse = result.map_err(|e| anyhow::anyhow!(e.user_message()))?;
    tokens
        .save(&StoredToken::from_response(&response))
        .context("Failed to store session")?;

    config.last_email = Some(response.user.email.clone());
    config.save().context("Failed to save config")?;

    info!("Signed in from the command line");
    println!("Signed in as {}.", response.user.email);
    Ok(())
}

fn prompt_credentials(default_email: Option<String>) -> Result<(String, String)> {
    match default_email {
        Some(ref email) => print!("Email [{}]: ", email),
        None => print!("Email: "),
    }
    io::stdout().flush()?;

    let mut email = String::new();
    io::stdin().read_line(&mut email)?;
    let email = match email.trim() {
        "" => default_email.unwrap_or_default(),
        typed => typed.to_string(),
    };

    let password = rpassword::prompt_password("Password: ")?;
    if email.is_empty() || password.is_empty() {
        bail!("Email and password are required");
    }
    Ok((email, password))
}
