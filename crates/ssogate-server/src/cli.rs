use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use ssogate_core::token_expiry;

#[derive(Parser)]
#[command(name = "ssogate")]
#[command(about = "SSO gate server")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Validate configuration and print the effective values
    CheckConfig,
    /// Decode an access token and report its expiry
    InspectToken {
        /// Raw bearer token (compact JWT)
        token: String,
    },
}

#[derive(Debug, Clone)]
pub enum RunMode {
    Server,
    CheckConfig,
    InspectToken { token: String },
}

pub fn parse_args() -> RunMode {
    run_mode(Cli::parse())
}

fn run_mode(cli: Cli) -> RunMode {
    match cli.command {
        None => RunMode::Server,
        Some(Command::CheckConfig) => RunMode::CheckConfig,
        Some(Command::InspectToken { token }) => RunMode::InspectToken { token },
    }
}

pub fn inspect_token(token: &str, now: DateTime<Utc>) -> String {
    match token_expiry(token) {
        Ok(expires_at) => {
            let status = if now >= expires_at { "expired" } else { "valid" };
            format!("expires_at: {}\nstatus: {status}", expires_at.to_rfc3339())
        }
        Err(err) => format!("status: expired\nreason: {err}"),
    }
}
