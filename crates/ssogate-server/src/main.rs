#![allow(clippy::pedantic)]
#![allow(clippy::nursery)]
#![deny(clippy::unwrap_used)]

use anyhow::Context;
use ssogate_server::{bootstrap, runtime, settings};

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let run_mode = cli::parse_args();
    if let cli::RunMode::InspectToken { token } = &run_mode {
        println!("{}", cli::inspect_token(token, chrono::Utc::now()));
        return Ok(());
    }

    let settings = settings::Settings::from_env();
    if matches!(run_mode, cli::RunMode::CheckConfig) {
        if let Err(missing) = settings::preflight(&settings) {
            for problem in &missing {
                eprintln!("{problem}");
            }
            std::process::exit(1);
        }
        let yaml = serde_yaml::to_string(&settings.config).context("failed to render config")?;
        println!("addr: {}\n{yaml}", settings.addr);
        return Ok(());
    }

    runtime::init_tracing(&settings);
    if let Err(missing) = settings::preflight(&settings) {
        tracing::error!(
            event = "preflight_failed",
            missing = ?missing,
            "Required configuration missing"
        );
        std::process::exit(1);
    }
    bootstrap::log_startup(&settings);

    let http = bootstrap::build_http_client().context("failed to build http client")?;
    let state = bootstrap::build_state(&settings, http);
    let app = bootstrap::build_app(state);
    bootstrap::serve(&settings, app).await
}
