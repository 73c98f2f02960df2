use tracing_subscriber::{prelude::*, EnvFilter};

use crate::config::LogFormat;
use crate::settings;

pub(crate) fn default_filter(debug: bool) -> &'static str {
    if debug {
        "ssogate_server=debug,ssogate_client=debug,ssogate_core=debug,tower_http=debug"
    } else {
        "ssogate_server=info,ssogate_client=info,tower_http=info"
    }
}

pub fn init_tracing(settings: &settings::Settings) {
    let debug = settings.config.sso.plugin.debug;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(debug).into());

    let registry = tracing_subscriber::registry().with(filter);
    match settings.config.logging.format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .flatten_event(true)
                    .with_current_span(true),
            )
            .init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .init(),
    }
}

/// Resolves once the process is asked to stop. A listener that cannot be
/// installed never resolves, leaving the other one in charge.
pub(crate) async fn shutdown_signal() {
    let signal = tokio::select! {
        name = interrupt() => name,
        name = terminate() => name,
    };
    tracing::info!(event = "shutdown_signal_received", signal, "Draining connections");
}

async fn interrupt() -> &'static str {
    match tokio::signal::ctrl_c().await {
        Ok(()) => "SIGINT",
        Err(err) => never("SIGINT", &err).await,
    }
}

#[cfg(unix)]
async fn terminate() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
            "SIGTERM"
        }
        Err(err) => never("SIGTERM", &err).await,
    }
}

#[cfg(not(unix))]
async fn terminate() -> &'static str {
    std::future::pending().await
}

async fn never(signal: &'static str, err: &std::io::Error) -> &'static str {
    tracing::warn!(event = "shutdown_signal_failed", signal, error = %err);
    std::future::pending().await
}
