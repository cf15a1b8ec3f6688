//! Namescout command-line shell
//!
//! This is the thin shell that parses arguments, sets up logging and signal
//! handling, and hands off to the scanner.
//! Core business logic lives in the `crates/` directory.

mod cli;

pub use cli::Cli;

use anyhow::Context;
use namescout_core::AppConfig;
use namescout_probe::HttpProber;
use namescout_scanner::ScanOrchestrator;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Initialize tracing subscriber for logging
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,namescout=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}

/// Load the configuration file, then environment overrides, then
/// command-line overrides, and validate the result.
pub fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config =
        AppConfig::load_with_env(cli.config.as_deref()).context("failed to load configuration")?;
    cli.apply(&mut config);
    config.validate().context("invalid configuration")?;
    Ok(config)
}

/// Resolves on SIGINT (Ctrl-C) or, on unix, SIGTERM.
async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Could not listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Could not listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl-C"),
        () = terminate => info!("Received SIGTERM"),
    }
}

/// Cancel `token` when a termination signal arrives.
fn spawn_signal_listener(token: CancellationToken) -> JoinHandle<()> {
    tokio::spawn(async move {
        wait_for_signal().await;
        info!("Shutdown requested, letting in-flight probes finish");
        token.cancel();
    })
}

/// Run one sweep with the given arguments.
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    init_tracing();

    info!("Starting Namescout v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config(&cli)?;
    let prober = Arc::new(HttpProber::new(&config.probe).context("failed to build HTTP client")?);
    let orchestrator = ScanOrchestrator::from_config(&config, prober)?;

    let listener = spawn_signal_listener(orchestrator.shutdown_token());
    let result = orchestrator.run().await;
    listener.abort();

    let summary = result.context("scan failed")?;
    info!(
        "Finished: {} probed, {} available, {} blocked, last checked {}",
        summary.counts.total(),
        summary.counts.available,
        summary.counts.blocked,
        summary
            .last_checked
            .as_ref()
            .map_or_else(|| "nothing".to_string(), ToString::to_string)
    );
    if summary.interrupted {
        info!("Run was interrupted; the next run resumes from the checkpoint");
    }
    if let Ok(json) = serde_json::to_string(&summary) {
        tracing::debug!("Run summary: {}", json);
    }

    Ok(())
}
