use crate::conf::load_config;
use crate::ingest::{Ingester, ShutdownStatus};
use anyhow::{Context, Result, bail};
use std::path::Path;
use std::sync::{Arc, mpsc};

/// Run the ingester until Ctrl-C or SIGTERM.
pub fn run(config_path: &Path) -> Result<()> {
    let cfg = load_config(config_path)
        .with_context(|| format!("failed to load {}", config_path.display()))?;
    let cfg = Arc::new(cfg);

    let mut handle = Ingester::start(cfg.clone())?;

    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
    ctrlc::set_handler(move || {
        let _ = shutdown_tx.send(());
    })
    .context("failed to install signal handler")?;

    tracing::info!(
        log = %cfg.log.path.display(),
        bucket_seconds = cfg.window.bucket_seconds,
        paths = cfg.paths.include_exact.len(),
        "fizzylog running"
    );

    // Returns on the first signal, or if the handler is ever dropped.
    let _ = shutdown_rx.recv();
    tracing::info!("shutdown requested");

    match handle.stop() {
        ShutdownStatus::Stopped => {
            tracing::info!("ingestion stopped");
            Ok(())
        }
        ShutdownStatus::TimedOut => {
            tracing::warn!("ingestion did not stop within the grace period");
            Ok(())
        }
        ShutdownStatus::Panicked => bail!("ingestion thread panicked"),
    }
}
