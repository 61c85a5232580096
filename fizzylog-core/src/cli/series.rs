use crate::cli::load_config_reporting;
use crate::conf::types::StorageBackend;
use crate::ingest::IngestStateReader;
use crate::query::QueryService;
use anyhow::{Result, bail};
use std::io;
use std::path::Path;
use std::sync::Arc;

/// Print one series response as JSON.
///
/// Bad override tokens are reported on stderr with exit status 2.
pub fn series(
    config_path: &Path,
    status_ranges: Option<&str>,
    status_exact: Option<&str>,
    at: Option<i64>,
) -> Result<()> {
    let cfg = load_config_reporting(config_path, &mut io::stderr())?;
    if cfg.storage.backend == StorageBackend::Memory {
        bail!("the memory backend can only be queried from inside the running process");
    }

    let service = QueryService::new(Arc::new(cfg), IngestStateReader::detached());
    let result = match at {
        Some(now_utc) => service.series_at(now_utc, status_ranges, status_exact),
        None => service.series(status_ranges, status_exact),
    };

    match result {
        Ok(response) => {
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
        Err(err) if err.is_client_error() => {
            eprintln!("{err}");
            std::process::exit(2);
        }
        Err(err) => Err(err.into()),
    }
}
