use crate::conf::{ConfigError, ValidationReport, load_config_with_report};
use std::path::PathBuf;

pub fn check(path: PathBuf, plain: bool, json: bool) -> anyhow::Result<()> {
    match load_config_with_report(&path) {
        Ok((cfg, report)) => {
            if json {
                println!("{}", report.render_json()?);
                return Ok(());
            }

            println!("✔ Config loaded successfully");
            println!("✔ tailing {}", cfg.log.path.display());
            println!("✔ {} included paths", cfg.paths.include_exact.len());
            println!("✔ {} aliases", cfg.paths.aliases.len());
            println!(
                "✔ {}s buckets over {}s, flushed every {}s",
                cfg.window.bucket_seconds, cfg.window.lookback_seconds, cfg.ingest.flush_seconds
            );
            println!("✔ storage: {}", cfg.storage.target());
            if report.has_violations() {
                println!();
                print_report(&report, plain);
            }
            Ok(())
        }
        Err(ConfigError::Validation { report }) => {
            if json {
                println!("{}", report.render_json()?);
            } else {
                print_report(&report, plain);
            }
            std::process::exit(1);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    }
}

fn print_report(report: &ValidationReport, plain: bool) {
    if plain {
        eprint!("{}", report.render_plain());
    } else {
        eprint!("{}", report.render_pretty());
    }
}
