use crate::conf::ConfigError;
use anyhow::{Context, Result, bail};
use rust_embed::RustEmbed;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

#[derive(RustEmbed)]
#[folder = "config-templates/"]
pub struct ConfigTemplates;

pub fn init(path: PathBuf, force: bool) -> Result<()> {
    if path.is_dir() {
        bail!("{} is a directory", path.display());
    }
    if path.exists() && !force {
        bail!(
            "config file '{}' already exists (use --force to replace it)",
            path.display()
        );
    }

    write_file(&path, &template("fizzylog.yaml")?)?;

    println!("✔ Wrote starter config to {}", path.display());
    println!();
    println!("Next steps:");
    println!("  edit paths.include_exact and log.path");
    println!("  fizzylog config check {}", path.display());
    println!("  fizzylog run --config {}", path.display());

    Ok(())
}

/// Fetch an embedded config template as UTF-8 text.
pub fn template(name: &str) -> Result<String> {
    let file = ConfigTemplates::get(name)
        .with_context(|| format!("missing embedded config template: {name}"))?;

    let s =
        std::str::from_utf8(file.data.as_ref()).context("config template is not valid UTF-8")?;

    Ok(s.to_owned())
}

fn write_file(path: &Path, contents: &str) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| ConfigError::WriteFile {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, contents.trim_start()).map_err(|source| ConfigError::WriteFile {
        path: path.to_path_buf(),
        source,
    })
}
