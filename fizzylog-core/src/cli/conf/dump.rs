use crate::cli::load_config_reporting;
use serde::Serialize;
use std::io;
use std::path::PathBuf;

pub fn dump(path: PathBuf, yaml: bool) -> anyhow::Result<()> {
    let cfg = load_config_reporting(&path, &mut io::stderr())?;

    if yaml {
        dump_yaml(&cfg)?;
    } else {
        dump_json(&cfg)?;
    }

    Ok(())
}

fn dump_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn dump_yaml<T: Serialize>(value: &T) -> anyhow::Result<()> {
    print!("{}", serde_yaml::to_string(value)?);
    Ok(())
}
