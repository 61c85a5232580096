mod check;
mod dump;
mod init;

pub use check::*;
use clap::Subcommand;
pub use dump::*;
pub use init::*;
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum ConfigCmd {
    /// Validate configuration and exit
    Check {
        /// Path to the config file
        #[arg(default_value = "fizzylog.yaml")]
        path: PathBuf,

        /// Plain output, without colours
        #[arg(short, long, default_value = "false")]
        plain: bool,

        /// Print violations as JSON
        #[arg(long, conflicts_with = "plain")]
        json: bool,
    },

    /// Print resolved configuration
    Dump {
        #[arg(default_value = "fizzylog.yaml")]
        path: PathBuf,

        /// Output as JSON
        #[arg(long, conflicts_with = "yaml")]
        json: bool,

        /// Output as YAML
        #[arg(long)]
        yaml: bool,
    },

    /// Write a starter config file
    Init {
        #[arg(default_value = "fizzylog.yaml")]
        path: PathBuf,

        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

pub fn run(cmd: ConfigCmd) -> anyhow::Result<()> {
    match cmd {
        ConfigCmd::Check { path, plain, json } => check(path, plain, json),
        ConfigCmd::Dump { path, yaml, .. } => dump(path, yaml),
        ConfigCmd::Init { path, force } => init(path, force),
    }
}
