use clap::{Parser, Subcommand};
use fizzylog_core::cli;
use fizzylog_core::logging::init_logging;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "fizzylog",
    version,
    about = "fizzylog: per-path request counts from an nginx access log"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Tail the access log and maintain rollups (default)
    Run {
        /// Path to the fizzylog config file
        #[arg(long, default_value = "fizzylog.yaml")]
        config: PathBuf,
    },

    /// Print the current series as JSON
    Series {
        #[arg(long, default_value = "fizzylog.yaml")]
        config: PathBuf,

        /// Comma-separated status ranges, e.g. "2xx,3xx"
        #[arg(long)]
        status_ranges: Option<String>,

        /// Comma-separated exact status codes, e.g. "200,404"
        #[arg(long)]
        status_exact: Option<String>,

        /// Evaluate the window as of this epoch second instead of now
        #[arg(long)]
        at: Option<i64>,
    },

    /// Configuration tooling
    Config {
        #[command(subcommand)]
        cmd: cli::conf::ConfigCmd,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Config { cmd }) => cli::conf::run(cmd),

        Some(Command::Series {
            config,
            status_ranges,
            status_exact,
            at,
        }) => cli::series::series(
            &config,
            status_ranges.as_deref(),
            status_exact.as_deref(),
            at,
        ),

        Some(Command::Run { config }) => {
            init_logging();
            cli::run::run(&config)
        }

        None => {
            init_logging();
            cli::run::run(&PathBuf::from("fizzylog.yaml"))
        }
    }
}
