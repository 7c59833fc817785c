//! Callinfo CLI tool
//!
//! Runs the invocation-context conformance scenarios against the native
//! addons and prints environment info.

mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Environment variable holding the log filter
const LOG_ENV: &str = "CALLINFO_LOG";

#[derive(Parser)]
#[command(name = "callinfo")]
#[command(about = "Native invocation-context conformance runner", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging (overrides CALLINFO_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run conformance scenarios
    Check {
        /// Case name pattern to match
        pattern: Option<String>,
        /// Config file (defaults to ./callinfo.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Enable foreign host values
        #[arg(long)]
        host_interop: bool,
        /// Color output: auto, always, never
        #[arg(long, default_value = "auto")]
        color: String,
    },

    /// Show version, effective options and environment
    Info {
        /// Config file (defaults to ./callinfo.toml when present)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    match cli.command {
        Commands::Check {
            pattern,
            config,
            host_interop,
            color,
        } => commands::check::execute(commands::check::CheckArgs {
            pattern,
            config,
            host_interop,
            color,
        }),
        Commands::Info { config } => commands::info::execute(config.as_deref()),
    }
}

fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).or_else(|_| EnvFilter::try_new("warn"))?
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init()?;
    Ok(())
}
