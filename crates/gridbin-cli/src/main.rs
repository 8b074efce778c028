use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod json;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    init_logging(cli.verbose)?;
    commands::run_command(cli)
}

/// `RUST_LOG` wins; otherwise `-v` turns on the encoder's debug events.
fn init_logging(verbose: bool) -> Result<()> {
    let default = if verbose {
        "gridbin_binary=debug,gridbin_interop=debug,gridbin=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default))
        .map_err(|e| anyhow::anyhow!("invalid log filter: {e}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
