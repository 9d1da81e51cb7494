use anyhow::{Context, Result};
use clap::Parser;
use stochlab::cli::{Cli, OutputFormat};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Initialize the stderr subscriber: `RUST_LOG` directives, warnings when
/// unset, everything with `--debug`.
fn init_tracing(debug: bool) {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    let filter = if debug {
        filter.add_directive(tracing::Level::TRACE.into())
    } else {
        filter
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = cli.scenario_config()?;
    let report = config
        .run()
        .with_context(|| format!("{} scenario failed", config.scenario.name()))?;

    match cli.format {
        OutputFormat::Text => print!("{}", report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}
