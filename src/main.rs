use clap::Parser;
use element_grounding::cli::commands::{cmd_merge, cmd_scan};
use element_grounding::cli::config::{Cli, Commands, load_config, log_filter};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // RUST_LOG wins over -v
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_filter(cli.verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Scan {
            snapshot,
            format,
            output,
            trace,
        } => {
            cmd_scan(config, &snapshot, &format, output.as_deref(), trace.as_deref())?;
        }
        Commands::Merge {
            snapshot,
            detections,
            format,
            output,
        } => {
            cmd_merge(config, &snapshot, &detections, &format, output.as_deref())?;
        }
    }

    Ok(())
}
