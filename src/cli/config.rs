use clap::{Parser, Subcommand};
use tracing::warn;

use crate::config::GroundingConfig;
use crate::error::GroundingError;

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "element-grounding",
    version,
    about = "Find the visible, actionable elements of a rendered page"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: element-grounding.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a page snapshot and print its interactive elements
    Scan {
        /// Page snapshot JSON produced by the browser driver
        #[arg(long)]
        snapshot: String,

        /// Output format: json or text
        #[arg(long, default_value = "json")]
        format: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Append a JSONL trace event per scan to this file
        #[arg(long)]
        trace: Option<String>,
    },

    /// Scan a snapshot, then merge in detections from another source
    Merge {
        /// Page snapshot JSON produced by the browser driver
        #[arg(long)]
        snapshot: String,

        /// JSON array of element records from an external detector
        #[arg(long)]
        detections: String,

        /// Output format: json or text
        #[arg(long, default_value = "json")]
        format: String,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },
}

// ============================================================================
// Config File Loading
// ============================================================================

pub const DEFAULT_CONFIG_PATH: &str = "element-grounding.yaml";

/// Parse a YAML config file. `Ok(None)` when the file does not exist.
pub fn read_config(path: &str) -> Result<Option<GroundingConfig>, GroundingError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(GroundingError::SnapshotIo {
                path: path.to_string(),
                source: e,
            });
        }
    };

    serde_yaml::from_str(&content)
        .map(Some)
        .map_err(|e| GroundingError::ConfigParse {
            path: path.to_string(),
            source: e,
        })
}

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> GroundingConfig {
    let config_path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    match read_config(config_path) {
        Ok(Some(config)) => config,
        Ok(None) => GroundingConfig::default(),
        Err(e) => {
            warn!(error = %e, "using default configuration");
            GroundingConfig::default()
        }
    }
}

/// Log filter for a `-v` count, unless `RUST_LOG` is set.
pub fn log_filter(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
