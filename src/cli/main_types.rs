use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "layoutctl")]
#[command(about = "Validate, inspect and export declarative desktop-panel layout scripts")]
#[command(version)]
pub struct Cli {
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true)]
    pub config_dir: Option<String>,

    /// Override the configured gridUnit size for this invocation
    #[arg(long, global = true, env = "LAYOUTCTL_GRID_UNIT")]
    pub grid_unit: Option<f64>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Parse a layout script and report whether it is valid
    Validate {
        /// Layout script file
        file: PathBuf,
    },
    /// Parse a layout script and re-emit it in canonical form
    Export {
        /// Layout script file
        file: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value = "script")]
        format: ExportFormat,
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Show the panel properties and widget sequence of a layout script
    Inspect {
        /// Layout script file
        file: PathBuf,
        /// Emit the descriptor as JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    /// Canonical layout script
    Script,
    /// JSON layout descriptor
    Json,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the current configuration
    Show,
    /// Set a configuration value (grid_unit, small_spacing, large_spacing)
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },
}
