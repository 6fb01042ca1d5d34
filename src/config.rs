//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};
use clap::Parser;

/// File name of the snapshot inside the data directory
pub const SNAPSHOT_FILE_NAME: &str = "pomodoroData.json";

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "focus-timer")]
#[command(about = "A drift-free focus countdown daemon that survives sleep and restarts")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Snapshot file (defaults to the platform data directory)
    #[arg(long)]
    pub data_file: Option<PathBuf>,

    /// Keep state in memory only
    #[arg(long)]
    pub ephemeral: bool,

    /// Use the runtime interval instead of the dedicated tick thread
    #[arg(long)]
    pub fallback_ticker: bool,

    /// Shell command run when a countdown completes and sound is enabled
    #[arg(long)]
    pub sound_command: Option<String>,

    /// Seconds between checks for a system wake-up
    #[arg(long, default_value = "5")]
    pub resume_check_secs: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Resolve where the snapshot file lives
    pub fn snapshot_path(&self) -> PathBuf {
        match &self.data_file {
            Some(path) => path.clone(),
            None => dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("focus-timer")
                .join(SNAPSHOT_FILE_NAME),
        }
    }

    /// Period of the wake-up recovery check, at least one second
    pub fn resume_check_period(&self) -> Duration {
        Duration::from_secs(self.resume_check_secs.max(1))
    }
}
