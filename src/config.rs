use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};

use crate::model::DEFAULT_HISTORY_CAPACITY;

/// Monitor and control the local Docker engine.
#[derive(Debug, Parser)]
#[command(name = "dockdash", version, about)]
pub struct Cli {
    /// Seconds between refreshes.
    #[arg(long, global = true, default_value_t = 3, env = "DOCKDASH_INTERVAL",
          value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: u64,

    /// Directory for log files in terminal mode (defaults to the system temp dir).
    #[arg(long, global = true, env = "DOCKDASH_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Serve the dashboard JSON API for a browser frontend.
    Serve {
        /// Address to listen on.
        #[arg(long, default_value = "127.0.0.1:7878", env = "DOCKDASH_BIND")]
        bind: SocketAddr,

        /// Number of aggregate samples kept for the history charts.
        #[arg(long, default_value_t = DEFAULT_HISTORY_CAPACITY)]
        history: usize,
    },
}

impl Cli {
    pub fn tick_rate(&self) -> Duration {
        Duration::from_secs(self.interval)
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
