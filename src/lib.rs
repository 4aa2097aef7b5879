// Core modules
pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use data::{DrawCache, DrawCacheKey, SocrataClient, WatchlistStore, load_draw_data};
pub use domain::{BoxType, Combo, DrawRow, Session};
pub use models::DrawHistory;

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Use the API as primary source instead of the local cache (the manual
    /// refresh action; also clears any derived views)
    #[arg(long, default_value_t = false)]
    pub prefer_api: bool,

    /// Restrict windowed analytics to the most recent N days
    #[arg(long)]
    pub days: Option<u32>,

    /// Restrict the report to one session ("Midday" or "Evening")
    #[arg(long)]
    pub session: Option<String>,

    /// Check a 4-digit combo against the full history
    #[arg(long)]
    pub check: Option<String>,

    /// Add a combo to the watchlist before reporting
    #[arg(long)]
    pub add: Option<String>,

    /// Remove a combo from the watchlist before reporting
    #[arg(long)]
    pub remove: Option<String>,

    /// Override the watchlist file path
    #[arg(long)]
    pub watchlist_file: Option<std::path::PathBuf>,
}
