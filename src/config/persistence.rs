//! File persistence and serialization configuration

/// Directory path for storing fetched draw data
pub const DRAW_CACHE_DIR: &str = "draw_data";

/// Base filename for draw cache files (without extension)
pub const DRAW_CACHE_FILENAME_WITHOUT_EXT: &str = "win4_draws";

/// Current version of the draw cache serialization format
pub const DRAW_CACHE_VERSION: f64 = 1.0;

/// Maximum age of a cached draw file before it must be re-fetched (seconds).
/// The dataset updates twice a day, so 6 hours keeps the view at most one
/// drawing behind.
pub const DRAW_CACHE_ACCEPTABLE_AGE_SECS: i64 = 21_600;

/// Default path for the persisted watchlist file
pub const WATCHLIST_PATH: &str = ".win4_watchlist.json";

/// Generate dataset-specific cache filename
/// Example: "win4_draws_hsys-3def_v1.bin"
pub fn draw_cache_filename(dataset_id: &str) -> String {
    format!(
        "{}_{}_v{}.bin",
        DRAW_CACHE_FILENAME_WITHOUT_EXT, dataset_id, DRAW_CACHE_VERSION
    )
}
