//! Configuration module for the Win 4 analyzer.

pub mod analysis;
pub mod payouts;
pub mod persistence;
pub mod socrata;

// Re-export commonly used items
pub use analysis::ANALYSIS;
pub use payouts::PAYOUTS;
pub use persistence::{
    DRAW_CACHE_ACCEPTABLE_AGE_SECS, DRAW_CACHE_DIR, DRAW_CACHE_VERSION, WATCHLIST_PATH,
    draw_cache_filename,
};
pub use socrata::SOCRATA;
