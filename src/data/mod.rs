// Data loading, caching, and persistence
pub mod draw_cache;
pub mod draws;
pub mod load;
pub mod watchlist;

// Re-export commonly used types
pub use draw_cache::{DrawCache, DrawCacheKey};
pub use draws::socrata_client::{FetchError, RawRecord, SocrataClient};
pub use load::load_draw_data;
pub use watchlist::{WatchlistEntry, WatchlistStore};
