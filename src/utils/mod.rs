pub mod time_utils;

// Re-export commonly used helpers
pub use time_utils::{STANDARD_DATE_FORMAT, parse_draw_date};
