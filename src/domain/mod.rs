// Domain types and value objects
pub mod combo;
pub mod draw;

// Re-export commonly used types
pub use combo::{BoxType, Combo};
pub use draw::{DrawRow, Session};
