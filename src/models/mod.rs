//! Data models

pub mod transaction;
pub mod verdict;
pub mod analytics;

pub use transaction::*;
pub use verdict::*;
pub use analytics::*;
