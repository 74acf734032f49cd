//! Analytics over fetched interest data

pub mod summary;

pub use summary::{summarize, InterestSummary};
