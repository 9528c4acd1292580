//! Two-level loading progress (cells, then reference lists inside a cell)

pub mod aggregator;

pub use aggregator::{ProgressAggregator, ProgressDepth, ProgressState};
