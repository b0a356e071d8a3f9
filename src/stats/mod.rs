// src/stats/mod.rs
pub mod accumulator;
pub mod experiments;
pub mod histogram;
pub mod running;

pub use accumulator::{ExactResult, ExperimentAccumulator};
pub use histogram::Histogram;
pub use running::RunningStats;
