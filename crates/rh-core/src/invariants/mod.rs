//! Invariants of sampled output.
//!
//! Each module defines the properties a finished pass must satisfy.

pub mod history;

pub use history::HistorySampleChecker;
