//! Command implementations.
//!
//! The analyzer is a single linear run; `analyze` owns the stage
//! ordering: load, profile, clean, derive, visualize, summarize, test.

pub mod analyze;

pub use analyze::handle_analyze;
