// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod errors;
pub mod io;
pub mod plot;
pub mod report;
pub mod stats;
pub mod transform;

// Re-export commonly used types
pub use crate::config::{AnalysisConfig, ImageFormat};
pub use crate::core::{Column, ColumnData, DType, Dataset};
pub use crate::errors::AnalysisError;
pub use crate::stats::{describe, describe_grouped, welch_t_test, SummaryStats, WelchTTest};
