//! File system access for the pipeline: small path helpers and the CSV
//! dataset loader.

pub mod loader;

pub use loader::load_dataset;

use crate::errors::{AnalysisError, Result};
use std::fs;
use std::path::Path;

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| AnalysisError::io_at(e, path))?;
    }
    Ok(())
}

pub fn file_exists(path: &Path) -> bool {
    path.exists() && path.is_file()
}
