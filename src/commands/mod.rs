//! CLI command implementations.

pub mod bounds;
pub mod ingest;
pub mod latest;
pub mod search;
pub mod status;

use std::path::PathBuf;

/// Default article store path under the working directory.
pub fn default_db_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".geonews/articles.db")
}
