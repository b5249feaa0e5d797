use std::path::PathBuf;

use thiserror::Error;

/// Failures opening or indexing a BIDS dataset.
#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("dataset root not found: {0}")]
    RootNotFound(PathBuf),

    #[error("dataset root is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("dataset_description.json missing under {0}")]
    MissingDescription(PathBuf),

    #[error("invalid dataset_description.json at {path}: {source}")]
    Description {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("failed to walk dataset: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
