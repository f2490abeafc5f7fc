//! Error types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed statistics file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("could not encode statistics: {0}")]
    Encode(#[from] toml::ser::Error),
}

#[derive(Debug, Error)]
pub enum ReleaseError {
    #[error("invalid release metadata: {0}")]
    Json(#[from] serde_json::Error),

    #[error("release has an empty tag")]
    EmptyTag,
}
