use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("IO error")]
    Io(#[from] std::io::Error),

    #[error("config file '{path}' does not exist")]
    ConfigNotFound { path: PathBuf },

    #[error("failed to read config at '{path}'")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config at '{path}'")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid import pattern '{pattern}'")]
    InvalidImportPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("config at '{path}' has an empty '{field}'")]
    EmptyField { path: PathBuf, field: &'static str },
}
