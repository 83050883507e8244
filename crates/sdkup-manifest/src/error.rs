use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest at '{path}'")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write manifest at '{path}'")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML at '{path}'")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml_edit::TomlError,
    },

    #[error("package {package} not found in '{path}'")]
    PackageNotFound { path: PathBuf, package: String },

    #[error("invalid package name '{package}'")]
    InvalidPackageName {
        package: String,
        #[source]
        source: regex::Error,
    },

    #[error("expected {package} version '{expected}' but found '{actual}' in '{path}'")]
    VerificationFailed {
        path: PathBuf,
        package: String,
        expected: String,
        actual: String,
    },
}

impl ManifestError {
    #[must_use]
    pub fn is_package_not_found(&self) -> bool {
        matches!(self, Self::PackageNotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, ManifestError>;
