use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Git(#[from] sdkup_git::GitError),

    #[error(transparent)]
    Manifest(#[from] sdkup_manifest::ManifestError),

    #[error(transparent)]
    Forge(#[from] sdkup_forge::ForgeError),

    #[error(transparent)]
    Project(#[from] sdkup_project::ProjectError),

    #[error("failed to read '{path}'")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write '{path}'")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to scan '{path}'")]
    Scan {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("failed to run test suite '{suite}'")]
    TestSpawn {
        suite: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unknown test suite '{name}' (available: {available})")]
    UnknownSuite { name: String, available: String },

    #[error("no releases published in '{repository}'")]
    NoReleases { repository: String },

    #[error("none of the SDK packages ({packages}) are pinned in '{path}'")]
    NoPackagesPinned { path: PathBuf, packages: String },

    #[error(
        "no repository to open the pull request against; set repository.name, GITHUB_REPOSITORY, or an origin remote"
    )]
    MissingRepository,
}

impl OperationError {
    /// Lookups that failed because the release, tag or package does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::Forge(err) => err.is_not_found(),
            Self::Manifest(err) => err.is_package_not_found(),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, OperationError>;
