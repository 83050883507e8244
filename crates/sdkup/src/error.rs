use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to load project configuration")]
    Project(#[from] sdkup_project::ProjectError),

    #[error("operation failed")]
    Operation(#[from] sdkup_operations::OperationError),

    #[error("failed to set up HTTP client")]
    Forge(#[from] sdkup_forge::ForgeError),

    #[error("failed to determine current directory")]
    CurrentDir(#[source] std::io::Error),

    #[error("failed to write step outputs to '{path}'")]
    StepOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to render JSON output")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CliError>;
