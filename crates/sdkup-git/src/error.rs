use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GitError {
    #[error("git operation failed")]
    Git(#[from] git2::Error),

    #[error("not a git repository: '{path}'")]
    NotARepository { path: PathBuf },

    #[error("branch '{name}' not found")]
    BranchNotFound { name: String },

    #[error("remote '{name}' not found")]
    RemoteNotFound { name: String },

    #[error("HEAD is detached, not on a branch")]
    DetachedHead,

    #[error("push of '{refspec}' was rejected: {reason}")]
    PushRejected { refspec: String, reason: String },
}
