mod error;
mod repository;
mod types;

pub use error::GitError;
pub use repository::{PushAuth, Repository};
pub use types::{BranchInfo, CommitInfo};

pub type Result<T> = std::result::Result<T, GitError>;
