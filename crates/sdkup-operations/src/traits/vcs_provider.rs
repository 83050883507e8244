use std::path::Path;

use sdkup_git::{BranchInfo, CommitInfo};

use crate::Result;

pub trait VcsProvider: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened or HEAD is detached.
    fn current_branch(&self, project_root: &Path) -> Result<String>;

    /// Checks out `name`, created from `base` unless it already exists.
    ///
    /// # Errors
    ///
    /// Returns an error if `base` is missing or the checkout fails.
    fn create_branch(&self, project_root: &Path, name: &str, base: &str) -> Result<BranchInfo>;

    /// Stages every change and commits; `None` when there was nothing to commit.
    ///
    /// # Errors
    ///
    /// Returns an error if staging or the commit fails.
    fn commit_all(&self, project_root: &Path, message: &str) -> Result<Option<CommitInfo>>;

    /// # Errors
    ///
    /// Returns an error if the remote is unknown or rejects the push.
    fn push(&self, project_root: &Path, remote: &str, branch: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the repository cannot be opened.
    fn remote_url(&self, project_root: &Path, remote: &str) -> Result<Option<String>>;
}

impl<T: VcsProvider + ?Sized> VcsProvider for &T {
    fn current_branch(&self, project_root: &Path) -> Result<String> {
        (**self).current_branch(project_root)
    }

    fn create_branch(&self, project_root: &Path, name: &str, base: &str) -> Result<BranchInfo> {
        (**self).create_branch(project_root, name, base)
    }

    fn commit_all(&self, project_root: &Path, message: &str) -> Result<Option<CommitInfo>> {
        (**self).commit_all(project_root, message)
    }

    fn push(&self, project_root: &Path, remote: &str, branch: &str) -> Result<()> {
        (**self).push(project_root, remote, branch)
    }

    fn remote_url(&self, project_root: &Path, remote: &str) -> Result<Option<String>> {
        (**self).remote_url(project_root, remote)
    }
}
