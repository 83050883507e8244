use tracing::{debug, info};

use crate::{BranchInfo, GitError, Result};

use super::Repository;

impl Repository {
    /// Checks out `name`, branching from the local branch `base`.
    ///
    /// An existing branch of the same name is reused rather than reset.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::BranchNotFound`] if `base` does not exist locally, or
    /// a git error if the checkout would overwrite local changes.
    pub fn create_branch(&self, name: &str, base: &str) -> Result<BranchInfo> {
        let base_branch = self
            .inner
            .find_branch(base, git2::BranchType::Local)
            .map_err(|_| GitError::BranchNotFound {
                name: base.to_string(),
            })?;
        let base_commit = base_branch.get().peel_to_commit()?;

        let (branch, created) = match self.inner.find_branch(name, git2::BranchType::Local) {
            Ok(existing) => {
                debug!(branch = name, "reusing existing branch");
                (existing, false)
            }
            Err(_) => (self.inner.branch(name, &base_commit, false)?, true),
        };

        let refname = branch
            .get()
            .name()
            .ok_or_else(|| GitError::BranchNotFound {
                name: name.to_string(),
            })?
            .to_string();
        let target = branch.get().peel_to_commit()?;

        self.inner.checkout_tree(
            target.as_object(),
            Some(git2::build::CheckoutBuilder::new().safe()),
        )?;
        self.inner.set_head(&refname)?;

        info!(branch = name, base, created, "checked out update branch");

        Ok(BranchInfo {
            name: name.to_string(),
            base: base.to_string(),
            created,
        })
    }

    #[must_use]
    pub fn branch_exists(&self, name: &str) -> bool {
        self.inner
            .find_branch(name, git2::BranchType::Local)
            .is_ok()
    }
}
