use std::path::Path;

use sdkup_git::{BranchInfo, CommitInfo, PushAuth, Repository};

use crate::Result;
use crate::traits::VcsProvider;

#[derive(Debug, Default)]
pub struct Git2Provider {
    auth: PushAuth,
}

impl Git2Provider {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes with `token` instead of the agent or credential helper.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            auth: PushAuth::Token(token.into()),
        }
    }
}

impl VcsProvider for Git2Provider {
    fn current_branch(&self, project_root: &Path) -> Result<String> {
        let repo = Repository::open(project_root)?;
        Ok(repo.current_branch()?)
    }

    fn create_branch(&self, project_root: &Path, name: &str, base: &str) -> Result<BranchInfo> {
        let repo = Repository::open(project_root)?;
        Ok(repo.create_branch(name, base)?)
    }

    fn commit_all(&self, project_root: &Path, message: &str) -> Result<Option<CommitInfo>> {
        let repo = Repository::open(project_root)?;
        repo.stage_all()?;
        Ok(repo.commit(message)?)
    }

    fn push(&self, project_root: &Path, remote: &str, branch: &str) -> Result<()> {
        let repo = Repository::open(project_root)?;
        Ok(repo.push(remote, branch, &self.auth)?)
    }

    fn remote_url(&self, project_root: &Path, remote: &str) -> Result<Option<String>> {
        let repo = Repository::open(project_root)?;
        Ok(repo.remote_url(remote)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init_repo() -> anyhow::Result<tempfile::TempDir> {
        let dir = tempfile::tempdir()?;
        let repo = git2::Repository::init(dir.path())?;
        let mut config = repo.config()?;
        config.set_str("user.name", "Test User")?;
        config.set_str("user.email", "test@example.com")?;

        std::fs::write(dir.path().join("requirements.txt"), "strands-agents==0.1.0\n")?;
        let mut index = repo.index()?;
        index.add_path(Path::new("requirements.txt"))?;
        index.write()?;
        let tree = repo.find_tree(index.write_tree()?)?;
        let sig = repo.signature()?;
        repo.commit(Some("refs/heads/main"), &sig, &sig, "Initial commit", &tree, &[])?;
        repo.set_head("refs/heads/main")?;
        Ok(dir)
    }

    #[test]
    fn branch_commit_round() -> anyhow::Result<()> {
        let dir = init_repo()?;
        let provider = Git2Provider::new();

        provider.create_branch(dir.path(), "sdk-update/0.2.0", "main")?;
        assert_eq!(provider.current_branch(dir.path())?, "sdk-update/0.2.0");

        assert!(provider.commit_all(dir.path(), "nothing")?.is_none());

        std::fs::write(dir.path().join("requirements.txt"), "strands-agents==0.2.0\n")?;
        let commit = provider
            .commit_all(dir.path(), "chore: update strands-agents SDK to 0.2.0")?
            .expect("a commit for the changed manifest");
        assert_eq!(commit.message, "chore: update strands-agents SDK to 0.2.0");
        Ok(())
    }

    #[test]
    fn missing_remote_has_no_url() -> anyhow::Result<()> {
        let dir = init_repo()?;
        assert_eq!(Git2Provider::new().remote_url(dir.path(), "origin")?, None);
        Ok(())
    }

    #[test]
    fn token_auth_is_redacted_in_debug() {
        let provider = Git2Provider::with_token("secret");
        assert!(!format!("{provider:?}").contains("secret"));
    }
}
