use tracing::info;

use crate::{CommitInfo, Result};

use super::Repository;

const FALLBACK_NAME: &str = "github-actions[bot]";
const FALLBACK_EMAIL: &str = "github-actions[bot]@users.noreply.github.com";

impl Repository {
    fn signature(&self) -> Result<git2::Signature<'static>> {
        match self.inner.signature() {
            Ok(sig) => Ok(sig.to_owned()),
            Err(_) => Ok(git2::Signature::now(FALLBACK_NAME, FALLBACK_EMAIL)?),
        }
    }

    /// Commits the current index on HEAD.
    ///
    /// Returns `None` without committing when the index matches HEAD.
    ///
    /// # Errors
    ///
    /// Returns an error if the commit cannot be created.
    pub fn commit(&self, message: &str) -> Result<Option<CommitInfo>> {
        let mut index = self.inner.index()?;
        let tree_id = index.write_tree()?;

        let parent = self.inner.head().ok().and_then(|h| h.peel_to_commit().ok());

        if parent.as_ref().is_some_and(|p| p.tree_id() == tree_id) {
            info!("nothing to commit");
            return Ok(None);
        }

        let tree = self.inner.find_tree(tree_id)?;
        let sig = self.signature()?;
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

        let commit_oid = self
            .inner
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)?;

        let sha = commit_oid.to_string();
        info!(%sha, "created commit");

        Ok(Some(CommitInfo {
            sha,
            message: message.to_string(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::super::tests::setup_test_repo;
    use std::fs;
    use std::path::Path;

    #[test]
    fn create_commit() -> anyhow::Result<()> {
        let (dir, repo) = setup_test_repo()?;

        fs::write(
            dir.path().join("backend/requirements.txt"),
            "strands-agents==0.2.0\n",
        )?;
        repo.stage_files(&[Path::new("backend/requirements.txt")])?;

        let commit_info = repo
            .commit("chore: update strands-agents SDK to 0.2.0")?
            .expect("commit created");

        assert!(!commit_info.sha.is_empty());
        let head = repo.inner.head()?.peel_to_commit()?;
        assert_eq!(head.id().to_string(), commit_info.sha);
        assert_eq!(head.author().name(), Some("Test"));

        Ok(())
    }

    #[test]
    fn commit_with_multiline_message() -> anyhow::Result<()> {
        let (dir, repo) = setup_test_repo()?;

        fs::write(dir.path().join("agent.py"), "pass\n")?;
        repo.stage_all()?;

        let message = "chore: update strands-agents SDK to 0.2.0\n\nAddressed 2 breaking changes.";
        let commit_info = repo.commit(message)?.expect("commit created");

        let head = repo.inner.head()?.peel_to_commit()?;
        assert_eq!(head.message(), Some(message));
        assert_eq!(commit_info.message, message);

        Ok(())
    }

    #[test]
    fn unchanged_index_is_not_committed() -> anyhow::Result<()> {
        let (_dir, repo) = setup_test_repo()?;
        let before = repo.inner.head()?.peel_to_commit()?.id();

        assert!(repo.commit("empty")?.is_none());
        assert_eq!(repo.inner.head()?.peel_to_commit()?.id(), before);

        Ok(())
    }
}
