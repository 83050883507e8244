use sdkup_core::MergeMethod;
use sdkup_forge::{NewPullRequest, PullRequest};

use crate::Result;

/// Pull request operations on the hosting service.
pub trait PrHost: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the pull request cannot be opened.
    fn create_pull_request(&self, repo: &str, request: &NewPullRequest) -> Result<PullRequest>;

    /// # Errors
    ///
    /// Returns an error if the request fails.
    fn add_labels(&self, repo: &str, number: u64, labels: &[String]) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the request fails.
    fn request_reviewers(&self, repo: &str, number: u64, reviewers: &[String]) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if the request fails.
    fn add_comment(&self, repo: &str, number: u64, body: &str) -> Result<()>;

    /// # Errors
    ///
    /// Returns an error if auto-merge cannot be enabled.
    fn enable_auto_merge(&self, repo: &str, number: u64, method: MergeMethod) -> Result<()>;
}

impl<T: PrHost + ?Sized> PrHost for &T {
    fn create_pull_request(&self, repo: &str, request: &NewPullRequest) -> Result<PullRequest> {
        (**self).create_pull_request(repo, request)
    }

    fn add_labels(&self, repo: &str, number: u64, labels: &[String]) -> Result<()> {
        (**self).add_labels(repo, number, labels)
    }

    fn request_reviewers(&self, repo: &str, number: u64, reviewers: &[String]) -> Result<()> {
        (**self).request_reviewers(repo, number, reviewers)
    }

    fn add_comment(&self, repo: &str, number: u64, body: &str) -> Result<()> {
        (**self).add_comment(repo, number, body)
    }

    fn enable_auto_merge(&self, repo: &str, number: u64, method: MergeMethod) -> Result<()> {
        (**self).enable_auto_merge(repo, number, method)
    }
}
