use sdkup_core::{MergeMethod, ReleaseNote};
use sdkup_forge::{GitHubClient, NewPullRequest, PackageInfo, PullRequest, PyPiClient};

use crate::Result;
use crate::traits::{PackageIndex, PrHost, ReleaseSource};

/// Release notes and pull requests through the GitHub REST and GraphQL APIs.
pub struct GitHubProvider {
    client: GitHubClient,
}

impl GitHubProvider {
    #[must_use]
    pub fn new(client: GitHubClient) -> Self {
        Self { client }
    }

    #[must_use]
    pub fn client(&self) -> &GitHubClient {
        &self.client
    }
}

impl ReleaseSource for GitHubProvider {
    fn list_releases(&self, repo: &str, per_page: u32) -> Result<Vec<ReleaseNote>> {
        Ok(self.client.list_releases(repo, per_page)?)
    }

    fn release_by_tag(&self, repo: &str, tag: &str) -> Result<ReleaseNote> {
        Ok(self.client.release_by_tag(repo, tag)?)
    }

    fn latest_release(&self, repo: &str) -> Result<ReleaseNote> {
        Ok(self.client.latest_release(repo)?)
    }
}

impl PrHost for GitHubProvider {
    fn create_pull_request(&self, repo: &str, request: &NewPullRequest) -> Result<PullRequest> {
        Ok(self.client.create_pull_request(repo, request)?)
    }

    fn add_labels(&self, repo: &str, number: u64, labels: &[String]) -> Result<()> {
        Ok(self.client.add_labels(repo, number, labels)?)
    }

    fn request_reviewers(&self, repo: &str, number: u64, reviewers: &[String]) -> Result<()> {
        Ok(self.client.request_reviewers(repo, number, reviewers)?)
    }

    fn add_comment(&self, repo: &str, number: u64, body: &str) -> Result<()> {
        Ok(self.client.add_comment(repo, number, body)?)
    }

    fn enable_auto_merge(&self, repo: &str, number: u64, method: MergeMethod) -> Result<()> {
        Ok(self.client.enable_auto_merge(repo, number, method)?)
    }
}

pub struct PyPiProvider {
    client: PyPiClient,
}

impl PyPiProvider {
    #[must_use]
    pub fn new(client: PyPiClient) -> Self {
        Self { client }
    }
}

impl PackageIndex for PyPiProvider {
    fn package_info(&self, package: &str) -> Result<PackageInfo> {
        Ok(self.client.package_info(package)?)
    }
}
