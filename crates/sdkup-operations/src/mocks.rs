use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Mutex;

use sdkup_core::{MergeMethod, ReleaseNote};
use sdkup_forge::{ForgeError, NewPullRequest, PackageInfo, PullRequest};
use sdkup_git::{BranchInfo, CommitInfo, GitError};
use sdkup_manifest::{ManifestError, SpecifierKind};
use sdkup_parse::ReleaseNoteParser;

use crate::Result;
use crate::error::OperationError;
use crate::traits::{ManifestEditor, PackageIndex, PrHost, ReleaseSource, TestRunner, VcsProvider};
use crate::types::TestReport;

fn not_found(resource: String) -> OperationError {
    OperationError::Forge(ForgeError::NotFound { resource })
}

pub struct MockReleaseSource {
    releases: Vec<ReleaseNote>,
    failing_tags: HashSet<String>,
    fail_listing: bool,
    fetched_tags: Mutex<Vec<String>>,
}

impl MockReleaseSource {
    /// Releases in the order the listing returns them, newest first.
    ///
    /// Sections are parsed from each body with the default keywords, as the
    /// GitHub client does for fetched notes.
    #[must_use]
    pub fn new(releases: Vec<ReleaseNote>) -> Self {
        let parser = ReleaseNoteParser::default();
        Self {
            releases: releases
                .into_iter()
                .map(|note| parser.parse_note(note))
                .collect(),
            failing_tags: HashSet::new(),
            fail_listing: false,
            fetched_tags: Mutex::new(Vec::new()),
        }
    }

    /// Fetching `tag` by name fails with a transport-style error.
    #[must_use]
    pub fn with_failing_tag(mut self, tag: &str) -> Self {
        self.failing_tags.insert(tag.to_string());
        self
    }

    #[must_use]
    pub fn with_failing_listing(mut self) -> Self {
        self.fail_listing = true;
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn fetched_tags(&self) -> Vec<String> {
        self.fetched_tags.lock().expect("lock poisoned").clone()
    }
}

impl ReleaseSource for MockReleaseSource {
    fn list_releases(&self, repo: &str, per_page: u32) -> Result<Vec<ReleaseNote>> {
        if self.fail_listing {
            return Err(OperationError::Forge(ForgeError::Status {
                url: format!("https://api.github.com/repos/{repo}/releases"),
                status: 403,
                message: "API rate limit exceeded".to_string(),
            }));
        }
        let limit = usize::try_from(per_page).unwrap_or(usize::MAX);
        Ok(self.releases.iter().take(limit).cloned().collect())
    }

    fn release_by_tag(&self, repo: &str, tag: &str) -> Result<ReleaseNote> {
        let canonical = sdkup_core::canonical_tag(tag);
        self.fetched_tags
            .lock()
            .expect("lock poisoned")
            .push(canonical.clone());

        if self.failing_tags.contains(&canonical) {
            return Err(OperationError::Forge(ForgeError::Status {
                url: format!("https://api.github.com/repos/{repo}/releases/tags/{canonical}"),
                status: 502,
                message: "Bad Gateway".to_string(),
            }));
        }

        self.releases
            .iter()
            .find(|r| r.tag == canonical)
            .cloned()
            .ok_or_else(|| not_found(format!("release {canonical} in {repo}")))
    }

    fn latest_release(&self, repo: &str) -> Result<ReleaseNote> {
        self.releases
            .first()
            .cloned()
            .ok_or_else(|| not_found(format!("latest release in {repo}")))
    }
}

#[derive(Default)]
pub struct MockPackageIndex {
    packages: HashMap<String, PackageInfo>,
}

impl MockPackageIndex {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// `version` is both the latest and the only stable release.
    #[must_use]
    pub fn with_version(self, package: &str, version: &str) -> Self {
        self.with_versions(package, version, &[version])
    }

    /// `stable` lists the stable release history, newest first.
    #[must_use]
    pub fn with_versions(mut self, package: &str, latest: &str, stable: &[&str]) -> Self {
        self.packages.insert(
            package.to_string(),
            PackageInfo {
                name: package.to_string(),
                latest_version: latest.to_string(),
                summary: None,
                stable_versions: stable.iter().map(|v| (*v).to_string()).collect(),
            },
        );
        self
    }
}

impl PackageIndex for MockPackageIndex {
    fn package_info(&self, package: &str) -> Result<PackageInfo> {
        self.packages
            .get(package)
            .cloned()
            .ok_or_else(|| not_found(format!("package {package}")))
    }
}

/// In-memory manifest keyed by package name; the path is ignored.
#[derive(Default)]
pub struct MockManifestEditor {
    pins: Mutex<HashMap<String, String>>,
    writes: Mutex<Vec<(String, String)>>,
}

impl MockManifestEditor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn with_pin(self, package: &str, version: &str) -> Self {
        self.pins
            .lock()
            .expect("lock poisoned")
            .insert(package.to_string(), version.to_string());
        self
    }

    /// Every `(package, version)` written, in call order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes.lock().expect("lock poisoned").clone()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn pinned(&self, package: &str) -> Option<String> {
        self.pins.lock().expect("lock poisoned").get(package).cloned()
    }
}

impl ManifestEditor for MockManifestEditor {
    fn read_version(&self, manifest_path: &Path, package: &str) -> Result<String> {
        self.pinned(package).ok_or_else(|| {
            OperationError::Manifest(ManifestError::PackageNotFound {
                path: manifest_path.to_path_buf(),
                package: package.to_string(),
            })
        })
    }

    fn set_version(
        &self,
        manifest_path: &Path,
        package: &str,
        version: &str,
    ) -> Result<SpecifierKind> {
        let mut pins = self.pins.lock().expect("lock poisoned");
        let Some(pin) = pins.get_mut(package) else {
            return Err(OperationError::Manifest(ManifestError::PackageNotFound {
                path: manifest_path.to_path_buf(),
                package: package.to_string(),
            }));
        };
        *pin = version.to_string();
        self.writes
            .lock()
            .expect("lock poisoned")
            .push((package.to_string(), version.to_string()));
        Ok(SpecifierKind::Exact)
    }
}

pub struct MockVcsProvider {
    branch: Mutex<String>,
    remote_url: Option<String>,
    nothing_to_commit: bool,
    fail_branch: bool,
    fail_push: bool,
    branches_created: Mutex<Vec<(String, String)>>,
    commits: Mutex<Vec<String>>,
    pushes: Mutex<Vec<(String, String)>>,
}

impl MockVcsProvider {
    #[must_use]
    pub fn new() -> Self {
        Self {
            branch: Mutex::new("main".to_string()),
            remote_url: None,
            nothing_to_commit: false,
            fail_branch: false,
            fail_push: false,
            branches_created: Mutex::new(Vec::new()),
            commits: Mutex::new(Vec::new()),
            pushes: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_remote_url(mut self, url: &str) -> Self {
        self.remote_url = Some(url.to_string());
        self
    }

    /// `commit_all` reports an index identical to `HEAD`.
    #[must_use]
    pub fn with_nothing_to_commit(mut self) -> Self {
        self.nothing_to_commit = true;
        self
    }

    #[must_use]
    pub fn with_failing_branch(mut self) -> Self {
        self.fail_branch = true;
        self
    }

    #[must_use]
    pub fn with_failing_push(mut self) -> Self {
        self.fail_push = true;
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn branches_created(&self) -> Vec<(String, String)> {
        self.branches_created.lock().expect("lock poisoned").clone()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn commits(&self) -> Vec<String> {
        self.commits.lock().expect("lock poisoned").clone()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn pushes(&self) -> Vec<(String, String)> {
        self.pushes.lock().expect("lock poisoned").clone()
    }
}

impl Default for MockVcsProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl VcsProvider for MockVcsProvider {
    fn current_branch(&self, _project_root: &Path) -> Result<String> {
        Ok(self.branch.lock().expect("lock poisoned").clone())
    }

    fn create_branch(&self, _project_root: &Path, name: &str, base: &str) -> Result<BranchInfo> {
        if self.fail_branch {
            return Err(OperationError::Git(GitError::BranchNotFound {
                name: base.to_string(),
            }));
        }
        self.branches_created
            .lock()
            .expect("lock poisoned")
            .push((name.to_string(), base.to_string()));
        *self.branch.lock().expect("lock poisoned") = name.to_string();
        Ok(BranchInfo {
            name: name.to_string(),
            base: base.to_string(),
            created: true,
        })
    }

    fn commit_all(&self, _project_root: &Path, message: &str) -> Result<Option<CommitInfo>> {
        if self.nothing_to_commit {
            return Ok(None);
        }
        self.commits
            .lock()
            .expect("lock poisoned")
            .push(message.to_string());
        Ok(Some(CommitInfo {
            sha: "abc123def456".to_string(),
            message: message.to_string(),
        }))
    }

    fn push(&self, _project_root: &Path, remote: &str, branch: &str) -> Result<()> {
        if self.fail_push {
            return Err(OperationError::Git(GitError::PushRejected {
                refspec: format!("refs/heads/{branch}:refs/heads/{branch}"),
                reason: "permission denied".to_string(),
            }));
        }
        self.pushes
            .lock()
            .expect("lock poisoned")
            .push((remote.to_string(), branch.to_string()));
        Ok(())
    }

    fn remote_url(&self, _project_root: &Path, _remote: &str) -> Result<Option<String>> {
        Ok(self.remote_url.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPullRequest {
    pub repo: String,
    pub title: String,
    pub body: String,
    pub head: String,
    pub base: String,
    pub draft: bool,
}

pub struct MockPrHost {
    number: u64,
    fail_create: bool,
    fail_auto_merge: bool,
    created: Mutex<Vec<RecordedPullRequest>>,
    labels: Mutex<Vec<String>>,
    reviewers: Mutex<Vec<String>>,
    comments: Mutex<Vec<String>>,
    auto_merge: Mutex<Vec<MergeMethod>>,
}

impl MockPrHost {
    #[must_use]
    pub fn new() -> Self {
        Self {
            number: 42,
            fail_create: false,
            fail_auto_merge: false,
            created: Mutex::new(Vec::new()),
            labels: Mutex::new(Vec::new()),
            reviewers: Mutex::new(Vec::new()),
            comments: Mutex::new(Vec::new()),
            auto_merge: Mutex::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn with_number(mut self, number: u64) -> Self {
        self.number = number;
        self
    }

    #[must_use]
    pub fn with_failing_create(mut self) -> Self {
        self.fail_create = true;
        self
    }

    #[must_use]
    pub fn with_failing_auto_merge(mut self) -> Self {
        self.fail_auto_merge = true;
        self
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn created(&self) -> Vec<RecordedPullRequest> {
        self.created.lock().expect("lock poisoned").clone()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.labels.lock().expect("lock poisoned").clone()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn reviewers(&self) -> Vec<String> {
        self.reviewers.lock().expect("lock poisoned").clone()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn comments(&self) -> Vec<String> {
        self.comments.lock().expect("lock poisoned").clone()
    }

    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn auto_merge_requests(&self) -> Vec<MergeMethod> {
        self.auto_merge.lock().expect("lock poisoned").clone()
    }
}

impl Default for MockPrHost {
    fn default() -> Self {
        Self::new()
    }
}

impl PrHost for MockPrHost {
    fn create_pull_request(&self, repo: &str, request: &NewPullRequest) -> Result<PullRequest> {
        if self.fail_create {
            return Err(OperationError::Forge(ForgeError::Status {
                url: format!("https://api.github.com/repos/{repo}/pulls"),
                status: 422,
                message: "Validation Failed".to_string(),
            }));
        }
        self.created
            .lock()
            .expect("lock poisoned")
            .push(RecordedPullRequest {
                repo: repo.to_string(),
                title: request.title.clone(),
                body: request.body.clone(),
                head: request.head.clone(),
                base: request.base.clone(),
                draft: request.draft,
            });
        Ok(PullRequest {
            number: self.number,
            html_url: format!("https://github.com/{repo}/pull/{}", self.number),
        })
    }

    fn add_labels(&self, _repo: &str, _number: u64, labels: &[String]) -> Result<()> {
        self.labels
            .lock()
            .expect("lock poisoned")
            .extend(labels.iter().cloned());
        Ok(())
    }

    fn request_reviewers(&self, _repo: &str, _number: u64, reviewers: &[String]) -> Result<()> {
        self.reviewers
            .lock()
            .expect("lock poisoned")
            .extend(reviewers.iter().cloned());
        Ok(())
    }

    fn add_comment(&self, _repo: &str, _number: u64, body: &str) -> Result<()> {
        self.comments
            .lock()
            .expect("lock poisoned")
            .push(body.to_string());
        Ok(())
    }

    fn enable_auto_merge(&self, _repo: &str, _number: u64, method: MergeMethod) -> Result<()> {
        if self.fail_auto_merge {
            return Err(OperationError::Forge(ForgeError::GraphQl {
                message: "Pull request is not in the correct state to enable auto-merge"
                    .to_string(),
            }));
        }
        self.auto_merge.lock().expect("lock poisoned").push(method);
        Ok(())
    }
}

pub struct MockTestRunner {
    report: Option<TestReport>,
    runs: Mutex<Vec<Vec<String>>>,
}

impl MockTestRunner {
    /// Every run returns `report`.
    #[must_use]
    pub fn new(report: TestReport) -> Self {
        Self {
            report: Some(report),
            runs: Mutex::new(Vec::new()),
        }
    }

    /// Every run fails to start.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            report: None,
            runs: Mutex::new(Vec::new()),
        }
    }

    /// The selectors passed to each run.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    #[must_use]
    pub fn runs(&self) -> Vec<Vec<String>> {
        self.runs.lock().expect("lock poisoned").clone()
    }
}

impl TestRunner for MockTestRunner {
    fn run(&self, _project_root: &Path, selectors: &[String]) -> Result<TestReport> {
        self.runs
            .lock()
            .expect("lock poisoned")
            .push(selectors.to_vec());
        self.report.clone().ok_or_else(|| OperationError::TestSpawn {
            suite: "unit".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "pytest not found"),
        })
    }
}
