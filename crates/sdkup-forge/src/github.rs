use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use sdkup_core::{MergeMethod, ReleaseNote, canonical_tag};
use sdkup_parse::ReleaseNoteParser;

use crate::DEFAULT_API_BASE;
use crate::error::{ForgeError, Result};
use crate::http::{build_client, decode, execute, join};

const ACCEPT: &str = "application/vnd.github+json";
const API_VERSION: &str = "2022-11-28";

#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub api_base: String,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            token: None,
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewPullRequest {
    pub title: String,
    pub body: String,
    pub head: String,
    pub base: String,
    pub draft: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    pub number: u64,
    pub html_url: String,
}

#[derive(Deserialize)]
struct ApiRelease {
    tag_name: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    html_url: Option<String>,
}

impl ApiRelease {
    fn into_note(self, parser: &ReleaseNoteParser) -> ReleaseNote {
        let mut note = ReleaseNote::new(
            &self.tag_name,
            self.name.unwrap_or_default(),
            self.body.unwrap_or_default(),
        );
        if let Some(published_at) = self.published_at {
            note = note.with_published_at(published_at);
        }
        if let Some(url) = self.html_url {
            note = note.with_html_url(url);
        }
        parser.parse_note(note)
    }
}

#[derive(Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<serde_json::Value>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

const PULL_REQUEST_ID_QUERY: &str = "query($owner: String!, $name: String!, $number: Int!) { \
     repository(owner: $owner, name: $name) { pullRequest(number: $number) { id } } }";

const ENABLE_AUTO_MERGE_MUTATION: &str = "mutation($id: ID!, $method: PullRequestMergeMethod!) { \
     enablePullRequestAutoMerge(input: { pullRequestId: $id, mergeMethod: $method }) { \
     pullRequest { number } } }";

/// Blocking client for the GitHub REST and GraphQL APIs.
///
/// Requests are never retried; a failure surfaces to the caller. Fetched
/// release notes come back with their sections already parsed.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    api_base: String,
    token: Option<String>,
    parser: ReleaseNoteParser,
}

impl GitHubClient {
    /// # Errors
    ///
    /// Returns `ForgeError::Client` if the HTTP client cannot be built.
    pub fn new(options: ClientOptions) -> Result<Self> {
        Ok(Self {
            http: build_client(options.timeout)?,
            api_base: options.api_base,
            token: options.token.filter(|t| !t.is_empty()),
            parser: ReleaseNoteParser::default(),
        })
    }

    /// Replaces the parser used to split release bodies into sections.
    #[must_use]
    pub fn with_parser(mut self, parser: ReleaseNoteParser) -> Self {
        self.parser = parser;
        self
    }

    #[must_use]
    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    fn with_headers(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request
            .header("Accept", ACCEPT)
            .header("X-GitHub-Api-Version", API_VERSION);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn get(&self, path: &str, resource: &str) -> Result<(String, String)> {
        let url = join(&self.api_base, path);
        let body = execute(self.with_headers(self.http.get(&url)), &url, resource)?;
        Ok((url, body))
    }

    fn post(
        &self,
        path: &str,
        payload: &serde_json::Value,
        resource: &str,
    ) -> Result<(String, String)> {
        let url = join(&self.api_base, path);
        let request = self.with_headers(self.http.post(&url)).json(payload);
        let body = execute(request, &url, resource)?;
        Ok((url, body))
    }

    fn graphql_url(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        match base.strip_suffix("/api/v3") {
            Some(host) => format!("{host}/api/graphql"),
            None => format!("{base}/graphql"),
        }
    }

    fn graphql(&self, query: &str, variables: serde_json::Value) -> Result<serde_json::Value> {
        let url = self.graphql_url();
        let request = self
            .with_headers(self.http.post(&url))
            .json(&json!({ "query": query, "variables": variables }));
        let body = execute(request, &url, "GraphQL endpoint")?;
        let response: GraphQlResponse = decode(&url, &body)?;

        if let Some(error) = response.errors.into_iter().next() {
            return Err(ForgeError::GraphQl {
                message: error.message,
            });
        }
        response.data.ok_or_else(|| ForgeError::GraphQl {
            message: "response carried no data".to_string(),
        })
    }

    /// Lists releases newest first, one page of at most `per_page` items.
    ///
    /// # Errors
    ///
    /// Returns `ForgeError::NotFound` for an unknown repository, or a
    /// transport, status or decode error.
    pub fn list_releases(&self, repo: &str, per_page: u32) -> Result<Vec<ReleaseNote>> {
        let (url, body) = self.get(
            &format!("repos/{repo}/releases?per_page={per_page}"),
            &format!("repository {repo}"),
        )?;
        let releases: Vec<ApiRelease> = decode(&url, &body)?;
        debug!(repo, count = releases.len(), "listed releases");
        Ok(releases
            .into_iter()
            .map(|release| release.into_note(&self.parser))
            .collect())
    }

    /// Fetches one release by tag, adding a leading `v` when missing.
    ///
    /// # Errors
    ///
    /// Returns `ForgeError::NotFound` for an unknown tag, or a transport,
    /// status or decode error.
    pub fn release_by_tag(&self, repo: &str, tag: &str) -> Result<ReleaseNote> {
        let tag = canonical_tag(tag);
        let (url, body) = self.get(
            &format!("repos/{repo}/releases/tags/{tag}"),
            &format!("release {tag} in {repo}"),
        )?;
        let release: ApiRelease = decode(&url, &body)?;
        Ok(release.into_note(&self.parser))
    }

    /// # Errors
    ///
    /// Returns `ForgeError::NotFound` if the repository has no published
    /// release, or a transport, status or decode error.
    pub fn latest_release(&self, repo: &str) -> Result<ReleaseNote> {
        let (url, body) = self.get(
            &format!("repos/{repo}/releases/latest"),
            &format!("latest release of {repo}"),
        )?;
        let release: ApiRelease = decode(&url, &body)?;
        Ok(release.into_note(&self.parser))
    }

    /// # Errors
    ///
    /// Returns a transport, status or decode error.
    pub fn create_pull_request(&self, repo: &str, request: &NewPullRequest) -> Result<PullRequest> {
        let payload = serde_json::to_value(request).map_err(|source| ForgeError::Decode {
            url: format!("repos/{repo}/pulls"),
            source,
        })?;
        let (url, body) = self.post(
            &format!("repos/{repo}/pulls"),
            &payload,
            &format!("repository {repo}"),
        )?;
        let pr: PullRequest = decode(&url, &body)?;
        info!(repo, number = pr.number, url = %pr.html_url, "created pull request");
        Ok(pr)
    }

    /// # Errors
    ///
    /// Returns a transport or status error.
    pub fn add_labels(&self, repo: &str, number: u64, labels: &[String]) -> Result<()> {
        self.post(
            &format!("repos/{repo}/issues/{number}/labels"),
            &json!({ "labels": labels }),
            &format!("pull request #{number}"),
        )?;
        debug!(repo, number, ?labels, "added labels");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns a transport or status error.
    pub fn request_reviewers(&self, repo: &str, number: u64, reviewers: &[String]) -> Result<()> {
        self.post(
            &format!("repos/{repo}/pulls/{number}/requested_reviewers"),
            &json!({ "reviewers": reviewers }),
            &format!("pull request #{number}"),
        )?;
        debug!(repo, number, ?reviewers, "requested reviewers");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns a transport or status error.
    pub fn add_comment(&self, repo: &str, number: u64, body: &str) -> Result<()> {
        self.post(
            &format!("repos/{repo}/issues/{number}/comments"),
            &json!({ "body": body }),
            &format!("pull request #{number}"),
        )?;
        debug!(repo, number, "added comment");
        Ok(())
    }

    /// Resolves the pull request's node id, then enables auto-merge on it.
    ///
    /// # Errors
    ///
    /// Returns `ForgeError::NotFound` if the pull request cannot be resolved,
    /// `ForgeError::GraphQl` if GitHub rejects the mutation, or a transport error.
    pub fn enable_auto_merge(&self, repo: &str, number: u64, method: MergeMethod) -> Result<()> {
        let (owner, name) = repo.split_once('/').ok_or_else(|| ForgeError::InvalidRepositoryPath {
            url: repo.to_string(),
        })?;

        let data = self.graphql(
            PULL_REQUEST_ID_QUERY,
            json!({ "owner": owner, "name": name, "number": number }),
        )?;
        let id = data
            .pointer("/repository/pullRequest/id")
            .and_then(serde_json::Value::as_str)
            .ok_or_else(|| ForgeError::NotFound {
                resource: format!("pull request #{number} in {repo}"),
            })?
            .to_string();

        self.graphql(
            ENABLE_AUTO_MERGE_MUTATION,
            json!({ "id": id, "method": method.graphql_name() }),
        )?;
        info!(repo, number, %method, "enabled auto-merge");
        Ok(())
    }
}
