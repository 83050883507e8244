use std::fmt;

use url::Url;

use crate::error::{ForgeError, Result};

/// An `owner/repo` pair on a GitHub host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryInfo {
    pub owner: String,
    pub repo: String,
    pub base_url: Url,
}

impl RepositoryInfo {
    /// Parses an HTTPS remote URL or an scp-style `git@host:owner/repo.git` remote.
    ///
    /// # Errors
    ///
    /// Returns `ForgeError::UrlParse` if the URL is invalid, or
    /// `ForgeError::InvalidRepositoryPath` if it lacks an owner/repo path.
    pub fn from_url(url_str: &str) -> Result<Self> {
        let normalized = scp_to_ssh_url(url_str).unwrap_or_else(|| url_str.to_string());

        let url = Url::parse(&normalized).map_err(|source| ForgeError::UrlParse {
            url: url_str.to_string(),
            source,
        })?;

        let host = url.host_str().ok_or_else(|| ForgeError::UrlParse {
            url: url_str.to_string(),
            source: url::ParseError::EmptyHost,
        })?;

        let (owner, repo) = extract_owner_repo(&url)?;

        let base_url = Url::parse(&format!("https://{host}")).map_err(|source| {
            ForgeError::UrlParse {
                url: url_str.to_string(),
                source,
            }
        })?;

        Ok(Self {
            owner,
            repo,
            base_url,
        })
    }

    /// Parses an `owner/repo` slug on github.com.
    ///
    /// # Errors
    ///
    /// Returns `ForgeError::InvalidRepositoryPath` unless the slug has exactly two segments.
    pub fn from_slug(slug: &str) -> Result<Self> {
        let mut parts = slug.trim().split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(owner), Some(repo), None) if !owner.is_empty() && !repo.is_empty() => {
                Self::from_url(&format!("https://github.com/{owner}/{repo}"))
            }
            _ => Err(ForgeError::InvalidRepositoryPath {
                url: slug.to_string(),
            }),
        }
    }

    #[must_use]
    pub fn slug(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    #[must_use]
    pub fn comparison_url(&self, base_tag: &str, target_tag: &str) -> String {
        format!(
            "{}{}/{}/compare/{}...{}",
            self.base_url, self.owner, self.repo, base_tag, target_tag
        )
    }

    #[must_use]
    pub fn releases_url(&self) -> String {
        format!("{}{}/{}/releases", self.base_url, self.owner, self.repo)
    }
}

impl fmt::Display for RepositoryInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}

fn scp_to_ssh_url(url_str: &str) -> Option<String> {
    if url_str.contains("://") {
        return None;
    }
    let (user_host, path) = url_str.split_once(':')?;
    Some(format!("ssh://{user_host}/{path}"))
}

fn extract_owner_repo(url: &Url) -> Result<(String, String)> {
    let path = url.path().trim_start_matches('/').trim_end_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);

    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    if segments.len() < 2 {
        return Err(ForgeError::InvalidRepositoryPath {
            url: url.to_string(),
        });
    }

    Ok((segments[0].to_string(), segments[1].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_https_url() {
        let info = RepositoryInfo::from_url("https://github.com/owner/repo").expect("should parse");
        assert_eq!(info.owner, "owner");
        assert_eq!(info.repo, "repo");
        assert_eq!(info.slug(), "owner/repo");
    }

    #[test]
    fn parse_url_with_git_suffix() {
        let info =
            RepositoryInfo::from_url("https://github.com/owner/repo.git").expect("should parse");
        assert_eq!(info.repo, "repo");
    }

    #[test]
    fn parse_scp_style_remote() {
        let info = RepositoryInfo::from_url("git@github.com:acme/agents.git").expect("should parse");
        assert_eq!(info.slug(), "acme/agents");
        assert_eq!(info.base_url.as_str(), "https://github.com/");
    }

    #[test]
    fn parse_ssh_url() {
        let info =
            RepositoryInfo::from_url("ssh://git@github.com/acme/agents").expect("should parse");
        assert_eq!(info.slug(), "acme/agents");
    }

    #[test]
    fn missing_repo_segment_is_rejected() {
        let result = RepositoryInfo::from_url("https://github.com/owner");
        assert!(matches!(result, Err(ForgeError::InvalidRepositoryPath { .. })));
    }

    #[test]
    fn invalid_url_is_rejected() {
        let result = RepositoryInfo::from_url("not a url");
        assert!(matches!(result, Err(ForgeError::UrlParse { .. })));
    }

    #[test]
    fn slug_round_trip() {
        let info = RepositoryInfo::from_slug("strands-agents/sdk-python").expect("should parse");
        assert_eq!(info.to_string(), "strands-agents/sdk-python");
        assert!(RepositoryInfo::from_slug("only-owner").is_err());
        assert!(RepositoryInfo::from_slug("a/b/c").is_err());
    }

    #[test]
    fn comparison_and_release_urls() {
        let info = RepositoryInfo::from_slug("strands-agents/sdk-python").expect("should parse");
        assert_eq!(
            info.comparison_url("v0.1.0", "v0.2.0"),
            "https://github.com/strands-agents/sdk-python/compare/v0.1.0...v0.2.0"
        );
        assert_eq!(
            info.releases_url(),
            "https://github.com/strands-agents/sdk-python/releases"
        );
    }
}
