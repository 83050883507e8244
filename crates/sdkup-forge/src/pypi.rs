use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::DEFAULT_PYPI_BASE;
use crate::error::Result;
use crate::http::{build_client, decode, execute, join};

#[derive(Deserialize)]
struct ProjectResponse {
    info: ProjectInfo,
    #[serde(default)]
    releases: BTreeMap<String, serde_json::Value>,
}

#[derive(Deserialize)]
struct ProjectInfo {
    name: String,
    version: String,
    #[serde(default)]
    summary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageInfo {
    pub name: String,
    pub latest_version: String,
    pub summary: Option<String>,
    /// Stable releases, newest first.
    pub stable_versions: Vec<String>,
}

/// Blocking client for the PyPI JSON API.
#[derive(Debug, Clone)]
pub struct PyPiClient {
    http: Client,
    base: String,
}

impl PyPiClient {
    /// # Errors
    ///
    /// Returns `ForgeError::Client` if the HTTP client cannot be built.
    pub fn new(base: Option<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: build_client(timeout)?,
            base: base.unwrap_or_else(|| DEFAULT_PYPI_BASE.to_string()),
        })
    }

    fn project(&self, package: &str) -> Result<ProjectResponse> {
        let url = join(&self.base, &format!("{package}/json"));
        let body = execute(self.http.get(&url), &url, &format!("package {package}"))?;
        decode(&url, &body)
    }

    /// # Errors
    ///
    /// Returns `ForgeError::NotFound` for an unknown package, or a transport,
    /// status or decode error.
    pub fn package_info(&self, package: &str) -> Result<PackageInfo> {
        let project = self.project(package)?;
        let stable_versions =
            sdkup_version::stable_versions_descending(project.releases.keys().map(String::as_str));
        debug!(
            package,
            version = %project.info.version,
            stable = stable_versions.len(),
            "resolved published versions"
        );

        Ok(PackageInfo {
            name: project.info.name,
            latest_version: project.info.version,
            summary: project.info.summary.filter(|s| !s.is_empty()),
            stable_versions,
        })
    }
}
