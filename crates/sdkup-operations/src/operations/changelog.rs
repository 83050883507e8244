use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};

use sdkup_analysis::{ReleaseAnalysis, UpgradeAnalysis, UpgradeAnalysisAggregator};
use sdkup_core::ReleaseNote;
use sdkup_version::SemanticVersion;

use crate::Result;
use crate::error::OperationError;
use crate::traits::ReleaseSource;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseListing {
    pub tag: String,
    pub name: String,
    pub published_at: Option<DateTime<Utc>>,
    pub html_url: Option<String>,
}

impl From<&ReleaseNote> for ReleaseListing {
    fn from(note: &ReleaseNote) -> Self {
        Self {
            tag: note.tag.clone(),
            name: note.name.clone(),
            published_at: note.published_at,
            html_url: note.html_url.clone(),
        }
    }
}

/// Releases published after a version, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseSummary {
    pub current_version: String,
    pub count: usize,
    pub releases: Vec<ReleaseListing>,
}

/// Fetches upstream release notes and folds them into an upgrade analysis.
pub struct ChangelogAnalysisOperation<S> {
    source: S,
    aggregator: UpgradeAnalysisAggregator,
    repository: String,
    page_size: u32,
}

impl<S> ChangelogAnalysisOperation<S>
where
    S: ReleaseSource,
{
    pub fn new(
        source: S,
        aggregator: UpgradeAnalysisAggregator,
        repository: impl Into<String>,
        page_size: u32,
    ) -> Self {
        Self {
            source,
            aggregator,
            repository: repository.into(),
            page_size,
        }
    }

    #[must_use]
    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// The given target without its `v`, or the latest release's version.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::NoReleases` if no target is given and nothing
    /// is published, or the lookup error otherwise.
    pub fn resolve_target(&self, target: Option<&str>) -> Result<String> {
        if let Some(target) = target {
            return Ok(target.trim().trim_start_matches('v').to_string());
        }

        match self.source.latest_release(&self.repository) {
            Ok(latest) => Ok(latest.version_str().to_string()),
            Err(err) if err.is_not_found() => Err(OperationError::NoReleases {
                repository: self.repository.clone(),
            }),
            Err(err) => Err(err),
        }
    }

    /// Listed releases newer than `current_version`, in listing order.
    fn newer_than(&self, current_version: &str) -> Result<Vec<ReleaseNote>> {
        let current = SemanticVersion::parse(current_version);
        let listed = self
            .source
            .list_releases(&self.repository, self.page_size)?;
        debug!(
            repository = %self.repository,
            listed = listed.len(),
            "listed upstream releases"
        );
        Ok(listed
            .into_iter()
            .filter(|note| SemanticVersion::parse(&note.tag) > current)
            .collect())
    }

    /// # Errors
    ///
    /// Returns an error if the release listing cannot be fetched.
    pub fn releases_since(&self, current_version: &str) -> Result<ReleaseSummary> {
        let releases: Vec<ReleaseListing> = self
            .newer_than(current_version)?
            .iter()
            .map(ReleaseListing::from)
            .collect();

        Ok(ReleaseSummary {
            current_version: current_version.to_string(),
            count: releases.len(),
            releases,
        })
    }

    /// # Errors
    ///
    /// Returns a not-found error for an unknown tag, or a transport error.
    pub fn analyze_release(&self, tag: &str) -> Result<ReleaseAnalysis> {
        let note = self.source.release_by_tag(&self.repository, tag)?;
        Ok(self.aggregator.analyzer().analyze(&note))
    }

    /// Analyzes every listed release between `current_version` and the target.
    ///
    /// A release whose note cannot be fetched is logged, listed under
    /// `skipped_releases` and left out of the fold.
    ///
    /// # Errors
    ///
    /// Returns an error if the release listing cannot be fetched.
    pub fn analyze_upgrade(
        &self,
        current_version: &str,
        target_version: &str,
    ) -> Result<UpgradeAnalysis> {
        let candidates: Vec<ReleaseNote> = self
            .newer_than(current_version)?
            .into_iter()
            .filter(|note| {
                self.aggregator
                    .in_range(&note.tag, current_version, target_version)
            })
            .collect();

        let mut fetched = Vec::with_capacity(candidates.len());
        let mut skipped = Vec::new();
        for candidate in &candidates {
            match self.source.release_by_tag(&self.repository, &candidate.tag) {
                Ok(note) => fetched.push(note),
                Err(err) => {
                    warn!(
                        tag = %candidate.tag,
                        error = %err,
                        "skipping release with unreadable notes"
                    );
                    skipped.push(candidate.tag.clone());
                }
            }
        }

        let analysis = self
            .aggregator
            .aggregate(&fetched, current_version, target_version)
            .with_skipped_releases(skipped);

        info!(
            current_version,
            target_version,
            releases = analysis.releases_to_apply,
            breaking_changes = analysis.total_breaking_changes,
            risk = %analysis.overall_risk_level,
            "analyzed upgrade"
        );
        Ok(analysis)
    }
}
