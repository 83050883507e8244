use std::path::{Path, PathBuf};

use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, warn};

use sdkup_analysis::{FixSuggestions, suggest_fixes};
use sdkup_core::ChangeItem;

use crate::Result;
use crate::error::OperationError;
use crate::operations::scan::find_affected_files;
use crate::traits::{ManifestEditor, VcsProvider};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageUpdate {
    pub package: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppliedFix {
    pub file: PathBuf,
    pub change: String,
}

/// A breaking change that touches a file but has no unattended fix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManualReviewItem {
    pub file: PathBuf,
    pub change: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CodeUpdateInput<'a> {
    pub project_root: &'a Path,
    pub manifest_path: &'a Path,
    pub packages: &'a [String],
    pub primary_package: &'a str,
    pub version: &'a str,
    pub branch: &'a str,
    pub base_branch: &'a str,
    pub remote: &'a str,
    pub breaking_changes: &'a [ChangeItem],
    pub import_patterns: &'a [Regex],
    pub push: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CodeUpdateOutput {
    pub branch: String,
    pub packages_updated: Vec<PackageUpdate>,
    pub fixes_applied: Vec<AppliedFix>,
    pub manual_review_needed: Vec<ManualReviewItem>,
    pub commit_sha: Option<String>,
    pub pushed: bool,
    /// At least one manifest pin was rewritten.
    pub changes_made: bool,
}

/// `chore: update <package> SDK to <version>`, plus a count of applied fixes.
#[must_use]
pub fn commit_message(package: &str, version: &str, fixes_applied: usize) -> String {
    let version = version.trim_start_matches('v');
    let mut message = format!("chore: update {package} SDK to {version}");
    if fixes_applied > 0 {
        message.push_str(&format!("\n\nAddressed {fixes_applied} breaking changes."));
    }
    message
}

/// Bumps the SDK pins on an update branch, applies mechanical fixes, commits
/// and optionally pushes.
pub struct CodeUpdateOperation<M, V> {
    manifest: M,
    vcs: V,
}

impl<M, V> CodeUpdateOperation<M, V>
where
    M: ManifestEditor,
    V: VcsProvider,
{
    pub fn new(manifest: M, vcs: V) -> Self {
        Self { manifest, vcs }
    }

    /// # Errors
    ///
    /// Returns an error if the branch cannot be created, no SDK package is
    /// pinned, a manifest write fails, a fix cannot be written, the commit
    /// fails, or the push is rejected.
    pub fn execute(&self, input: &CodeUpdateInput<'_>) -> Result<CodeUpdateOutput> {
        let branch = self
            .vcs
            .create_branch(input.project_root, input.branch, input.base_branch)?;
        info!(
            branch = %branch.name,
            base = %branch.base,
            created = branch.created,
            "on update branch"
        );

        let packages_updated = self.update_packages(input)?;
        let changes_made = !packages_updated.is_empty();

        let (fixes_applied, manual_review_needed) = if input.breaking_changes.is_empty() {
            (Vec::new(), Vec::new())
        } else {
            apply_fixes(input.project_root, input.breaking_changes, input.import_patterns)?
        };

        let message = commit_message(input.primary_package, input.version, fixes_applied.len());
        let commit = self.vcs.commit_all(input.project_root, &message)?;
        match &commit {
            Some(commit) => info!(sha = %commit.sha, "committed SDK update"),
            None => info!("nothing to commit"),
        }

        let pushed = input.push && changes_made;
        if pushed {
            self.vcs
                .push(input.project_root, input.remote, &branch.name)?;
            info!(remote = input.remote, branch = %branch.name, "pushed update branch");
        }

        Ok(CodeUpdateOutput {
            branch: branch.name,
            packages_updated,
            fixes_applied,
            manual_review_needed,
            commit_sha: commit.map(|c| c.sha),
            pushed,
            changes_made,
        })
    }

    /// Unpinned packages are skipped unless none of them is pinned.
    fn update_packages(&self, input: &CodeUpdateInput<'_>) -> Result<Vec<PackageUpdate>> {
        let mut updated = Vec::new();
        for package in input.packages {
            match self
                .manifest
                .set_version(input.manifest_path, package, input.version)
            {
                Ok(kind) => {
                    debug!(package = %package, version = input.version, %kind, "pinned package");
                    updated.push(PackageUpdate {
                        package: package.clone(),
                        version: input.version.to_string(),
                    });
                }
                Err(err) if err.is_not_found() => {
                    debug!(package = %package, "package not pinned in manifest, skipping");
                }
                Err(err) => return Err(err),
            }
        }

        if updated.is_empty() {
            return Err(OperationError::NoPackagesPinned {
                path: input.manifest_path.to_path_buf(),
                packages: input.packages.join(", "),
            });
        }
        Ok(updated)
    }
}

fn apply_fixes(
    project_root: &Path,
    changes: &[ChangeItem],
    patterns: &[Regex],
) -> Result<(Vec<AppliedFix>, Vec<ManualReviewItem>)> {
    let affected = find_affected_files(project_root, patterns)?;
    let suggestions: Vec<FixSuggestions> = changes.iter().map(suggest_fixes).collect();

    let mut applied = Vec::new();
    let mut manual = Vec::new();

    for fixes in &suggestions {
        for file in &affected {
            if !fixes.is_auto_applicable() {
                manual.push(ManualReviewItem {
                    file: file.path.clone(),
                    change: fixes.change.description.clone(),
                    suggestions: fixes.suggestions.iter().map(|s| s.describe()).collect(),
                });
                continue;
            }

            let path = project_root.join(&file.path);
            let content = std::fs::read_to_string(&path).map_err(|source| {
                OperationError::FileRead {
                    path: path.clone(),
                    source,
                }
            })?;
            let Some(updated) = fixes.apply(&content) else {
                continue;
            };
            std::fs::write(&path, updated).map_err(|source| OperationError::FileWrite {
                path: path.clone(),
                source,
            })?;

            for (find, replace) in fixes.replacements() {
                applied.push(AppliedFix {
                    file: file.path.clone(),
                    change: format!("Rename '{find}' to '{replace}'"),
                });
            }
        }
    }

    if !manual.is_empty() {
        warn!(items = manual.len(), "breaking changes need manual review");
    }
    Ok((applied, manual))
}
