use std::path::Path;

use regex::Regex;
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

use crate::Result;
use crate::error::OperationError;
use crate::types::{AffectedFile, FileMatch, UsageEntry, UsageSummary};

const SKIPPED_DIRS: [&str; 5] = [".venv", "venv", "__pycache__", ".git", "node_modules"];

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

fn is_python_file(entry: &DirEntry) -> bool {
    entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| ext == "py")
}

/// One match per line and pattern, in pattern order.
fn matches_in(content: &str, patterns: &[Regex]) -> Vec<FileMatch> {
    let mut matches = Vec::new();
    for pattern in patterns {
        if !pattern.is_match(content) {
            continue;
        }
        for (index, line) in content.lines().enumerate() {
            if pattern.is_match(line) {
                matches.push(FileMatch {
                    line: index + 1,
                    content: line.trim().to_string(),
                    pattern: pattern.as_str().to_string(),
                });
            }
        }
    }
    matches
}

/// Python files below `root` with at least one line matching an import
/// pattern, most matches first.
///
/// Files that are not valid UTF-8 are skipped.
///
/// # Errors
///
/// Returns `OperationError::Scan` if the directory tree cannot be walked.
pub fn find_affected_files(root: &Path, patterns: &[Regex]) -> Result<Vec<AffectedFile>> {
    let mut affected = Vec::new();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_skipped_dir(entry));

    for entry in walker {
        let entry = entry.map_err(|source| OperationError::Scan {
            path: root.to_path_buf(),
            source,
        })?;
        if !is_python_file(&entry) {
            continue;
        }

        let Ok(content) = std::fs::read_to_string(entry.path()) else {
            debug!(path = %entry.path().display(), "skipping unreadable file");
            continue;
        };

        let matches = matches_in(&content, patterns);
        if matches.is_empty() {
            continue;
        }

        let path = entry
            .path()
            .strip_prefix(root)
            .unwrap_or(entry.path())
            .to_path_buf();
        affected.push(AffectedFile { path, matches });
    }

    affected.sort_by(|a, b| b.match_count().cmp(&a.match_count()));
    debug!(root = %root.display(), files = affected.len(), "scanned for SDK usage");
    Ok(affected)
}

/// Groups import lines by whether they pull in models, agents or tools.
#[must_use]
pub fn usage_summary(affected: &[AffectedFile]) -> UsageSummary {
    let mut summary = UsageSummary {
        total_files: affected.len(),
        ..UsageSummary::default()
    };

    for file in affected {
        for found in &file.matches {
            summary.total_usages += 1;
            let entry = UsageEntry {
                file: file.path.clone(),
                line: found.line,
                content: found.content.clone(),
            };
            let lower = found.content.to_lowercase();
            let bucket = if lower.contains("models") {
                &mut summary.model_imports
            } else if lower.contains("agent") {
                &mut summary.agent_imports
            } else if lower.contains("tool") {
                &mut summary.tool_imports
            } else {
                &mut summary.other_imports
            };
            bucket.push(entry);
        }
    }

    summary
}
