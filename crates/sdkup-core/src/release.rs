use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{AffectedArea, ChangeType};

const DEPRECATION_ACTION: &str = "Consider updating to new API before next major version";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    BreakingChanges,
    Features,
    BugFixes,
    Deprecations,
    Other,
}

/// Bullet lines of a release body, bucketed by the heading they appeared under.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sections {
    pub breaking_changes: Vec<String>,
    pub features: Vec<String>,
    pub bug_fixes: Vec<String>,
    pub deprecations: Vec<String>,
    pub other: Vec<String>,
}

impl Sections {
    pub fn push(&mut self, kind: SectionKind, line: impl Into<String>) {
        self.lines_mut(kind).push(line.into());
    }

    #[must_use]
    pub fn lines(&self, kind: SectionKind) -> &[String] {
        match kind {
            SectionKind::BreakingChanges => &self.breaking_changes,
            SectionKind::Features => &self.features,
            SectionKind::BugFixes => &self.bug_fixes,
            SectionKind::Deprecations => &self.deprecations,
            SectionKind::Other => &self.other,
        }
    }

    fn lines_mut(&mut self, kind: SectionKind) -> &mut Vec<String> {
        match kind {
            SectionKind::BreakingChanges => &mut self.breaking_changes,
            SectionKind::Features => &mut self.features,
            SectionKind::BugFixes => &mut self.bug_fixes,
            SectionKind::Deprecations => &mut self.deprecations,
            SectionKind::Other => &mut self.other,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.breaking_changes.is_empty()
            && self.features.is_empty()
            && self.bug_fixes.is_empty()
            && self.deprecations.is_empty()
            && self.other.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReleaseNote {
    pub tag: String,
    pub name: String,
    pub published_at: Option<DateTime<Utc>>,
    pub body: String,
    #[serde(default)]
    pub sections: Sections,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_url: Option<String>,
}

impl ReleaseNote {
    /// Builds a note with the tag normalized to its `v`-prefixed form.
    #[must_use]
    pub fn new(tag: &str, name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            tag: canonical_tag(tag),
            name: name.into(),
            published_at: None,
            body: body.into(),
            sections: Sections::default(),
            html_url: None,
        }
    }

    #[must_use]
    pub fn with_published_at(mut self, published_at: DateTime<Utc>) -> Self {
        self.published_at = Some(published_at);
        self
    }

    #[must_use]
    pub fn with_html_url(mut self, url: impl Into<String>) -> Self {
        self.html_url = Some(url.into());
        self
    }

    #[must_use]
    pub fn with_sections(mut self, sections: Sections) -> Self {
        self.sections = sections;
        self
    }

    /// The tag without its leading `v`.
    #[must_use]
    pub fn version_str(&self) -> &str {
        self.tag.strip_prefix('v').unwrap_or(&self.tag)
    }
}

#[must_use]
pub fn canonical_tag(tag: &str) -> String {
    let trimmed = tag.trim();
    if trimmed.starts_with('v') {
        trimmed.to_string()
    } else {
        format!("v{trimmed}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeItem {
    pub description: String,
    pub change_type: ChangeType,
    pub affected_area: AffectedArea,
    pub requires_code_change: bool,
}

impl ChangeItem {
    #[must_use]
    pub fn new(
        description: impl Into<String>,
        change_type: ChangeType,
        affected_area: AffectedArea,
    ) -> Self {
        Self {
            description: description.into(),
            change_type,
            affected_area,
            requires_code_change: change_type.requires_code_change(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeprecationItem {
    pub description: String,
    pub severity: Severity,
    pub action_needed: String,
}

impl DeprecationItem {
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            severity: Severity::Warning,
            action_needed: DEPRECATION_ACTION.to_string(),
        }
    }
}
