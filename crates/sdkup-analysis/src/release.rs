use chrono::{DateTime, Utc};
use serde::Serialize;

use sdkup_core::{ChangeItem, DeprecationItem, ReleaseNote, RiskLevel};

use crate::classify::ChangeClassifier;
use crate::risk::RiskAssessor;

/// What a single release contributes to an upgrade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseAnalysis {
    pub tag: String,
    pub name: String,
    pub published_at: Option<DateTime<Utc>>,
    pub breaking_changes: Vec<ChangeItem>,
    pub deprecations: Vec<DeprecationItem>,
    pub features: Vec<String>,
    pub bug_fixes: Vec<String>,
    pub risk_level: RiskLevel,
    pub recommendations: Vec<String>,
}

impl ReleaseAnalysis {
    #[must_use]
    pub fn has_breaking_changes(&self) -> bool {
        !self.breaking_changes.is_empty()
    }

    #[must_use]
    pub fn version_str(&self) -> &str {
        self.tag.strip_prefix('v').unwrap_or(&self.tag)
    }
}

/// Classifies and rates one release note from its parsed sections.
#[derive(Debug, Clone, Default)]
pub struct ReleaseAnalyzer {
    classifier: ChangeClassifier,
    assessor: RiskAssessor,
}

impl ReleaseAnalyzer {
    #[must_use]
    pub fn new(classifier: ChangeClassifier, assessor: RiskAssessor) -> Self {
        Self {
            classifier,
            assessor,
        }
    }

    #[must_use]
    pub fn analyze(&self, note: &ReleaseNote) -> ReleaseAnalysis {
        let sections = &note.sections;

        let breaking_changes: Vec<ChangeItem> = sections
            .breaking_changes
            .iter()
            .map(|line| self.classifier.classify_change(line))
            .collect();
        let deprecations: Vec<DeprecationItem> = sections
            .deprecations
            .iter()
            .map(|line| self.classifier.classify_deprecation(line))
            .collect();
        let assessment = self.assessor.assess(&breaking_changes, &deprecations);

        ReleaseAnalysis {
            tag: note.tag.clone(),
            name: note.name.clone(),
            published_at: note.published_at,
            breaking_changes,
            deprecations,
            features: sections.features.clone(),
            bug_fixes: sections.bug_fixes.clone(),
            risk_level: assessment.risk_level,
            recommendations: assessment.recommendations,
        }
    }
}
