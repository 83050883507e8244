use std::fmt::Write as _;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use sdkup_core::RiskLevel;

use crate::upgrade::UpgradeAnalysis;

/// Label names applied to update pull requests.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct PolicyLabels {
    /// Always applied.
    pub base: Vec<String>,
    /// Added for medium and high risk.
    pub needs_review: String,
    /// Added for high risk.
    pub breaking_change: String,
}

impl Default for PolicyLabels {
    fn default() -> Self {
        Self {
            base: vec!["dependencies".to_string(), "automated".to_string()],
            needs_review: "needs-review".to_string(),
            breaking_change: "breaking-change".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeDecision {
    pub auto_merge_enabled: bool,
    pub requires_review: bool,
    pub labels: IndexSet<String>,
    pub review_comment: Option<String>,
}

/// Turns a risk level and a test outcome into a merge action.
///
/// Auto-merge needs both low risk and a positive test signal; tests that were
/// skipped count as not passed.
#[derive(Debug, Clone, Default)]
pub struct MergeDecisionPolicy {
    labels: PolicyLabels,
}

impl MergeDecisionPolicy {
    #[must_use]
    pub fn new(labels: PolicyLabels) -> Self {
        Self { labels }
    }

    #[must_use]
    pub fn decide(&self, risk: RiskLevel, tests_passed: Option<bool>) -> MergeDecision {
        self.decide_with(Some(risk), 0, &[], tests_passed)
    }

    /// Decides from a full analysis so the review comment can cite it.
    ///
    /// Without an analysis the risk is unknown: review is required and only
    /// the base labels are applied.
    #[must_use]
    pub fn decide_for(
        &self,
        analysis: Option<&UpgradeAnalysis>,
        tests_passed: Option<bool>,
    ) -> MergeDecision {
        match analysis {
            Some(analysis) => self.decide_with(
                Some(analysis.overall_risk_level),
                analysis.total_breaking_changes,
                &analysis.recommendations,
                tests_passed,
            ),
            None => self.decide_with(None, 0, &[], tests_passed),
        }
    }

    fn decide_with(
        &self,
        risk: Option<RiskLevel>,
        breaking_changes: usize,
        recommendations: &[String],
        tests_passed: Option<bool>,
    ) -> MergeDecision {
        let labels = self.labels_for(risk);
        let tests_ok = tests_passed == Some(true);

        if risk == Some(RiskLevel::Low) && tests_ok {
            return MergeDecision {
                auto_merge_enabled: true,
                requires_review: false,
                labels,
                review_comment: None,
            };
        }

        let review_comment = risk
            .filter(|r| *r != RiskLevel::Low)
            .map(|r| review_comment(r, breaking_changes, recommendations, tests_passed));

        MergeDecision {
            auto_merge_enabled: false,
            requires_review: true,
            labels,
            review_comment,
        }
    }

    fn labels_for(&self, risk: Option<RiskLevel>) -> IndexSet<String> {
        let mut labels: IndexSet<String> = self.labels.base.iter().cloned().collect();
        if matches!(risk, Some(RiskLevel::Medium | RiskLevel::High)) {
            labels.insert(self.labels.needs_review.clone());
        }
        if risk == Some(RiskLevel::High) {
            labels.insert(self.labels.breaking_change.clone());
        }
        labels
    }
}

fn review_comment(
    risk: RiskLevel,
    breaking_changes: usize,
    recommendations: &[String],
    tests_passed: Option<bool>,
) -> String {
    let mut comment = String::from("## ⚠️ Manual Review Required\n\n");
    let _ = writeln!(
        comment,
        "This SDK update has a **{}** risk level.\n",
        risk.as_str().to_uppercase()
    );
    comment.push_str("### Reason:\n");
    let _ = writeln!(comment, "- {breaking_changes} breaking changes detected");
    if tests_passed == Some(false) {
        comment.push_str("- Validation tests failed.\n");
    }
    comment.push_str("- Please review the changes carefully before merging.\n\n");
    comment.push_str("### Recommendations:\n");
    for rec in recommendations {
        let _ = writeln!(comment, "- {rec}");
    }
    comment
}

#[cfg(test)]
mod tests {
    use sdkup_core::{AffectedArea, ChangeItem, ChangeType};

    use super::*;
    use crate::release::ReleaseAnalysis;

    fn labels(decision: &MergeDecision) -> Vec<&str> {
        decision.labels.iter().map(String::as_str).collect()
    }

    #[test]
    fn low_risk_with_passing_tests_auto_merges() {
        let decision = MergeDecisionPolicy::default().decide(RiskLevel::Low, Some(true));
        assert!(decision.auto_merge_enabled);
        assert!(!decision.requires_review);
        assert_eq!(labels(&decision), vec!["dependencies", "automated"]);
        assert!(decision.review_comment.is_none());
    }

    #[test]
    fn low_risk_with_skipped_tests_requires_review_without_comment() {
        let decision = MergeDecisionPolicy::default().decide(RiskLevel::Low, None);
        assert!(!decision.auto_merge_enabled);
        assert!(decision.requires_review);
        assert!(decision.review_comment.is_none());
    }

    #[test]
    fn low_risk_with_failing_tests_requires_review() {
        let decision = MergeDecisionPolicy::default().decide(RiskLevel::Low, Some(false));
        assert!(!decision.auto_merge_enabled);
        assert!(decision.requires_review);
    }

    #[test]
    fn medium_risk_adds_needs_review() {
        let decision = MergeDecisionPolicy::default().decide(RiskLevel::Medium, Some(true));
        assert!(decision.requires_review);
        assert_eq!(labels(&decision), vec!["dependencies", "automated", "needs-review"]);
        assert!(decision.review_comment.is_some());
    }

    #[test]
    fn high_risk_adds_breaking_change_label() {
        let decision = MergeDecisionPolicy::default().decide(RiskLevel::High, Some(true));
        assert!(decision.requires_review);
        assert!(!decision.auto_merge_enabled);
        assert_eq!(
            labels(&decision),
            vec!["dependencies", "automated", "needs-review", "breaking-change"]
        );
    }

    #[test]
    fn review_comment_cites_analysis() {
        let release = ReleaseAnalysis {
            tag: "v0.2.0".to_string(),
            name: String::new(),
            published_at: None,
            breaking_changes: vec![ChangeItem::new(
                "Removed import alias",
                ChangeType::Removal,
                AffectedArea::Imports,
            )],
            deprecations: Vec::new(),
            features: Vec::new(),
            bug_fixes: Vec::new(),
            risk_level: RiskLevel::Medium,
            recommendations: Vec::new(),
        };
        let analysis = UpgradeAnalysis::fold("0.1.0", "0.2.0", vec![release]);

        let decision = MergeDecisionPolicy::default().decide_for(Some(&analysis), Some(false));
        let comment = decision.review_comment.expect("comment for medium risk");

        assert!(comment.starts_with("## ⚠️ Manual Review Required"));
        assert!(comment.contains("This SDK update has a **MEDIUM** risk level."));
        assert!(comment.contains("- 1 breaking changes detected"));
        assert!(comment.contains("- Validation tests failed."));
        assert!(comment.contains("- Import statement changes detected. Update all SDK imports."));
    }

    #[test]
    fn missing_analysis_never_auto_merges() {
        let decision = MergeDecisionPolicy::default().decide_for(None, Some(true));
        assert!(!decision.auto_merge_enabled);
        assert!(decision.requires_review);
        assert_eq!(labels(&decision), vec!["dependencies", "automated"]);
        assert!(decision.review_comment.is_none());
    }

    #[test]
    fn custom_labels_are_deduplicated() {
        let policy = MergeDecisionPolicy::new(PolicyLabels {
            base: vec!["deps".to_string(), "deps".to_string()],
            needs_review: "review".to_string(),
            breaking_change: "review".to_string(),
        });
        let decision = policy.decide(RiskLevel::High, None);
        assert_eq!(labels(&decision), vec!["deps", "review"]);
    }
}
