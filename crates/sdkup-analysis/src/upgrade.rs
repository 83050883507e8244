use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use sdkup_core::{AffectedArea, ChangeItem, DeprecationItem, ReleaseNote, RiskLevel};
use sdkup_version::SemanticVersion;

use crate::release::{ReleaseAnalysis, ReleaseAnalyzer};

/// The combined effect of every release between two versions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UpgradeAnalysis {
    pub current_version: String,
    pub target_version: String,
    pub releases_to_apply: usize,
    pub overall_risk_level: RiskLevel,
    pub total_breaking_changes: usize,
    pub breaking_changes: Vec<ChangeItem>,
    pub deprecations: Vec<DeprecationItem>,
    pub features: Vec<String>,
    pub bug_fixes: Vec<String>,
    pub recommendations: Vec<String>,
    pub releases: Vec<ReleaseAnalysis>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub skipped_releases: Vec<String>,
}

impl UpgradeAnalysis {
    /// Folds per-release results in the order given.
    ///
    /// The overall level only ever rises, and starts at low for an empty span.
    #[must_use]
    pub fn fold<I>(current_version: &str, target_version: &str, releases: I) -> Self
    where
        I: IntoIterator<Item = ReleaseAnalysis>,
    {
        let start = Self {
            current_version: current_version.to_string(),
            target_version: target_version.to_string(),
            ..Self::default()
        };

        let mut folded = releases.into_iter().fold(start, |mut acc, release| {
            acc.overall_risk_level = acc.overall_risk_level.raise(release.risk_level);
            acc.breaking_changes.extend(release.breaking_changes.iter().cloned());
            acc.deprecations.extend(release.deprecations.iter().cloned());
            acc.features.extend(release.features.iter().cloned());
            acc.bug_fixes.extend(release.bug_fixes.iter().cloned());
            acc.releases.push(release);
            acc
        });

        folded.releases_to_apply = folded.releases.len();
        folded.total_breaking_changes = folded.breaking_changes.len();
        folded.recommendations =
            upgrade_recommendations(folded.overall_risk_level, &folded.breaking_changes);
        folded
    }

    #[must_use]
    pub fn with_skipped_releases(mut self, skipped: Vec<String>) -> Self {
        self.skipped_releases = skipped;
        self
    }

    #[must_use]
    pub fn has_breaking_changes(&self) -> bool {
        self.total_breaking_changes > 0
    }
}

/// Recommendations for the whole upgrade, built after folding.
#[must_use]
pub fn upgrade_recommendations(risk: RiskLevel, breaking_changes: &[ChangeItem]) -> Vec<String> {
    let mut recommendations = Vec::new();

    if risk == RiskLevel::High {
        recommendations.push(
            "HIGH RISK: This upgrade requires careful review. Consider manual testing.".to_string(),
        );
        recommendations
            .push("Create a separate branch and test thoroughly before merging.".to_string());
    }

    if !breaking_changes.is_empty() {
        recommendations.push(format!(
            "Found {} breaking changes. Review each carefully.",
            breaking_changes.len()
        ));

        let areas: HashSet<AffectedArea> =
            breaking_changes.iter().map(|c| c.affected_area).collect();
        let area_messages = [
            (
                AffectedArea::Imports,
                "Import statement changes detected. Update all SDK imports.",
            ),
            (
                AffectedArea::Agent,
                "Agent API changes detected. Review agent creation code.",
            ),
            (
                AffectedArea::ModelProvider,
                "Model provider changes detected. Test all supported models.",
            ),
            (
                AffectedArea::Tools,
                "Tool system changes detected. Verify custom tool implementations.",
            ),
        ];
        for (area, message) in area_messages {
            if areas.contains(&area) {
                recommendations.push(message.to_string());
            }
        }
    }

    if risk == RiskLevel::Low && breaking_changes.is_empty() {
        recommendations
            .push("LOW RISK: Safe for automatic update. No breaking changes detected.".to_string());
    }

    recommendations
}

/// Selects the releases that belong to an upgrade and folds them.
#[derive(Debug, Clone, Default)]
pub struct UpgradeAnalysisAggregator {
    analyzer: ReleaseAnalyzer,
    clamp_to_target: bool,
}

impl UpgradeAnalysisAggregator {
    #[must_use]
    pub fn new(analyzer: ReleaseAnalyzer) -> Self {
        Self {
            analyzer,
            clamp_to_target: false,
        }
    }

    /// Also drop releases newer than the target version.
    #[must_use]
    pub fn with_clamp_to_target(mut self, clamp: bool) -> Self {
        self.clamp_to_target = clamp;
        self
    }

    #[must_use]
    pub fn analyzer(&self) -> &ReleaseAnalyzer {
        &self.analyzer
    }

    /// Whether a release tag falls inside the upgrade span.
    #[must_use]
    pub fn in_range(&self, tag: &str, current: &str, target: &str) -> bool {
        let version = SemanticVersion::parse(tag);
        if version <= SemanticVersion::parse(current) {
            return false;
        }
        !self.clamp_to_target || version <= SemanticVersion::parse(target)
    }

    /// Analyzes every in-range release, oldest first.
    ///
    /// The input order does not matter; releases are sorted by version before
    /// folding so changes are concatenated in release order.
    #[must_use]
    pub fn aggregate(
        &self,
        releases: &[ReleaseNote],
        current: &str,
        target: &str,
    ) -> UpgradeAnalysis {
        let mut selected: Vec<&ReleaseNote> = releases
            .iter()
            .filter(|note| {
                let keep = self.in_range(&note.tag, current, target);
                if !keep {
                    debug!(
                        tag = %note.tag,
                        current,
                        target_version = target,
                        "release outside upgrade span"
                    );
                }
                keep
            })
            .collect();
        selected.sort_by_key(|note| SemanticVersion::parse(&note.tag));

        UpgradeAnalysis::fold(
            current,
            target,
            selected.into_iter().map(|note| self.analyzer.analyze(note)),
        )
    }
}

#[cfg(test)]
mod tests {
    use sdkup_core::ChangeType;
    use sdkup_parse::ReleaseNoteParser;

    use super::*;

    fn parsed(tag: &str, name: &str, body: &str) -> ReleaseNote {
        ReleaseNoteParser::default().parse_note(ReleaseNote::new(tag, name, body))
    }

    fn release_with_risk(tag: &str, risk: RiskLevel) -> ReleaseAnalysis {
        let count = match risk {
            RiskLevel::Low => 0,
            RiskLevel::Medium => 1,
            RiskLevel::High => 4,
        };
        ReleaseAnalysis {
            tag: tag.to_string(),
            name: tag.to_string(),
            published_at: None,
            breaking_changes: vec![
                ChangeItem::new("Removed x", ChangeType::Removal, AffectedArea::Unknown);
                count
            ],
            deprecations: Vec::new(),
            features: Vec::new(),
            bug_fixes: Vec::new(),
            risk_level: risk,
            recommendations: Vec::new(),
        }
    }

    #[test]
    fn fold_never_downgrades_risk() {
        let analysis = UpgradeAnalysis::fold(
            "0.1.0",
            "0.4.0",
            vec![
                release_with_risk("v0.2.0", RiskLevel::Low),
                release_with_risk("v0.3.0", RiskLevel::Medium),
                release_with_risk("v0.4.0", RiskLevel::Low),
            ],
        );
        assert_eq!(analysis.overall_risk_level, RiskLevel::Medium);
        assert_eq!(analysis.releases_to_apply, 3);
        assert_eq!(analysis.total_breaking_changes, 1);
    }

    #[test]
    fn fold_keeps_high_after_later_medium() {
        let analysis = UpgradeAnalysis::fold(
            "0.1.0",
            "0.3.0",
            vec![
                release_with_risk("v0.2.0", RiskLevel::High),
                release_with_risk("v0.3.0", RiskLevel::Medium),
            ],
        );
        assert_eq!(analysis.overall_risk_level, RiskLevel::High);
        assert_eq!(analysis.total_breaking_changes, 5);
    }

    #[test]
    fn empty_span_is_low_with_safe_recommendation() {
        let analysis = UpgradeAnalysis::fold("1.0.0", "1.0.0", Vec::new());
        assert_eq!(analysis.overall_risk_level, RiskLevel::Low);
        assert_eq!(analysis.total_breaking_changes, 0);
        assert_eq!(
            analysis.recommendations,
            vec!["LOW RISK: Safe for automatic update. No breaking changes detected."]
        );
    }

    #[test]
    fn upgrade_recommendations_order() {
        let changes = vec![
            ChangeItem::new("a", ChangeType::Removal, AffectedArea::Tools),
            ChangeItem::new("b", ChangeType::Removal, AffectedArea::ModelProvider),
            ChangeItem::new("c", ChangeType::Removal, AffectedArea::Agent),
            ChangeItem::new("d", ChangeType::Removal, AffectedArea::Imports),
        ];
        assert_eq!(
            upgrade_recommendations(RiskLevel::High, &changes),
            vec![
                "HIGH RISK: This upgrade requires careful review. Consider manual testing.",
                "Create a separate branch and test thoroughly before merging.",
                "Found 4 breaking changes. Review each carefully.",
                "Import statement changes detected. Update all SDK imports.",
                "Agent API changes detected. Review agent creation code.",
                "Model provider changes detected. Test all supported models.",
                "Tool system changes detected. Verify custom tool implementations.",
            ]
        );
    }

    #[test]
    fn medium_without_areas_only_counts() {
        let changes = vec![ChangeItem::new("a", ChangeType::Removal, AffectedArea::Unknown)];
        assert_eq!(
            upgrade_recommendations(RiskLevel::Medium, &changes),
            vec!["Found 1 breaking changes. Review each carefully."]
        );
    }

    #[test]
    fn aggregate_end_to_end_single_breaking_release() {
        let releases = vec![parsed(
            "v0.2.0",
            "v0.2.0",
            "## Breaking Changes\n- Removed old_helper function\n",
        )];

        let analysis = UpgradeAnalysisAggregator::default().aggregate(&releases, "0.1.0", "0.2.0");

        assert_eq!(analysis.overall_risk_level, RiskLevel::Medium);
        assert_eq!(analysis.total_breaking_changes, 1);
        assert!(
            analysis
                .recommendations
                .iter()
                .any(|r| r.starts_with("Found 1 breaking changes"))
        );
    }

    #[test]
    fn aggregate_filters_old_releases_and_sorts_ascending() {
        let releases = vec![
            parsed("v0.4.0", "", "## Breaking\n- Removed c\n"),
            parsed("v0.1.0", "", "## Breaking\n- Removed old\n"),
            parsed("v0.3.0", "", "## Breaking\n- Removed b\n"),
        ];

        let analysis = UpgradeAnalysisAggregator::default().aggregate(&releases, "v0.1.0", "0.3.0");

        let tags: Vec<&str> = analysis.releases.iter().map(|r| r.tag.as_str()).collect();
        assert_eq!(tags, vec!["v0.3.0", "v0.4.0"]);
        let descriptions: Vec<&str> = analysis
            .breaking_changes
            .iter()
            .map(|c| c.description.as_str())
            .collect();
        assert_eq!(descriptions, vec!["Removed b", "Removed c"]);
    }

    #[test]
    fn clamp_to_target_drops_newer_releases() {
        let releases = vec![
            parsed("v0.3.0", "", ""),
            parsed("v0.2.0", "", ""),
        ];
        let aggregator = UpgradeAnalysisAggregator::default().with_clamp_to_target(true);

        let analysis = aggregator.aggregate(&releases, "0.1.0", "0.2.0");

        assert_eq!(analysis.releases_to_apply, 1);
        assert_eq!(analysis.releases[0].tag, "v0.2.0");
    }

    #[test]
    fn analysis_serializes_expected_keys() {
        let analysis = UpgradeAnalysis::fold("0.1.0", "0.2.0", Vec::new());
        let value = serde_json::to_value(&analysis).expect("serialize");
        for key in [
            "current_version",
            "target_version",
            "overall_risk_level",
            "total_breaking_changes",
            "breaking_changes",
            "recommendations",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["overall_risk_level"], "low");
        assert!(value.get("skipped_releases").is_none());
    }
}
