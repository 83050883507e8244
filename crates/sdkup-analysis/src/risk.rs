use std::collections::HashSet;

use serde::Serialize;

use sdkup_core::{AffectedArea, ChangeItem, DeprecationItem, RiskLevel};

const HIGH_RISK_THRESHOLD: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    pub risk_level: RiskLevel,
    pub recommendations: Vec<String>,
}

/// Rates one release from its classified breaking changes.
#[derive(Debug, Clone, Copy)]
pub struct RiskAssessor {
    high_risk_threshold: usize,
}

impl Default for RiskAssessor {
    fn default() -> Self {
        Self {
            high_risk_threshold: HIGH_RISK_THRESHOLD,
        }
    }
}

impl RiskAssessor {
    /// More than `threshold` breaking changes rate as high risk.
    #[must_use]
    pub fn with_high_risk_threshold(threshold: usize) -> Self {
        Self {
            high_risk_threshold: threshold,
        }
    }

    /// Deprecations never raise the level; they only add a recommendation.
    #[must_use]
    pub fn risk_level(&self, changes: &[ChangeItem]) -> RiskLevel {
        if changes.len() > self.high_risk_threshold {
            RiskLevel::High
        } else if changes.is_empty() {
            RiskLevel::Low
        } else {
            RiskLevel::Medium
        }
    }

    #[must_use]
    pub fn assess(
        &self,
        changes: &[ChangeItem],
        deprecations: &[DeprecationItem],
    ) -> RiskAssessment {
        let risk_level = self.risk_level(changes);
        let mut recommendations = Vec::new();

        if risk_level == RiskLevel::High {
            recommendations.push(
                "High-risk update detected. Manual review strongly recommended.".to_string(),
            );
            recommendations
                .push("Consider testing in a separate branch before merging.".to_string());
        }

        let areas: HashSet<AffectedArea> = changes.iter().map(|c| c.affected_area).collect();
        let area_messages = [
            (
                AffectedArea::Imports,
                "Import changes detected. Review all import statements in SDK-related files.",
            ),
            (
                AffectedArea::ModelProvider,
                "Model provider changes detected. Test all supported providers (Bedrock, OpenAI, Anthropic, Ollama).",
            ),
            (
                AffectedArea::Agent,
                "Agent class changes detected. Review agent creation and invocation code.",
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

        if !deprecations.is_empty() {
            recommendations.push(
                "Deprecation warnings present. Plan migration for deprecated features.".to_string(),
            );
        }

        RiskAssessment {
            risk_level,
            recommendations,
        }
    }
}

#[cfg(test)]
mod tests {
    use sdkup_core::ChangeType;

    use super::*;

    fn change(area: AffectedArea) -> ChangeItem {
        ChangeItem::new("x", ChangeType::Removal, area)
    }

    #[test]
    fn four_changes_are_high_risk() {
        let changes = vec![change(AffectedArea::Unknown); 4];
        assert_eq!(RiskAssessor::default().risk_level(&changes), RiskLevel::High);
    }

    #[test]
    fn three_changes_are_medium_risk() {
        let changes = vec![change(AffectedArea::Unknown); 3];
        assert_eq!(RiskAssessor::default().risk_level(&changes), RiskLevel::Medium);
    }

    #[test]
    fn single_change_is_medium_risk() {
        let assessment = RiskAssessor::default().assess(&[change(AffectedArea::Unknown)], &[]);
        assert_eq!(assessment.risk_level, RiskLevel::Medium);
        assert!(assessment.recommendations.is_empty());
    }

    #[test]
    fn deprecations_alone_stay_low() {
        let assessment =
            RiskAssessor::default().assess(&[], &[DeprecationItem::new("old api")]);
        assert_eq!(assessment.risk_level, RiskLevel::Low);
        assert_eq!(
            assessment.recommendations,
            vec!["Deprecation warnings present. Plan migration for deprecated features."]
        );
    }

    #[test]
    fn recommendations_follow_fixed_order() {
        let changes = vec![
            change(AffectedArea::Tools),
            change(AffectedArea::Agent),
            change(AffectedArea::ModelProvider),
            change(AffectedArea::Imports),
        ];
        let assessment =
            RiskAssessor::default().assess(&changes, &[DeprecationItem::new("old api")]);

        assert_eq!(assessment.risk_level, RiskLevel::High);
        assert_eq!(
            assessment.recommendations,
            vec![
                "High-risk update detected. Manual review strongly recommended.",
                "Consider testing in a separate branch before merging.",
                "Import changes detected. Review all import statements in SDK-related files.",
                "Model provider changes detected. Test all supported providers (Bedrock, OpenAI, Anthropic, Ollama).",
                "Agent class changes detected. Review agent creation and invocation code.",
                "Tool system changes detected. Verify custom tool implementations.",
                "Deprecation warnings present. Plan migration for deprecated features.",
            ]
        );
    }

    #[test]
    fn configuration_area_has_no_recommendation() {
        let assessment =
            RiskAssessor::default().assess(&[change(AffectedArea::Configuration)], &[]);
        assert!(assessment.recommendations.is_empty());
    }

    #[test]
    fn custom_threshold() {
        let assessor = RiskAssessor::with_high_risk_threshold(1);
        let changes = vec![change(AffectedArea::Unknown); 2];
        assert_eq!(assessor.risk_level(&changes), RiskLevel::High);
    }
}
