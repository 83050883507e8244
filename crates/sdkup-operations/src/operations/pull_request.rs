use std::fmt::Write as _;

use serde::Serialize;
use tracing::{info, warn};

use sdkup_analysis::{MergeDecisionPolicy, UpgradeAnalysis};
use sdkup_core::{MergeMethod, RiskLevel};
use sdkup_forge::NewPullRequest;

use crate::Result;
use crate::report::describe_error;
use crate::traits::PrHost;
use crate::types::TestReport;

#[derive(Debug, Clone)]
pub struct PullRequestInput<'a> {
    pub repository: &'a str,
    pub current_version: &'a str,
    pub target_version: &'a str,
    pub head: &'a str,
    pub base: &'a str,
    pub display_name: &'a str,
    pub release_repository: &'a str,
    pub analysis: Option<&'a UpgradeAnalysis>,
    /// `None` when tests were skipped or could not run.
    pub tests: Option<&'a TestReport>,
    pub reviewers: &'a [String],
    pub merge_method: MergeMethod,
    pub draft: bool,
}

impl PullRequestInput<'_> {
    fn tests_passed(&self) -> Option<bool> {
        self.tests.map(|report| report.passed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullRequestOutcome {
    pub number: u64,
    pub url: String,
    pub labels: Vec<String>,
    pub auto_merge_enabled: bool,
    pub requires_review: bool,
    pub reviewers_requested: Vec<String>,
    pub review_comment_posted: bool,
    /// Follow-up calls that failed after the pull request was opened.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[must_use]
pub fn pull_request_title(display_name: &str, target_version: &str) -> String {
    format!("chore: Update {display_name} SDK to {target_version}")
}

fn risk_badge(risk: RiskLevel) -> &'static str {
    match risk {
        RiskLevel::Low => "🟢",
        RiskLevel::Medium => "🟡",
        RiskLevel::High => "🔴",
    }
}

#[must_use]
pub fn pull_request_body(input: &PullRequestInput<'_>) -> String {
    let mut body = String::from("## Automated SDK Update\n\n");
    let _ = writeln!(
        body,
        "This PR updates the {} SDK from `{}` to `{}`.\n",
        input.display_name, input.current_version, input.target_version
    );

    body.push_str("### Risk Assessment\n");
    match input.analysis {
        Some(analysis) => {
            let _ = writeln!(
                body,
                "{} **Risk Level:** {}\n",
                risk_badge(analysis.overall_risk_level),
                analysis.overall_risk_level.as_str().to_uppercase()
            );

            if !analysis.breaking_changes.is_empty() {
                body.push_str("### Breaking Changes\n");
                for change in &analysis.breaking_changes {
                    let _ = writeln!(body, "- {}", change.description);
                }
                body.push('\n');
            }

            if !analysis.recommendations.is_empty() {
                body.push_str("### Recommendations\n");
                for recommendation in &analysis.recommendations {
                    let _ = writeln!(body, "- {recommendation}");
                }
                body.push('\n');
            }
        }
        None => {
            body.push_str("⚪ **Risk Level:** UNKNOWN\n\n");
            body.push_str(
                "Changelog analysis was unavailable; review the upstream releases manually.\n\n",
            );
        }
    }

    if let Some(report) = input.tests {
        let status = if report.passed { "✅ Passing" } else { "❌ Failing" };
        let _ = writeln!(body, "### Test Results\n**Status:** {status}\n");
        let _ = writeln!(
            body,
            "- Passed: {}\n- Failed: {}\n- Skipped: {}\n",
            report.passed_count(),
            report.failed_count(),
            report.skipped_count()
        );
    }

    body.push_str(
        "### Testing Checklist\n\
         - [ ] All existing tests pass\n\
         - [ ] New SDK features tested (if applicable)\n\
         - [ ] Docker build succeeds\n\
         - [ ] Manual smoke test completed\n\n",
    );

    body.push_str("### Changelog\n");
    let _ = writeln!(
        body,
        "See [{} SDK Releases](https://github.com/{}/releases) for details.\n",
        input.display_name, input.release_repository
    );
    body.push_str("---\n*This PR was automatically created by the SDK Update workflow.*\n");
    body
}

/// Opens the update pull request and applies the merge decision to it.
pub struct PullRequestOperation<H> {
    host: H,
    policy: MergeDecisionPolicy,
}

impl<H> PullRequestOperation<H>
where
    H: PrHost,
{
    pub fn new(host: H, policy: MergeDecisionPolicy) -> Self {
        Self { host, policy }
    }

    /// Failures after the pull request exists are recorded as warnings.
    ///
    /// # Errors
    ///
    /// Returns an error if the pull request cannot be created.
    pub fn execute(&self, input: &PullRequestInput<'_>) -> Result<PullRequestOutcome> {
        let request = NewPullRequest {
            title: pull_request_title(input.display_name, input.target_version),
            body: pull_request_body(input),
            head: input.head.to_string(),
            base: input.base.to_string(),
            draft: input.draft,
        };
        let created = self.host.create_pull_request(input.repository, &request)?;
        info!(number = created.number, url = %created.html_url, "opened pull request");

        let decision = self.policy.decide_for(input.analysis, input.tests_passed());
        let mut outcome = PullRequestOutcome {
            number: created.number,
            url: created.html_url,
            labels: decision.labels.iter().cloned().collect(),
            auto_merge_enabled: false,
            requires_review: decision.requires_review,
            reviewers_requested: Vec::new(),
            review_comment_posted: false,
            warnings: Vec::new(),
        };

        let repo = input.repository;
        let number = outcome.number;

        if !outcome.labels.is_empty() {
            if let Err(err) = self.host.add_labels(repo, number, &outcome.labels) {
                outcome.warn("adding labels", &err);
            }
        }

        if decision.requires_review && !input.reviewers.is_empty() {
            match self.host.request_reviewers(repo, number, input.reviewers) {
                Ok(()) => outcome.reviewers_requested = input.reviewers.to_vec(),
                Err(err) => outcome.warn("requesting reviewers", &err),
            }
        }

        if let Some(comment) = &decision.review_comment {
            match self.host.add_comment(repo, number, comment) {
                Ok(()) => outcome.review_comment_posted = true,
                Err(err) => outcome.warn("posting review comment", &err),
            }
        }

        if decision.auto_merge_enabled {
            match self.host.enable_auto_merge(repo, number, input.merge_method) {
                Ok(()) => {
                    info!(number, method = %input.merge_method, "auto-merge enabled");
                    outcome.auto_merge_enabled = true;
                }
                Err(err) => outcome.warn("enabling auto-merge", &err),
            }
        }

        Ok(outcome)
    }
}

impl PullRequestOutcome {
    fn warn(&mut self, action: &str, err: &crate::OperationError) {
        let message = format!("{action} failed: {}", describe_error(err));
        warn!(number = self.number, "{message}");
        self.warnings.push(message);
    }
}

#[cfg(test)]
mod tests {
    use sdkup_analysis::{PolicyLabels, ReleaseAnalysis};
    use sdkup_core::{AffectedArea, ChangeItem, ChangeType};

    use super::*;
    use crate::mocks::MockPrHost;
    use crate::types::SuiteOutcome;

    fn analysis(breaking: usize) -> UpgradeAnalysis {
        let changes: Vec<ChangeItem> = (0..breaking)
            .map(|i| {
                ChangeItem::new(
                    format!("Removed helper_{i}"),
                    ChangeType::Removal,
                    AffectedArea::Tools,
                )
            })
            .collect();
        let risk = match breaking {
            0 => RiskLevel::Low,
            1..=3 => RiskLevel::Medium,
            _ => RiskLevel::High,
        };
        let release = ReleaseAnalysis {
            tag: "v0.2.0".to_string(),
            name: "0.2.0".to_string(),
            published_at: None,
            breaking_changes: changes,
            deprecations: Vec::new(),
            features: Vec::new(),
            bug_fixes: Vec::new(),
            risk_level: risk,
            recommendations: Vec::new(),
        };
        UpgradeAnalysis::fold("0.1.0", "0.2.0", vec![release])
    }

    fn report(passed: bool) -> TestReport {
        TestReport::from_suites(vec![SuiteOutcome {
            name: "unit".to_string(),
            required: true,
            success: passed,
            exit_code: Some(i32::from(!passed)),
            passed: 10,
            failed: usize::from(!passed),
            skipped: 2,
            errors: 0,
        }])
    }

    fn input<'a>(
        analysis: Option<&'a UpgradeAnalysis>,
        tests: Option<&'a TestReport>,
        reviewers: &'a [String],
    ) -> PullRequestInput<'a> {
        PullRequestInput {
            repository: "acme/agent-app",
            current_version: "0.1.0",
            target_version: "0.2.0",
            head: "sdk-update/0.2.0",
            base: "main",
            display_name: "Strands",
            release_repository: "strands-agents/sdk-python",
            analysis,
            tests,
            reviewers,
            merge_method: MergeMethod::Squash,
            draft: false,
        }
    }

    #[test]
    fn title_names_sdk_and_version() {
        assert_eq!(
            pull_request_title("Strands", "0.2.0"),
            "chore: Update Strands SDK to 0.2.0"
        );
    }

    #[test]
    fn body_lists_risk_changes_and_tests() {
        let analysis = analysis(1);
        let tests = report(false);
        let body = pull_request_body(&input(Some(&analysis), Some(&tests), &[]));

        assert!(body.starts_with(
            "## Automated SDK Update\n\nThis PR updates the Strands SDK from `0.1.0` to `0.2.0`.\n\n"
        ));
        assert!(body.contains("### Risk Assessment\n🟡 **Risk Level:** MEDIUM\n"));
        assert!(body.contains("### Breaking Changes\n- Removed helper_0\n"));
        assert!(body.contains("- Tool system changes detected. Verify custom tool implementations."));
        assert!(body.contains("**Status:** ❌ Failing"));
        assert!(body.contains("- Passed: 10\n- Failed: 1\n- Skipped: 2\n"));
        assert!(body.contains("- [ ] Manual smoke test completed\n"));
        assert!(body.contains(
            "See [Strands SDK Releases](https://github.com/strands-agents/sdk-python/releases) for details."
        ));
        assert!(body.ends_with("*This PR was automatically created by the SDK Update workflow.*\n"));
    }

    #[test]
    fn body_without_analysis_or_tests() {
        let body = pull_request_body(&input(None, None, &[]));
        assert!(body.contains("⚪ **Risk Level:** UNKNOWN"));
        assert!(!body.contains("### Breaking Changes"));
        assert!(!body.contains("### Test Results"));
    }

    #[test]
    fn low_risk_with_passing_tests_enables_auto_merge() -> anyhow::Result<()> {
        let host = MockPrHost::new().with_number(7);
        let analysis = analysis(0);
        let tests = report(true);
        let reviewers = vec!["octocat".to_string()];

        let outcome = PullRequestOperation::new(&host, MergeDecisionPolicy::default())
            .execute(&input(Some(&analysis), Some(&tests), &reviewers))?;

        assert_eq!(outcome.number, 7);
        assert_eq!(outcome.url, "https://github.com/acme/agent-app/pull/7");
        assert!(outcome.auto_merge_enabled);
        assert!(!outcome.requires_review);
        assert_eq!(host.labels(), vec!["dependencies", "automated"]);
        assert_eq!(host.auto_merge_requests(), vec![MergeMethod::Squash]);
        assert!(host.reviewers().is_empty());
        assert!(host.comments().is_empty());

        let created = host.created();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].head, "sdk-update/0.2.0");
        assert_eq!(created[0].title, "chore: Update Strands SDK to 0.2.0");
        Ok(())
    }

    #[test]
    fn high_risk_requests_review_and_comments() -> anyhow::Result<()> {
        let host = MockPrHost::new();
        let analysis = analysis(5);
        let tests = report(true);
        let reviewers = vec!["octocat".to_string()];

        let outcome = PullRequestOperation::new(&host, MergeDecisionPolicy::default())
            .execute(&input(Some(&analysis), Some(&tests), &reviewers))?;

        assert!(!outcome.auto_merge_enabled);
        assert!(outcome.requires_review);
        assert!(outcome.review_comment_posted);
        assert_eq!(outcome.reviewers_requested, reviewers);
        assert_eq!(
            host.labels(),
            vec!["dependencies", "automated", "needs-review", "breaking-change"]
        );
        assert!(host.comments()[0].contains("**HIGH** risk level"));
        assert!(host.auto_merge_requests().is_empty());
        Ok(())
    }

    #[test]
    fn skipped_tests_never_auto_merge() -> anyhow::Result<()> {
        let host = MockPrHost::new();
        let analysis = analysis(0);

        let outcome = PullRequestOperation::new(&host, MergeDecisionPolicy::default())
            .execute(&input(Some(&analysis), None, &[]))?;

        assert!(!outcome.auto_merge_enabled);
        assert!(outcome.requires_review);
        assert!(host.auto_merge_requests().is_empty());
        assert!(host.comments().is_empty());
        Ok(())
    }

    #[test]
    fn auto_merge_failure_is_a_warning() -> anyhow::Result<()> {
        let host = MockPrHost::new().with_failing_auto_merge();
        let analysis = analysis(0);
        let tests = report(true);

        let outcome = PullRequestOperation::new(&host, MergeDecisionPolicy::default())
            .execute(&input(Some(&analysis), Some(&tests), &[]))?;

        assert!(!outcome.auto_merge_enabled);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].starts_with("enabling auto-merge failed: GraphQL request failed"));
        Ok(())
    }

    #[test]
    fn create_failure_is_an_error() {
        let host = MockPrHost::new().with_failing_create();
        let result = PullRequestOperation::new(&host, MergeDecisionPolicy::default())
            .execute(&input(None, None, &[]));
        assert!(result.is_err());
        assert!(host.labels().is_empty());
    }

    #[test]
    fn configured_labels_are_applied() -> anyhow::Result<()> {
        let host = MockPrHost::new();
        let policy = MergeDecisionPolicy::new(PolicyLabels {
            base: vec!["deps".to_string()],
            ..PolicyLabels::default()
        });
        let analysis = analysis(2);

        PullRequestOperation::new(&host, policy).execute(&input(Some(&analysis), None, &[]))?;

        assert_eq!(host.labels(), vec!["deps", "needs-review"]);
        Ok(())
    }
}
