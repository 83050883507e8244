use std::error::Error;
use std::fmt;

use serde::Serialize;

use sdkup_analysis::UpgradeAnalysis;

use crate::operations::{CodeUpdateOutput, PullRequestOutcome, VersionCheckOutput};
use crate::types::TestReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    CheckVersion,
    AnalyzeChangelog,
    UpdateCode,
    RunTests,
    CreatePr,
}

impl Stage {
    pub const ALL: [Self; 5] = [
        Self::CheckVersion,
        Self::AnalyzeChangelog,
        Self::UpdateCode,
        Self::RunTests,
        Self::CreatePr,
    ];

    /// Changelog, test-run and pull request failures are recorded as errors
    /// but leave the pushed update standing.
    #[must_use]
    pub fn failure_is_fatal(self) -> bool {
        matches!(self, Self::CheckVersion | Self::UpdateCode)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CheckVersion => "check_version",
            Self::AnalyzeChangelog => "analyze_changelog",
            Self::UpdateCode => "update_code",
            Self::RunTests => "run_tests",
            Self::CreatePr => "create_pr",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageStatus {
    Completed,
    Skipped,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageRecord {
    pub stage: Stage,
    pub status: StageStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Outcome of one update workflow run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WorkflowReport {
    pub success: bool,
    pub stages: Vec<StageRecord>,
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_check: Option<VersionCheckOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<UpgradeAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_update: Option<CodeUpdateOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tests: Option<TestReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<PullRequestOutcome>,
}

impl WorkflowReport {
    pub(crate) fn record(&mut self, stage: Stage, status: StageStatus, detail: Option<String>) {
        self.stages.push(StageRecord {
            stage,
            status,
            detail,
        });
    }

    pub(crate) fn completed(&mut self, stage: Stage, detail: impl Into<Option<String>>) {
        self.record(stage, StageStatus::Completed, detail.into());
    }

    pub(crate) fn skipped(&mut self, stage: Stage, reason: &str) {
        self.record(stage, StageStatus::Skipped, Some(reason.to_string()));
    }

    pub(crate) fn failed(&mut self, stage: Stage, error: &dyn Error) {
        let message = describe_error(error);
        self.errors.push(format!("{stage}: {message}"));
        self.record(stage, StageStatus::Failed, Some(message));
    }

    /// Marks every stage not yet recorded as skipped.
    pub(crate) fn skip_remaining(&mut self, reason: &str) {
        for stage in Stage::ALL {
            if self.status(stage).is_none() {
                self.skipped(stage, reason);
            }
        }
    }

    pub(crate) fn finish(mut self) -> Self {
        self.success = !self
            .stages
            .iter()
            .any(|r| r.status == StageStatus::Failed && r.stage.failure_is_fatal());
        self
    }

    #[must_use]
    pub fn status(&self, stage: Stage) -> Option<StageStatus> {
        self.stages
            .iter()
            .find(|r| r.stage == stage)
            .map(|r| r.status)
    }

    #[must_use]
    pub fn current_version(&self) -> Option<&str> {
        self.version_check
            .as_ref()
            .map(|v| v.current_version.as_str())
    }

    #[must_use]
    pub fn target_version(&self) -> Option<&str> {
        self.version_check
            .as_ref()
            .map(|v| v.latest_version.as_str())
    }

    #[must_use]
    pub fn branch_name(&self) -> Option<&str> {
        self.code_update.as_ref().map(|c| c.branch.as_str())
    }

    /// True once any stage past the version check has run.
    #[must_use]
    pub fn update_performed(&self) -> bool {
        self.stages
            .iter()
            .any(|r| r.stage != Stage::CheckVersion && r.status == StageStatus::Completed)
    }

    #[must_use]
    pub fn changes_made(&self) -> bool {
        self.code_update.as_ref().is_some_and(|c| c.changes_made)
    }
}

/// Renders an error and its source chain on one line.
#[must_use]
pub fn describe_error(error: &dyn Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
