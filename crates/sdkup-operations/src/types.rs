use std::path::PathBuf;

use serde::Serialize;

/// One line of a source file that matched an SDK import pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileMatch {
    pub line: usize,
    pub content: String,
    pub pattern: String,
}

/// A source file that uses the SDK, relative to the project root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AffectedFile {
    pub path: PathBuf,
    pub matches: Vec<FileMatch>,
}

impl AffectedFile {
    #[must_use]
    pub fn match_count(&self) -> usize {
        self.matches.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UsageEntry {
    pub file: PathBuf,
    pub line: usize,
    pub content: String,
}

/// SDK import lines grouped by what they pull in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UsageSummary {
    pub total_files: usize,
    pub total_usages: usize,
    pub model_imports: Vec<UsageEntry>,
    pub agent_imports: Vec<UsageEntry>,
    pub tool_imports: Vec<UsageEntry>,
    pub other_imports: Vec<UsageEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SuiteOutcome {
    pub name: String,
    pub required: bool,
    pub success: bool,
    pub exit_code: Option<i32>,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Combined result of the selected test suites.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TestReport {
    /// True iff at least one required suite ran and every required suite
    /// succeeded. A run with nothing required is not a positive signal.
    pub passed: bool,
    pub suites: Vec<SuiteOutcome>,
}

impl TestReport {
    #[must_use]
    pub fn from_suites(suites: Vec<SuiteOutcome>) -> Self {
        let mut required = suites.iter().filter(|s| s.required).peekable();
        let passed = required.peek().is_some() && required.all(|s| s.success);
        Self { passed, suites }
    }

    #[must_use]
    pub fn required_count(&self) -> usize {
        self.suites.iter().filter(|s| s.required).count()
    }

    #[must_use]
    pub fn passed_count(&self) -> usize {
        self.suites.iter().map(|s| s.passed).sum()
    }

    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.suites.iter().map(|s| s.failed + s.errors).sum()
    }

    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.suites.iter().map(|s| s.skipped).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suite(name: &str, required: bool, success: bool) -> SuiteOutcome {
        SuiteOutcome {
            name: name.to_string(),
            required,
            success,
            passed: 3,
            failed: usize::from(!success),
            ..SuiteOutcome::default()
        }
    }

    #[test]
    fn optional_suite_failure_does_not_fail_report() {
        let report =
            TestReport::from_suites(vec![suite("unit", true, true), suite("lint", false, false)]);
        assert!(report.passed);
        assert_eq!(report.passed_count(), 6);
        assert_eq!(report.failed_count(), 1);
    }

    #[test]
    fn required_suite_failure_fails_report() {
        let report = TestReport::from_suites(vec![suite("unit", true, false)]);
        assert!(!report.passed);
    }

    #[test]
    fn empty_report_does_not_pass() {
        assert!(!TestReport::from_suites(Vec::new()).passed);
    }

    #[test]
    fn only_optional_suites_do_not_pass() {
        let report = TestReport::from_suites(vec![suite("lint", false, true)]);
        assert!(!report.passed);
        assert_eq!(report.passed_count(), 3);
    }
}
