use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info, warn};

use sdkup_project::{SuiteFormat, TestSuiteConfig};

use crate::Result;
use crate::error::OperationError;
use crate::traits::TestRunner;
use crate::types::{SuiteOutcome, TestReport};

fn count_pattern() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r"(?i)(\d+)\s+(passed|failed|skipped|errors?)\b").expect("valid count regex")
    })
}

/// Reads the counts from a pytest summary such as `5 passed, 2 failed, 1 skipped`.
///
/// The last line mentioning passes or failures wins, matching where pytest
/// prints its summary.
fn parse_pytest_counts(output: &str, outcome: &mut SuiteOutcome) {
    let Some(summary) = output.lines().rev().find(|line| {
        let lower = line.to_ascii_lowercase();
        lower.contains("passed") || lower.contains("failed")
    }) else {
        return;
    };

    for caps in count_pattern().captures_iter(summary) {
        let Ok(count) = caps[1].parse::<usize>() else {
            continue;
        };
        match caps[2].to_ascii_lowercase().as_str() {
            "passed" => outcome.passed = count,
            "failed" => outcome.failed = count,
            "skipped" => outcome.skipped = count,
            _ => outcome.errors = count,
        }
    }
}

/// Runs each configured suite as a child process.
#[derive(Debug, Clone, Default)]
pub struct CommandTestRunner {
    suites: Vec<TestSuiteConfig>,
}

impl CommandTestRunner {
    #[must_use]
    pub fn new(suites: Vec<TestSuiteConfig>) -> Self {
        Self { suites }
    }

    fn select(&self, selectors: &[String]) -> Result<Vec<&TestSuiteConfig>> {
        if selectors.is_empty() {
            return Ok(self.suites.iter().collect());
        }

        selectors
            .iter()
            .map(|name| {
                self.suites
                    .iter()
                    .find(|s| &s.name == name)
                    .ok_or_else(|| OperationError::UnknownSuite {
                        name: name.clone(),
                        available: self
                            .suites
                            .iter()
                            .map(|s| s.name.as_str())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            })
            .collect()
    }

    fn run_suite(project_root: &Path, suite: &TestSuiteConfig) -> Result<SuiteOutcome> {
        let working_dir = suite
            .working_dir
            .as_ref()
            .map_or_else(|| project_root.to_path_buf(), |dir| project_root.join(dir));

        info!(suite = %suite.name, program = %suite.program, "running test suite");
        let output = Command::new(&suite.program)
            .args(&suite.args)
            .envs(&suite.env)
            .current_dir(&working_dir)
            .output()
            .map_err(|source| OperationError::TestSpawn {
                suite: suite.name.clone(),
                source,
            })?;

        let mut outcome = SuiteOutcome {
            name: suite.name.clone(),
            required: suite.required,
            success: output.status.success(),
            exit_code: output.status.code(),
            ..SuiteOutcome::default()
        };

        if suite.format == SuiteFormat::Pytest {
            let stdout = String::from_utf8_lossy(&output.stdout);
            parse_pytest_counts(&stdout, &mut outcome);
        }

        if outcome.success {
            debug!(suite = %suite.name, passed = outcome.passed, "suite passed");
        } else {
            warn!(
                suite = %suite.name,
                exit_code = ?outcome.exit_code,
                failed = outcome.failed,
                "suite failed"
            );
        }
        Ok(outcome)
    }
}

impl TestRunner for CommandTestRunner {
    fn run(&self, project_root: &Path, selectors: &[String]) -> Result<TestReport> {
        let suites = self
            .select(selectors)?
            .into_iter()
            .map(|suite| Self::run_suite(project_root, suite))
            .collect::<Result<Vec<_>>>()?;
        Ok(TestReport::from_suites(suites))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn outcome_for(output: &str) -> SuiteOutcome {
        let mut outcome = SuiteOutcome::default();
        parse_pytest_counts(output, &mut outcome);
        outcome
    }

    #[test]
    fn parses_pytest_summary_line() {
        let outcome = outcome_for(
            "tests/test_a.py::test_one PASSED\n\
             ==== 5 passed, 2 failed, 1 skipped, 3 errors in 0.42s ====\n",
        );
        assert_eq!(outcome.passed, 5);
        assert_eq!(outcome.failed, 2);
        assert_eq!(outcome.skipped, 1);
        assert_eq!(outcome.errors, 3);
    }

    #[test]
    fn output_without_summary_leaves_zero_counts() {
        let outcome = outcome_for("collected 0 items\n");
        assert_eq!(outcome, SuiteOutcome::default());
    }

    fn shell_suite(name: &str, script: &str, required: bool) -> TestSuiteConfig {
        TestSuiteConfig {
            name: name.to_string(),
            program: "sh".to_string(),
            args: vec!["-c".to_string(), script.to_string()],
            working_dir: None,
            env: BTreeMap::from([("SUITE_LABEL".to_string(), "ok".to_string())]),
            required,
            format: SuiteFormat::Pytest,
        }
    }

    #[cfg(unix)]
    #[test]
    fn optional_failure_does_not_fail_report() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let runner = CommandTestRunner::new(vec![
            shell_suite("unit", "echo \"3 passed, 1 skipped in 0.1s\"", true),
            shell_suite("lint", "echo \"1 failed\"; exit 1", false),
        ]);

        let report = runner.run(dir.path(), &[])?;

        assert!(report.passed);
        assert_eq!(report.passed_count(), 3);
        assert_eq!(report.failed_count(), 1);
        assert_eq!(report.skipped_count(), 1);
        assert_eq!(report.suites[1].exit_code, Some(1));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn selectors_restrict_suites_and_env_is_passed() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let runner = CommandTestRunner::new(vec![
            shell_suite("unit", "test \"$SUITE_LABEL\" = ok", true),
            shell_suite("sdk", "exit 1", true),
        ]);

        let report = runner.run(dir.path(), &["unit".to_string()])?;

        assert!(report.passed);
        assert_eq!(report.suites.len(), 1);
        Ok(())
    }

    #[test]
    fn no_configured_suites_is_not_a_pass() -> anyhow::Result<()> {
        let report = CommandTestRunner::new(Vec::new()).run(Path::new("."), &[])?;

        assert!(report.suites.is_empty());
        assert!(!report.passed);
        Ok(())
    }

    #[test]
    fn unknown_selector_is_an_error() {
        let runner = CommandTestRunner::new(vec![shell_suite("unit", "true", true)]);
        let err = runner
            .run(Path::new("."), &["e2e".to_string()])
            .expect_err("unknown suite");
        assert!(matches!(
            err,
            OperationError::UnknownSuite { ref name, ref available } if name == "e2e" && available == "unit"
        ));
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let runner = CommandTestRunner::new(vec![TestSuiteConfig {
            program: "sdkup-no-such-program".to_string(),
            ..shell_suite("unit", "", true)
        }]);
        let err = runner.run(Path::new("."), &[]).expect_err("spawn fails");
        assert!(matches!(err, OperationError::TestSpawn { .. }));
    }
}
