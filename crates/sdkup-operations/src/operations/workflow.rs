use tracing::{info, warn};

use sdkup_analysis::UpgradeAnalysis;
use sdkup_forge::RepositoryInfo;
use sdkup_project::Project;

use crate::Result;
use crate::error::OperationError;
use crate::operations::changelog::ChangelogAnalysisOperation;
use crate::operations::code_update::{CodeUpdateInput, CodeUpdateOperation, CodeUpdateOutput};
use crate::operations::pull_request::{PullRequestInput, PullRequestOperation};
use crate::operations::version_check::VersionCheckOperation;
use crate::report::{Stage, WorkflowReport};
use crate::traits::{
    ManifestEditor, PackageIndex, PrHost, ReleaseSource, TestRunner, VcsProvider,
};
use crate::types::TestReport;

#[derive(Debug, Clone, Default)]
pub struct WorkflowOptions {
    /// Run every stage even when the pinned version is current.
    pub force: bool,
    pub skip_tests: bool,
    /// Update and commit locally; no push and no pull request.
    pub dry_run: bool,
    /// Suites to run; empty runs all configured suites.
    pub test_selectors: Vec<String>,
    /// `owner/repo` used when the config names no repository.
    pub repository: Option<String>,
}

/// Drives check, analyze, update, test and pull request stages in order.
///
/// Every stage outcome lands in the returned [`WorkflowReport`]; no stage
/// error escapes [`UpdateWorkflow::run`].
pub struct UpdateWorkflow<S, I, M, V, H, T> {
    project: Project,
    releases: S,
    index: I,
    manifest: M,
    vcs: V,
    host: H,
    tests: T,
}

impl<S, I, M, V, H, T> UpdateWorkflow<S, I, M, V, H, T>
where
    S: ReleaseSource,
    I: PackageIndex,
    M: ManifestEditor,
    V: VcsProvider,
    H: PrHost,
    T: TestRunner,
{
    pub fn new(
        project: Project,
        releases: S,
        index: I,
        manifest: M,
        vcs: V,
        host: H,
        tests: T,
    ) -> Self {
        Self {
            project,
            releases,
            index,
            manifest,
            vcs,
            host,
            tests,
        }
    }

    #[must_use]
    pub fn run(&self, options: &WorkflowOptions) -> WorkflowReport {
        let mut report = WorkflowReport::default();
        let config = &self.project.config;

        let check = VersionCheckOperation::new(&self.manifest, &self.index).execute(
            &self.project.manifest_path(),
            config.sdk.primary_package(),
            options.force,
        );
        let check = match check {
            Ok(check) => check,
            Err(err) => {
                report.failed(Stage::CheckVersion, &err);
                report.skip_remaining("version check failed");
                return report.finish();
            }
        };

        let current = check.current_version.clone();
        let target = check.latest_version.clone();
        let has_update = check.has_update;
        report.version_check = Some(check);

        if !has_update {
            info!(version = %current, "SDK is up to date");
            report.completed(Stage::CheckVersion, format!("{current} is up to date"));
            report.skip_remaining("up to date");
            return report.finish();
        }
        report.completed(Stage::CheckVersion, format!("{current} -> {target}"));
        info!(current_version = %current, target_version = %target, "SDK update available");

        report.analysis = self.analyze(&mut report, &current, &target);

        let code_update = match self.update_code(&report, &target, options) {
            Ok(output) => output,
            Err(err) => {
                report.failed(Stage::UpdateCode, &err);
                report.skip_remaining("code update failed");
                return report.finish();
            }
        };
        report.completed(
            Stage::UpdateCode,
            format!(
                "{} on {}",
                code_update.commit_sha.as_deref().unwrap_or("no commit"),
                code_update.branch
            ),
        );
        report.code_update = Some(code_update);

        report.tests = self.run_tests(&mut report, options);
        self.create_pull_request(&mut report, &current, &target, options);

        report.finish()
    }

    fn analyze(
        &self,
        report: &mut WorkflowReport,
        current: &str,
        target: &str,
    ) -> Option<UpgradeAnalysis> {
        let config = &self.project.config;
        let operation = ChangelogAnalysisOperation::new(
            &self.releases,
            config.aggregator(),
            config.sdk.release_repository.as_str(),
            config.http.page_size,
        );

        match operation.analyze_upgrade(current, target) {
            Ok(analysis) => {
                report.completed(
                    Stage::AnalyzeChangelog,
                    format!(
                        "{} risk, {} breaking changes",
                        analysis.overall_risk_level, analysis.total_breaking_changes
                    ),
                );
                Some(analysis)
            }
            Err(err) => {
                warn!(error = %err, "changelog analysis failed, continuing without it");
                report.failed(Stage::AnalyzeChangelog, &err);
                None
            }
        }
    }

    fn update_code(
        &self,
        report: &WorkflowReport,
        target: &str,
        options: &WorkflowOptions,
    ) -> Result<CodeUpdateOutput> {
        let config = &self.project.config;
        let patterns = self.project.import_patterns()?;
        let manifest_path = self.project.manifest_path();
        let branch = config.repository.branch_name(target);
        let breaking_changes = report
            .analysis
            .as_ref()
            .map_or(&[][..], |a| a.breaking_changes.as_slice());

        let input = CodeUpdateInput {
            project_root: &self.project.root,
            manifest_path: &manifest_path,
            packages: &config.sdk.packages,
            primary_package: config.sdk.primary_package(),
            version: target,
            branch: &branch,
            base_branch: &config.repository.base_branch,
            remote: &config.repository.remote,
            breaking_changes,
            import_patterns: &patterns,
            push: !options.dry_run,
        };
        CodeUpdateOperation::new(&self.manifest, &self.vcs).execute(&input)
    }

    fn run_tests(
        &self,
        report: &mut WorkflowReport,
        options: &WorkflowOptions,
    ) -> Option<TestReport> {
        if options.skip_tests {
            report.skipped(Stage::RunTests, "skipped by request");
            return None;
        }

        match self.tests.run(&self.project.root, &options.test_selectors) {
            Ok(tests) => {
                let detail = format!(
                    "{} passed, {} failed, {} skipped",
                    tests.passed_count(),
                    tests.failed_count(),
                    tests.skipped_count()
                );
                if tests.required_count() == 0 {
                    warn!("no required test suite ran");
                    report.errors.push("No required test suites ran".to_string());
                } else if !tests.passed {
                    warn!("{detail}");
                    report.errors.push("Tests failed".to_string());
                }
                report.completed(Stage::RunTests, detail);
                Some(tests)
            }
            Err(err) => {
                report.failed(Stage::RunTests, &err);
                None
            }
        }
    }

    fn create_pull_request(
        &self,
        report: &mut WorkflowReport,
        current: &str,
        target: &str,
        options: &WorkflowOptions,
    ) {
        if options.dry_run {
            report.skipped(Stage::CreatePr, "dry run");
            return;
        }
        let Some(code_update) = report.code_update.as_ref() else {
            report.skipped(Stage::CreatePr, "no update branch");
            return;
        };
        if code_update.commit_sha.is_none() {
            report.skipped(Stage::CreatePr, "nothing was committed");
            return;
        }
        let head = code_update.branch.clone();

        let repository = match self.resolve_repository(options) {
            Ok(repository) => repository,
            Err(err) => {
                report.failed(Stage::CreatePr, &err);
                return;
            }
        };

        let config = &self.project.config;
        let input = PullRequestInput {
            repository: &repository,
            current_version: current,
            target_version: target,
            head: &head,
            base: &config.repository.base_branch,
            display_name: &config.sdk.display_name,
            release_repository: &config.sdk.release_repository,
            analysis: report.analysis.as_ref(),
            tests: report.tests.as_ref(),
            reviewers: &config.pull_request.reviewers,
            merge_method: config.pull_request.merge_method,
            draft: config.pull_request.draft,
        };

        let result = PullRequestOperation::new(&self.host, config.merge_policy()).execute(&input);
        match result {
            Ok(outcome) => {
                report.completed(Stage::CreatePr, format!("#{} {}", outcome.number, outcome.url));
                report.pull_request = Some(outcome);
            }
            Err(err) => report.failed(Stage::CreatePr, &err),
        }
    }

    /// Config first, then the caller's fallback, then the remote URL.
    fn resolve_repository(&self, options: &WorkflowOptions) -> Result<String> {
        let config = &self.project.config.repository;
        if let Some(name) = config.name.as_deref().or(options.repository.as_deref()) {
            return Ok(RepositoryInfo::from_slug(name)?.slug());
        }

        let url = self
            .vcs
            .remote_url(&self.project.root, &config.remote)?
            .ok_or(OperationError::MissingRepository)?;
        Ok(RepositoryInfo::from_url(&url)?.slug())
    }
}
