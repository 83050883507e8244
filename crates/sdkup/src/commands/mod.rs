mod analyze;
mod check_version;
mod release;
mod summary;
mod update;

use std::path::Path;

use clap::{Args, Subcommand};
use tracing::debug;

use sdkup_forge::{ClientOptions, DEFAULT_API_BASE, GitHubClient, PyPiClient};
use sdkup_operations::operations::ChangelogAnalysisOperation;
use sdkup_operations::providers::{GitHubProvider, PyPiProvider};
use sdkup_project::{Project, load_project};

use crate::environment::Environment;
use crate::error::Result;
use crate::output::{OutputFormat, StepOutputs};

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Compare the pinned SDK version with the latest published one
    CheckVersion(CheckVersionArgs),
    /// Analyze the upstream releases between two versions
    Analyze(AnalyzeArgs),
    /// Analyze a single upstream release
    Release(ReleaseArgs),
    /// List upstream releases newer than a version
    Summary(SummaryArgs),
    /// Bump the SDK, apply fixes, run tests and open a pull request
    Update(UpdateArgs),
}

#[derive(Args)]
pub(crate) struct CheckVersionArgs {
    /// Report an update even when the pinned version is current
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub(crate) struct AnalyzeArgs {
    #[arg(long)]
    pub current_version: String,

    /// Version to upgrade to (default: latest release)
    #[arg(long)]
    pub target_version: Option<String>,
}

#[derive(Args)]
pub(crate) struct ReleaseArgs {
    /// Release tag, with or without a leading `v`
    pub tag: String,
}

#[derive(Args)]
pub(crate) struct SummaryArgs {
    #[arg(long)]
    pub current_version: String,
}

#[derive(Args)]
pub(crate) struct UpdateArgs {
    /// Run the update even when the pinned version is current
    #[arg(long)]
    pub force: bool,

    #[arg(long)]
    pub skip_tests: bool,

    /// Commit locally without pushing or opening a pull request
    #[arg(long)]
    pub dry_run: bool,

    /// Test suite to run; repeat for several (default: all configured suites)
    #[arg(long = "test", value_name = "SUITE")]
    pub tests: Vec<String>,
}

/// Everything a command needs besides its own arguments.
pub(crate) struct Context {
    pub project: Project,
    pub env: Environment,
    pub format: OutputFormat,
}

impl Context {
    pub(crate) fn load(
        start_path: &Path,
        config: Option<&Path>,
        format: OutputFormat,
    ) -> Result<Self> {
        let project = load_project(start_path, config)?;
        debug!(
            root = %project.root.display(),
            config = ?project.config_path,
            "resolved project"
        );
        Ok(Self {
            project,
            env: Environment::from_env(),
            format,
        })
    }

    fn github(&self) -> Result<GitHubProvider> {
        let config = &self.project.config;
        let http = &config.http;
        let client = GitHubClient::new(ClientOptions {
            api_base: http
                .api_base
                .clone()
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            token: self.env.token.clone(),
            timeout: http.timeout(),
        })?
        .with_parser(config.parser());
        Ok(GitHubProvider::new(client))
    }

    fn pypi(&self) -> Result<PyPiProvider> {
        let http = &self.project.config.http;
        let client = PyPiClient::new(http.pypi_base.clone(), http.timeout())?;
        Ok(PyPiProvider::new(client))
    }

    fn changelog(&self) -> Result<ChangelogAnalysisOperation<GitHubProvider>> {
        let config = &self.project.config;
        Ok(ChangelogAnalysisOperation::new(
            self.github()?,
            config.aggregator(),
            config.sdk.release_repository.as_str(),
            config.http.page_size,
        ))
    }

    fn write_step_outputs(&self, outputs: &StepOutputs) -> Result<()> {
        match &self.env.output_path {
            Some(path) => outputs.append_to(path),
            None => Ok(()),
        }
    }
}

impl Commands {
    /// Returns whether the command's result counts as a success.
    pub(crate) fn execute(self, context: &Context) -> Result<bool> {
        match self {
            Self::CheckVersion(args) => check_version::run(&args, context),
            Self::Analyze(args) => analyze::run(&args, context),
            Self::Release(args) => release::run(&args, context),
            Self::Summary(args) => summary::run(&args, context),
            Self::Update(args) => update::run(args, context),
        }
    }
}
