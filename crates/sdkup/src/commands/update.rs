use tracing::info;

use sdkup_operations::WorkflowReport;
use sdkup_operations::operations::{UpdateWorkflow, WorkflowOptions};
use sdkup_operations::providers::{CommandTestRunner, FileManifestEditor, Git2Provider};

use super::{Context, UpdateArgs};
use crate::error::Result;
use crate::output::{OutputFormat, PlainTextFormatter, StepOutputs, print_json};

pub(crate) fn run(args: UpdateArgs, context: &Context) -> Result<bool> {
    let github = context.github()?;
    let vcs = match &context.env.token {
        Some(token) => Git2Provider::with_token(token.clone()),
        None => Git2Provider::new(),
    };
    let runner = CommandTestRunner::new(context.project.config.tests.suites.clone());

    let workflow = UpdateWorkflow::new(
        context.project.clone(),
        &github,
        context.pypi()?,
        FileManifestEditor::new(),
        vcs,
        &github,
        runner,
    );
    let options = WorkflowOptions {
        force: args.force,
        skip_tests: args.skip_tests,
        dry_run: args.dry_run,
        test_selectors: args.tests,
        repository: context.env.repository.clone(),
    };

    let report = workflow.run(&options);
    info!(success = report.success, "update workflow finished");

    context.write_step_outputs(&step_outputs(&report))?;

    match context.format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => print!("{}", PlainTextFormatter::format_report(&report)),
    }
    Ok(report.success)
}

fn step_outputs(report: &WorkflowReport) -> StepOutputs {
    let pr = report.pull_request.as_ref();
    let mut outputs = StepOutputs::default();
    outputs
        .set("update_performed", report.update_performed())
        .set("current_version", report.current_version().unwrap_or_default())
        .set("target_version", report.target_version().unwrap_or_default())
        .set("branch_name", report.branch_name().unwrap_or_default())
        .set("pr_number", pr.map(|p| p.number.to_string()).unwrap_or_default())
        .set("pr_url", pr.map(|p| p.url.as_str()).unwrap_or_default())
        .set("changes_made", report.changes_made());
    outputs
}
