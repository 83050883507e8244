use sdkup_operations::operations::VersionCheckOperation;
use sdkup_operations::providers::FileManifestEditor;

use super::{CheckVersionArgs, Context};
use crate::error::Result;
use crate::output::{OutputFormat, PlainTextFormatter, StepOutputs, print_json};

pub(crate) fn run(args: &CheckVersionArgs, context: &Context) -> Result<bool> {
    let project = &context.project;
    let operation = VersionCheckOperation::new(FileManifestEditor::new(), context.pypi()?);
    let output = operation.execute(
        &project.manifest_path(),
        project.config.sdk.primary_package(),
        args.force,
    )?;

    let mut outputs = StepOutputs::default();
    outputs
        .set("has_update", output.has_update)
        .set("current_version", &output.current_version)
        .set("latest_version", &output.latest_version)
        .set("update_type", output.update_type);
    context.write_step_outputs(&outputs)?;

    match context.format {
        OutputFormat::Json => print_json(&output)?,
        OutputFormat::Text => print!("{}", PlainTextFormatter::format_version_check(&output)),
    }
    Ok(true)
}
