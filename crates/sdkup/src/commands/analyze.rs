use serde::Serialize;

use sdkup_analysis::UpgradeAnalysis;
use sdkup_operations::UsageSummary;
use sdkup_operations::operations::{find_affected_files, usage_summary};

use super::{AnalyzeArgs, Context};
use crate::error::Result;
use crate::output::{OutputFormat, PlainTextFormatter, print_json};

#[derive(Serialize)]
struct AnalyzeOutput {
    analysis: UpgradeAnalysis,
    usage: UsageSummary,
}

pub(crate) fn run(args: &AnalyzeArgs, context: &Context) -> Result<bool> {
    let operation = context.changelog()?;
    let target = operation.resolve_target(args.target_version.as_deref())?;
    let analysis = operation.analyze_upgrade(&args.current_version, &target)?;

    let project = &context.project;
    let affected = find_affected_files(&project.root, &project.import_patterns()?)?;
    let usage = usage_summary(&affected);

    match context.format {
        OutputFormat::Json => print_json(&AnalyzeOutput { analysis, usage })?,
        OutputFormat::Text => print!("{}", PlainTextFormatter::format_upgrade(&analysis, &usage)),
    }
    Ok(true)
}
