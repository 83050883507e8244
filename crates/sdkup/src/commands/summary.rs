use super::{Context, SummaryArgs};
use crate::error::Result;
use crate::output::{OutputFormat, PlainTextFormatter, print_json};

pub(crate) fn run(args: &SummaryArgs, context: &Context) -> Result<bool> {
    let summary = context.changelog()?.releases_since(&args.current_version)?;

    match context.format {
        OutputFormat::Json => print_json(&summary)?,
        OutputFormat::Text => print!("{}", PlainTextFormatter::format_summary(&summary)),
    }
    Ok(true)
}
