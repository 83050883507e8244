use super::{Context, ReleaseArgs};
use crate::error::Result;
use crate::output::{OutputFormat, PlainTextFormatter, print_json};

pub(crate) fn run(args: &ReleaseArgs, context: &Context) -> Result<bool> {
    let analysis = context.changelog()?.analyze_release(&args.tag)?;

    match context.format {
        OutputFormat::Json => print_json(&analysis)?,
        OutputFormat::Text => print!("{}", PlainTextFormatter::format_release(&analysis)),
    }
    Ok(true)
}
