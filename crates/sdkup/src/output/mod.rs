mod plain;
mod step_outputs;

use clap::ValueEnum;
use serde::Serialize;

use crate::error::Result;

pub(crate) use plain::PlainTextFormatter;
pub(crate) use step_outputs::StepOutputs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
