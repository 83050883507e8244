use std::fmt::Write as _;
use std::fs::OpenOptions;
use std::io::Write as _;
use std::path::Path;

use crate::error::{CliError, Result};

const DELIMITER: &str = "SDKUP_OUTPUT_EOF";

/// Key/value pairs for the `GITHUB_OUTPUT` step outputs file.
#[derive(Debug, Default)]
pub(crate) struct StepOutputs {
    entries: Vec<(&'static str, String)>,
}

impl StepOutputs {
    pub(crate) fn set(&mut self, key: &'static str, value: impl ToString) -> &mut Self {
        self.entries.push((key, value.to_string()));
        self
    }

    /// Multi-line values use the heredoc form.
    pub(crate) fn render(&self) -> String {
        let mut rendered = String::new();
        for (key, value) in &self.entries {
            if value.contains('\n') {
                let _ = writeln!(rendered, "{key}<<{DELIMITER}\n{value}\n{DELIMITER}");
            } else {
                let _ = writeln!(rendered, "{key}={value}");
            }
        }
        rendered
    }

    /// Appends to `path`; the runner may have written other steps' outputs already.
    pub(crate) fn append_to(&self, path: &Path) -> Result<()> {
        let to_error = |source| CliError::StepOutput {
            path: path.to_path_buf(),
            source,
        };
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(to_error)?;
        file.write_all(self.render().as_bytes()).map_err(to_error)
    }
}
