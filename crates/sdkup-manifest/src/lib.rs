mod error;
mod format;
mod pyproject;
mod requirements;

pub use error::{ManifestError, Result};
pub use format::{ManifestFormat, read_version, set_version, verify_version};
pub use requirements::{SpecifierKind, find_pin, rewrite_pin};
