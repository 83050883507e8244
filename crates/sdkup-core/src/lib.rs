pub mod error;
mod release;
pub mod types;

pub use error::*;
pub use release::{
    ChangeItem, DeprecationItem, ReleaseNote, SectionKind, Sections, Severity, canonical_tag,
};
pub use types::*;
