mod keywords;
mod parse;

pub use keywords::SectionKeywords;
pub use parse::{HeaderMatching, ReleaseNoteParser, parse_sections};
