use serde::Deserialize;

use sdkup_core::{ReleaseNote, SectionKind, Sections};

use crate::keywords::SectionKeywords;

const BULLET_MARKERS: [char; 3] = ['-', '*', '•'];

/// Which lines may act as section headings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeaderMatching {
    /// Headings are recognized on any line, bullets included. A bullet such
    /// as `- Added retries` switches to the features section and is dropped.
    EveryLine,
    /// Only non-bullet lines are checked for heading keywords, so bullets are
    /// always kept as content.
    #[default]
    NonBulletLines,
}

#[derive(Debug, Clone, Default)]
pub struct ReleaseNoteParser {
    keywords: SectionKeywords,
    header_matching: HeaderMatching,
}

impl ReleaseNoteParser {
    #[must_use]
    pub fn new(keywords: SectionKeywords) -> Self {
        Self {
            keywords,
            header_matching: HeaderMatching::default(),
        }
    }

    #[must_use]
    pub fn with_header_matching(mut self, header_matching: HeaderMatching) -> Self {
        self.header_matching = header_matching;
        self
    }

    #[must_use]
    pub fn keywords(&self) -> &SectionKeywords {
        &self.keywords
    }

    /// Splits a release body into sections.
    ///
    /// Lines start out in [`SectionKind::Other`]. A heading line switches the
    /// active section and contributes no content; a bullet line is stripped of
    /// its marker and appended to the active section; anything else is
    /// ignored.
    #[must_use]
    pub fn parse(&self, body: &str) -> Sections {
        let mut sections = Sections::default();
        let mut current = SectionKind::Other;

        for line in body.lines() {
            let trimmed = line.trim();
            let is_bullet = trimmed.starts_with(BULLET_MARKERS);

            let may_be_heading = match self.header_matching {
                HeaderMatching::EveryLine => true,
                HeaderMatching::NonBulletLines => !is_bullet,
            };
            if may_be_heading {
                if let Some(kind) = self.keywords.heading_for(&trimmed.to_lowercase()) {
                    current = kind;
                    continue;
                }
            }

            if is_bullet {
                let item = trimmed
                    .trim_start_matches(|c: char| BULLET_MARKERS.contains(&c) || c == ' ')
                    .trim();
                if !item.is_empty() {
                    sections.push(current, item);
                }
            }
        }

        sections
    }

    /// Fills in the note's sections from its body.
    #[must_use]
    pub fn parse_note(&self, note: ReleaseNote) -> ReleaseNote {
        let sections = self.parse(&note.body);
        note.with_sections(sections)
    }
}

/// Parses with the default keyword set.
#[must_use]
pub fn parse_sections(body: &str) -> Sections {
    ReleaseNoteParser::default().parse(body)
}
