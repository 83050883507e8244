use sdkup_core::{ChangeItem, DeprecationItem};

use crate::keywords::ClassifierKeywords;

/// Assigns a change type and an affected area to breaking-change lines.
#[derive(Debug, Clone, Default)]
pub struct ChangeClassifier {
    keywords: ClassifierKeywords,
}

impl ChangeClassifier {
    #[must_use]
    pub fn new(keywords: ClassifierKeywords) -> Self {
        Self { keywords }
    }

    /// Matching is case-insensitive; the description keeps its original text.
    #[must_use]
    pub fn classify_change(&self, text: &str) -> ChangeItem {
        let lowered = text.to_lowercase();
        ChangeItem::new(
            text,
            self.keywords.change_types.match_type(&lowered),
            self.keywords.areas.match_area(&lowered),
        )
    }

    #[must_use]
    pub fn classify_deprecation(&self, text: &str) -> DeprecationItem {
        DeprecationItem::new(text)
    }
}
