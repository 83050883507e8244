use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use sdkup_core::{AffectedArea, ChangeItem, ChangeType};

/// `old -> new`, `old => new` or `old to new`, optionally quoted.
fn rename_pattern() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(r#"(?i)['"`]?([\w.]+)['"`]?\s*(?:->|=>|\bto\b)\s*['"`]?([\w.]+)['"`]?"#)
            .expect("valid rename regex")
    })
}

fn removal_pattern() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| {
        Regex::new(
            r#"(?i)\b(?:removed?|deleted?|dropped?)\s+(?:(?:the|an?)\s+)?['"`]?([\w.]+)['"`]?"#,
        )
        .expect("valid removal regex")
    })
}

fn identifier(raw: &str) -> String {
    raw.trim_end_matches('.').to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FixSuggestion {
    FindReplace { find: String, replace: String },
    Warning { identifier: String, message: String },
    ManualReview { reason: String },
}

impl FixSuggestion {
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::FindReplace { find, replace } => format!("Rename '{find}' to '{replace}'"),
            Self::Warning { message, .. } => message.clone(),
            Self::ManualReview { reason } => reason.clone(),
        }
    }
}

/// Suggestions for one breaking change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FixSuggestions {
    pub change: ChangeItem,
    pub suggestions: Vec<FixSuggestion>,
}

impl FixSuggestions {
    /// True when nothing was suggested or any suggestion needs a human.
    #[must_use]
    pub fn requires_manual_review(&self) -> bool {
        self.suggestions.is_empty()
            || self
                .suggestions
                .iter()
                .any(|s| matches!(s, FixSuggestion::ManualReview { .. }))
    }

    /// Only find/replace pairs with no manual review are applied unattended.
    #[must_use]
    pub fn is_auto_applicable(&self) -> bool {
        !self.requires_manual_review() && self.replacements().next().is_some()
    }

    pub fn replacements(&self) -> impl Iterator<Item = (&str, &str)> {
        self.suggestions.iter().filter_map(|s| match s {
            FixSuggestion::FindReplace { find, replace } => Some((find.as_str(), replace.as_str())),
            _ => None,
        })
    }

    /// Applies every find/replace pair on whole-identifier boundaries.
    ///
    /// Returns `None` when the content is unchanged.
    #[must_use]
    pub fn apply(&self, content: &str) -> Option<String> {
        let mut updated = content.to_string();
        for (find, replace) in self.replacements() {
            let Ok(pattern) = Regex::new(&format!(r"\b{}\b", regex::escape(find))) else {
                continue;
            };
            updated = pattern.replace_all(&updated, regex::NoExpand(replace)).into_owned();
        }
        (updated != content).then_some(updated)
    }
}

/// Derives mechanical fixes from a classified breaking change.
#[must_use]
pub fn suggest_fixes(change: &ChangeItem) -> FixSuggestions {
    let mut suggestions = Vec::new();
    let description = change.description.as_str();

    if change.change_type == ChangeType::Rename {
        if let Some(caps) = rename_pattern().captures(description) {
            let find = identifier(&caps[1]);
            let replace = identifier(&caps[2]);
            if find != replace {
                suggestions.push(FixSuggestion::FindReplace { find, replace });
            }
        }
    }

    if change.affected_area == AffectedArea::Imports {
        suggestions.push(FixSuggestion::ManualReview {
            reason: "Review import statements for SDK packages".to_string(),
        });
    }

    if change.change_type == ChangeType::SignatureChange {
        suggestions.push(FixSuggestion::ManualReview {
            reason: "Review function/method calls that match the changed signature".to_string(),
        });
    }

    if change.change_type == ChangeType::Removal {
        if let Some(caps) = removal_pattern().captures(description) {
            let removed = identifier(&caps[1]);
            suggestions.push(FixSuggestion::Warning {
                message: format!("'{removed}' has been removed. Find alternative or remove usage."),
                identifier: removed,
            });
        }
    }

    FixSuggestions {
        change: change.clone(),
        suggestions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(text: &str, change_type: ChangeType, area: AffectedArea) -> ChangeItem {
        ChangeItem::new(text, change_type, area)
    }

    #[test]
    fn rename_with_to_yields_find_replace() {
        let fixes = suggest_fixes(&change(
            "Renamed bar to baz",
            ChangeType::Rename,
            AffectedArea::Unknown,
        ));
        assert_eq!(
            fixes.suggestions,
            vec![FixSuggestion::FindReplace {
                find: "bar".to_string(),
                replace: "baz".to_string()
            }]
        );
        assert!(fixes.is_auto_applicable());
    }

    #[test]
    fn rename_with_arrow_and_backticks() {
        let fixes = suggest_fixes(&change(
            "Renamed `Agent.run` -> `Agent.invoke`",
            ChangeType::Rename,
            AffectedArea::Agent,
        ));
        let pairs: Vec<_> = fixes.replacements().collect();
        assert_eq!(pairs, vec![("Agent.run", "Agent.invoke")]);
    }

    #[test]
    fn rename_of_imports_needs_manual_review() {
        let fixes = suggest_fixes(&change(
            "Renamed module old_mod => new_mod",
            ChangeType::Rename,
            AffectedArea::Imports,
        ));
        assert!(fixes.replacements().next().is_some());
        assert!(fixes.requires_manual_review());
        assert!(!fixes.is_auto_applicable());
    }

    #[test]
    fn signature_change_needs_manual_review() {
        let fixes = suggest_fixes(&change(
            "New parameter on invoke",
            ChangeType::SignatureChange,
            AffectedArea::Unknown,
        ));
        assert!(fixes.requires_manual_review());
    }

    #[test]
    fn removal_yields_warning_and_is_not_applied() {
        let fixes = suggest_fixes(&change(
            "Removed the old_helper function",
            ChangeType::Removal,
            AffectedArea::Unknown,
        ));
        assert_eq!(
            fixes.suggestions,
            vec![FixSuggestion::Warning {
                identifier: "old_helper".to_string(),
                message: "'old_helper' has been removed. Find alternative or remove usage."
                    .to_string(),
            }]
        );
        assert!(!fixes.requires_manual_review());
        assert!(!fixes.is_auto_applicable());
    }

    #[test]
    fn unmatched_change_requires_manual_review() {
        let fixes = suggest_fixes(&change(
            "Changed behaviour of streaming",
            ChangeType::Modification,
            AffectedArea::Unknown,
        ));
        assert!(fixes.suggestions.is_empty());
        assert!(fixes.requires_manual_review());
    }

    #[test]
    fn apply_replaces_whole_identifiers_only() {
        let fixes = suggest_fixes(&change(
            "Renamed bar to baz",
            ChangeType::Rename,
            AffectedArea::Unknown,
        ));
        let updated = fixes.apply("bar()\nfoobar = bar\n").expect("fixes apply");
        assert_eq!(updated, "baz()\nfoobar = baz\n");
        assert!(fixes.apply("nothing here").is_none());
    }
}
