use serde::Deserialize;

use sdkup_core::SectionKind;

/// Lowercase substrings that mark a line as a section heading.
///
/// Lists are consulted in a fixed priority order: breaking changes, then
/// features, then bug fixes, then deprecations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SectionKeywords {
    pub breaking_changes: Vec<String>,
    pub features: Vec<String>,
    pub bug_fixes: Vec<String>,
    pub deprecations: Vec<String>,
}

impl Default for SectionKeywords {
    fn default() -> Self {
        Self {
            breaking_changes: words(&["breaking"]),
            features: words(&["feature", "added", "new"]),
            bug_fixes: words(&["fix", "bug", "patch"]),
            deprecations: words(&["deprecat"]),
        }
    }
}

impl SectionKeywords {
    /// Returns the section a lowercased line switches to, if any.
    #[must_use]
    pub fn heading_for(&self, lowered: &str) -> Option<SectionKind> {
        [
            (SectionKind::BreakingChanges, &self.breaking_changes),
            (SectionKind::Features, &self.features),
            (SectionKind::BugFixes, &self.bug_fixes),
            (SectionKind::Deprecations, &self.deprecations),
        ]
        .into_iter()
        .find(|(_, list)| list.iter().any(|word| lowered.contains(word.as_str())))
        .map(|(kind, _)| kind)
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| (*w).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breaking_wins_over_features() {
        let keywords = SectionKeywords::default();
        assert_eq!(
            keywords.heading_for("## breaking: new api"),
            Some(SectionKind::BreakingChanges)
        );
    }

    #[test]
    fn features_win_over_fixes() {
        let keywords = SectionKeywords::default();
        assert_eq!(
            keywords.heading_for("new bug fixes"),
            Some(SectionKind::Features)
        );
    }

    #[test]
    fn deprecation_prefix_matches() {
        let keywords = SectionKeywords::default();
        assert_eq!(
            keywords.heading_for("### deprecations"),
            Some(SectionKind::Deprecations)
        );
        assert_eq!(keywords.heading_for("## what's changed"), None);
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let keywords: SectionKeywords =
            toml::from_str(r#"features = ["enhancement"]"#).expect("valid keywords");
        assert_eq!(keywords.features, vec!["enhancement".to_string()]);
        assert_eq!(keywords.breaking_changes, vec!["breaking".to_string()]);
        assert_eq!(
            keywords.heading_for("enhancements"),
            Some(SectionKind::Features)
        );
    }
}
