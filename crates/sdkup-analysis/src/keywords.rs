use serde::Deserialize;

use sdkup_core::{AffectedArea, ChangeType};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ChangeTypeKeywords {
    pub removal: Vec<String>,
    pub rename: Vec<String>,
    pub modification: Vec<String>,
    pub signature_change: Vec<String>,
}

impl Default for ChangeTypeKeywords {
    fn default() -> Self {
        Self {
            removal: words(&["removed", "delete", "drop"]),
            rename: words(&["renamed", "rename", "moved"]),
            modification: words(&["changed", "modify", "update"]),
            signature_change: words(&["parameter", "argument", "signature"]),
        }
    }
}

impl ChangeTypeKeywords {
    /// First matching type in priority order, or [`ChangeType::Unknown`].
    #[must_use]
    pub fn match_type(&self, lowered: &str) -> ChangeType {
        [
            (ChangeType::Removal, &self.removal),
            (ChangeType::Rename, &self.rename),
            (ChangeType::Modification, &self.modification),
            (ChangeType::SignatureChange, &self.signature_change),
        ]
        .into_iter()
        .find(|(_, list)| contains_any(lowered, list))
        .map_or(ChangeType::Unknown, |(kind, _)| kind)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct AreaKeywords {
    pub imports: Vec<String>,
    pub agent: Vec<String>,
    pub model_provider: Vec<String>,
    pub tools: Vec<String>,
    pub configuration: Vec<String>,
}

impl Default for AreaKeywords {
    fn default() -> Self {
        Self {
            imports: words(&["import", "module"]),
            agent: words(&["agent", "agent class"]),
            model_provider: words(&["model", "provider", "bedrock", "openai"]),
            tools: words(&["tool", "tools"]),
            configuration: words(&["config", "setting"]),
        }
    }
}

impl AreaKeywords {
    #[must_use]
    pub fn match_area(&self, lowered: &str) -> AffectedArea {
        [
            (AffectedArea::Imports, &self.imports),
            (AffectedArea::Agent, &self.agent),
            (AffectedArea::ModelProvider, &self.model_provider),
            (AffectedArea::Tools, &self.tools),
            (AffectedArea::Configuration, &self.configuration),
        ]
        .into_iter()
        .find(|(_, list)| contains_any(lowered, list))
        .map_or(AffectedArea::Unknown, |(area, _)| area)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ClassifierKeywords {
    pub change_types: ChangeTypeKeywords,
    pub areas: AreaKeywords,
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|needle| haystack.contains(needle.as_str()))
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| (*w).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn change_type_priority_prefers_removal() {
        let keywords = ChangeTypeKeywords::default();
        assert_eq!(
            keywords.match_type("removed and renamed things"),
            ChangeType::Removal
        );
    }

    #[test]
    fn area_priority_prefers_imports_over_agent() {
        let keywords = AreaKeywords::default();
        assert_eq!(
            keywords.match_area("agent module moved"),
            AffectedArea::Imports
        );
    }

    #[test]
    fn unmatched_text_is_unknown() {
        assert_eq!(
            ChangeTypeKeywords::default().match_type("something else"),
            ChangeType::Unknown
        );
        assert_eq!(
            AreaKeywords::default().match_area("something else"),
            AffectedArea::Unknown
        );
    }

    #[test]
    fn nested_tables_override_independently() {
        let keywords: ClassifierKeywords = toml::from_str(
            r#"
            [areas]
            tools = ["mcp"]
            "#,
        )
        .expect("valid keywords");
        assert_eq!(keywords.areas.tools, vec!["mcp".to_string()]);
        assert_eq!(keywords.change_types, ChangeTypeKeywords::default());
        assert_eq!(keywords.areas.match_area("mcp server"), AffectedArea::Tools);
    }
}
