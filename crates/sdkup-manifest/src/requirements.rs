use std::fmt;

use regex::{Captures, Regex};
use serde::Serialize;

use crate::error::{ManifestError, Result};

/// Version specifier forms recognised in a requirement line, in match priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpecifierKind {
    Exact,
    Minimum,
    Compatible,
    ExactWithExtras,
}

impl SpecifierKind {
    pub const PRIORITY: [Self; 4] = [
        Self::Exact,
        Self::Minimum,
        Self::Compatible,
        Self::ExactWithExtras,
    ];

    fn operator(self) -> &'static str {
        match self {
            Self::Exact | Self::ExactWithExtras => "==",
            Self::Minimum => ">=",
            Self::Compatible => "~=",
        }
    }

    fn pattern(self, package: &str) -> Result<Regex> {
        let name = regex::escape(package);
        let extras = match self {
            Self::ExactWithExtras => r"\[[^\]\n]*\]",
            _ => "",
        };
        let source = format!(
            r"(?im)(^|[^\w.-])({name}{extras}){op}([^\s,;]+)",
            op = regex::escape(self.operator()),
        );
        Regex::new(&source).map_err(|source| ManifestError::InvalidPackageName {
            package: package.to_string(),
            source,
        })
    }
}

impl fmt::Display for SpecifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExactWithExtras => f.write_str("[extras]=="),
            other => f.write_str(other.operator()),
        }
    }
}

/// Returns the first pinned version of `package`, trying specifier kinds in priority order.
///
/// # Errors
///
/// Returns `ManifestError::InvalidPackageName` if the name cannot form a pattern.
pub fn find_pin(content: &str, package: &str) -> Result<Option<(SpecifierKind, String)>> {
    for kind in SpecifierKind::PRIORITY {
        if let Some(caps) = kind.pattern(package)?.captures(content) {
            return Ok(Some((kind, caps[3].to_string())));
        }
    }
    Ok(None)
}

/// Rewrites every occurrence of the first matching specifier kind.
///
/// Later kinds are left alone once one kind matched. Returns `None` when the
/// package is not pinned at all.
///
/// # Errors
///
/// Returns `ManifestError::InvalidPackageName` if the name cannot form a pattern.
pub fn rewrite_pin(
    content: &str,
    package: &str,
    version: &str,
) -> Result<Option<(String, SpecifierKind)>> {
    for kind in SpecifierKind::PRIORITY {
        let pattern = kind.pattern(package)?;
        if !pattern.is_match(content) {
            continue;
        }
        let rewritten = pattern.replace_all(content, |caps: &Captures<'_>| {
            format!("{}{}{}{version}", &caps[1], &caps[2], kind.operator())
        });
        return Ok(Some((rewritten.into_owned(), kind)));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    const REQUIREMENTS: &str = "fastapi==0.110.0\nstrands-agents==0.1.0\nstrands-agents-tools>=0.1.0\n";

    #[test]
    fn finds_exact_pin() {
        let pin = find_pin(REQUIREMENTS, "strands-agents").expect("valid requirements");
        assert_eq!(pin, Some((SpecifierKind::Exact, "0.1.0".to_string())));
    }

    #[test]
    fn finds_minimum_pin_for_other_package() {
        let pin = find_pin(REQUIREMENTS, "strands-agents-tools").expect("valid requirements");
        assert_eq!(pin, Some((SpecifierKind::Minimum, "0.1.0".to_string())));
    }

    #[test]
    fn match_is_case_insensitive() {
        let pin = find_pin("Strands-Agents~=1.2\n", "strands-agents").expect("valid requirements");
        assert_eq!(pin, Some((SpecifierKind::Compatible, "1.2".to_string())));
    }

    #[test]
    fn extras_form_is_last_resort() {
        let pin = find_pin("strands-agents[otel]==0.3.0\n", "strands-agents")
            .expect("valid requirements");
        assert_eq!(pin, Some((SpecifierKind::ExactWithExtras, "0.3.0".to_string())));
    }

    #[test]
    fn prefixed_names_do_not_match() {
        let pin =
            find_pin("my-strands-agents==1.0\n", "strands-agents").expect("valid requirements");
        assert_eq!(pin, None);
    }

    #[test]
    fn rewrite_replaces_only_target_package() {
        let (updated, kind) = rewrite_pin(REQUIREMENTS, "strands-agents", "0.2.0")
            .expect("valid requirements")
            .expect("package pinned");
        assert_eq!(kind, SpecifierKind::Exact);
        assert_eq!(
            updated,
            "fastapi==0.110.0\nstrands-agents==0.2.0\nstrands-agents-tools>=0.1.0\n"
        );
    }

    #[test]
    fn rewrite_keeps_operator_and_trailing_comment() {
        let (updated, _) = rewrite_pin("strands-agents>=0.1.0  # sdk\n", "strands-agents", "0.2.0")
            .expect("valid requirements")
            .expect("package pinned");
        assert_eq!(updated, "strands-agents>=0.2.0  # sdk\n");
    }

    #[test]
    fn rewrite_only_touches_first_matching_kind() {
        let content = "strands-agents==0.1.0\nstrands-agents>=0.0.9\n";
        let (updated, kind) = rewrite_pin(content, "strands-agents", "0.2.0")
            .expect("valid requirements")
            .expect("package pinned");
        assert_eq!(kind, SpecifierKind::Exact);
        assert_eq!(updated, "strands-agents==0.2.0\nstrands-agents>=0.0.9\n");
    }

    #[test]
    fn rewrite_keeps_extras() {
        let (updated, _) = rewrite_pin("strands-agents[otel]==0.1.0\n", "strands-agents", "0.2.0")
            .expect("valid requirements")
            .expect("package pinned");
        assert_eq!(updated, "strands-agents[otel]==0.2.0\n");
    }

    #[test]
    fn rewrite_reports_missing_package() {
        assert!(rewrite_pin(REQUIREMENTS, "boto3", "1.0").expect("valid requirements").is_none());
    }

    #[test]
    fn version_with_dollar_is_literal() {
        let (updated, _) = rewrite_pin("pkg==1\n", "pkg", "$2")
            .expect("valid requirements")
            .expect("package pinned");
        assert_eq!(updated, "pkg==$2\n");
    }
}
