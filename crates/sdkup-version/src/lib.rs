use std::cmp::Ordering;
use std::fmt;

use sdkup_core::UpdateType;
use serde::{Deserialize, Serialize};

const PRERELEASE_MARKERS: [&str; 6] = ["a", "b", "rc", "dev", "alpha", "beta"];

/// A `major.minor.patch` triple.
///
/// Field order matters: the derived `Ord` compares lexicographically on
/// `(major, minor, patch)`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl SemanticVersion {
    #[must_use]
    pub const fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// Parses leniently. Never fails: absent or unparseable components become `0`.
    ///
    /// Leading `v` characters are stripped. The patch component keeps only the
    /// digits before any `-` suffix, so `1.0.0-beta` parses as `1.0.0`.
    #[must_use]
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim().trim_start_matches('v');
        let mut parts = trimmed.split('.');

        let major = parts.next().map_or(0, parse_component);
        let minor = parts.next().map_or(0, parse_component);
        let patch = parts.next().map_or(0, |raw| {
            let before_suffix = raw.split('-').next().unwrap_or_default();
            leading_digits(before_suffix)
        });

        Self::new(major, minor, patch)
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl From<&str> for SemanticVersion {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

fn parse_component(raw: &str) -> u64 {
    raw.trim().parse().unwrap_or(0)
}

fn leading_digits(raw: &str) -> u64 {
    let end = raw
        .char_indices()
        .find(|(_, c)| !c.is_ascii_digit())
        .map_or(raw.len(), |(idx, _)| idx);
    raw[..end].parse().unwrap_or(0)
}

#[must_use]
pub fn compare(a: &str, b: &str) -> Ordering {
    SemanticVersion::parse(a).cmp(&SemanticVersion::parse(b))
}

/// Reports the magnitude of moving from `current` to `latest`.
///
/// Each field is checked against the same field of `current` in turn
/// (major, then minor, then patch) and the first one that grew wins. The
/// fields are not compared cumulatively: `1.5.9 -> 1.4.0` reports
/// [`UpdateType::None`], and so does any downgrade.
#[must_use]
pub fn classify_update(current: &str, latest: &str) -> UpdateType {
    let current = SemanticVersion::parse(current);
    let latest = SemanticVersion::parse(latest);

    if latest.major > current.major {
        UpdateType::Major
    } else if latest.minor > current.minor {
        UpdateType::Minor
    } else if latest.patch > current.patch {
        UpdateType::Patch
    } else {
        UpdateType::None
    }
}

#[must_use]
pub fn needs_update(current: &str, latest: &str) -> bool {
    compare(latest, current) == Ordering::Greater
}

/// Whether a version string carries a pre-release or development marker.
#[must_use]
pub fn is_prerelease(version: &str) -> bool {
    let lower = version.to_ascii_lowercase();
    PRERELEASE_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Sorts stable versions newest first, dropping pre-releases.
#[must_use]
pub fn stable_versions_descending<'a, I>(versions: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut stable: Vec<&str> = versions.into_iter().filter(|v| !is_prerelease(v)).collect();
    stable.sort_by_key(|v| std::cmp::Reverse(SemanticVersion::parse(v)));
    stable.into_iter().map(str::to_string).collect()
}
