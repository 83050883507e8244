use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::error::{ManifestError, Result};
use crate::pyproject;
use crate::requirements::{SpecifierKind, find_pin, rewrite_pin};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ManifestFormat {
    /// Line-oriented `name==version` text.
    Requirements,
    /// PEP 621 `pyproject.toml`.
    Pyproject,
}

impl ManifestFormat {
    #[must_use]
    pub fn detect(path: &Path) -> Self {
        match path.file_name().and_then(|n| n.to_str()) {
            Some("pyproject.toml") => Self::Pyproject,
            _ => Self::Requirements,
        }
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn write(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).map_err(|source| ManifestError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn not_found(path: &Path, package: &str) -> ManifestError {
    ManifestError::PackageNotFound {
        path: path.to_path_buf(),
        package: package.to_string(),
    }
}

/// # Errors
///
/// Returns `ManifestError::PackageNotFound` if the package has no pinned
/// version, or an I/O or parse error if the manifest cannot be loaded.
pub fn read_version(path: &Path, package: &str) -> Result<String> {
    let content = read(path)?;
    let found = match ManifestFormat::detect(path) {
        ManifestFormat::Requirements => find_pin(&content, package)?,
        ManifestFormat::Pyproject => {
            let mut doc = pyproject::parse(path, &content)?;
            pyproject::find(&mut doc, package)?
        }
    };
    found
        .map(|(_, version)| version)
        .ok_or_else(|| not_found(path, package))
}

/// Pins `package` to `version`, rewriting the first specifier form that matches.
///
/// # Errors
///
/// Returns `ManifestError::PackageNotFound` if no specifier for the package
/// exists, or an I/O or parse error if the manifest cannot be loaded or saved.
pub fn set_version(path: &Path, package: &str, version: &str) -> Result<SpecifierKind> {
    let content = read(path)?;

    let (updated, kind) = match ManifestFormat::detect(path) {
        ManifestFormat::Requirements => {
            rewrite_pin(&content, package, version)?.ok_or_else(|| not_found(path, package))?
        }
        ManifestFormat::Pyproject => {
            let mut doc = pyproject::parse(path, &content)?;
            let kind = pyproject::rewrite(&mut doc, package, version)?
                .ok_or_else(|| not_found(path, package))?;
            (doc.to_string(), kind)
        }
    };

    debug!(path = %path.display(), package, version, %kind, "pinning package");
    write(path, &updated)?;
    Ok(kind)
}

/// # Errors
///
/// Returns `ManifestError::VerificationFailed` if the pinned version differs
/// from `expected`.
pub fn verify_version(path: &Path, package: &str, expected: &str) -> Result<()> {
    let actual = read_version(path, package)?;

    if actual != expected {
        return Err(ManifestError::VerificationFailed {
            path: path.to_path_buf(),
            package: package.to_string(),
            expected: expected.to_string(),
            actual,
        });
    }

    Ok(())
}
