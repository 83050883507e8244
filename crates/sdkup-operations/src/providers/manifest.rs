use std::path::Path;

use sdkup_manifest::SpecifierKind;

use crate::Result;
use crate::traits::ManifestEditor;

#[derive(Debug, Clone, Copy, Default)]
pub struct FileManifestEditor;

impl FileManifestEditor {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ManifestEditor for FileManifestEditor {
    fn read_version(&self, manifest_path: &Path, package: &str) -> Result<String> {
        Ok(sdkup_manifest::read_version(manifest_path, package)?)
    }

    fn set_version(
        &self,
        manifest_path: &Path,
        package: &str,
        version: &str,
    ) -> Result<SpecifierKind> {
        let kind = sdkup_manifest::set_version(manifest_path, package, version)?;
        sdkup_manifest::verify_version(manifest_path, package, version)?;
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_version_rewrites_and_verifies() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("requirements.txt");
        std::fs::write(&path, "strands-agents>=0.1.0\nfastapi==0.110.0\n")?;

        let editor = FileManifestEditor::new();
        let kind = editor.set_version(&path, "strands-agents", "0.2.0")?;

        assert_eq!(kind, SpecifierKind::Minimum);
        assert_eq!(editor.read_version(&path, "strands-agents")?, "0.2.0");
        Ok(())
    }

    #[test]
    fn missing_package_is_not_found() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("requirements.txt");
        std::fs::write(&path, "fastapi==0.110.0\n")?;

        let err = FileManifestEditor::new()
            .read_version(&path, "strands-agents")
            .expect_err("package is not pinned");

        assert!(err.is_not_found());
        Ok(())
    }
}
