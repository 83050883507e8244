use std::path::Path;

use serde::Serialize;
use tracing::info;

use sdkup_core::UpdateType;
use sdkup_version::{classify_update, needs_update};

use crate::Result;
use crate::traits::{ManifestEditor, PackageIndex};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionCheckOutput {
    pub package: String,
    pub current_version: String,
    pub latest_version: String,
    pub update_type: UpdateType,
    /// Newer than the pinned version, or forced.
    pub has_update: bool,
    /// Stable releases newer than the pinned version, newest first.
    pub newer_versions: Vec<String>,
}

/// Compares the version pinned in the manifest with the package index.
pub struct VersionCheckOperation<M, I> {
    manifest: M,
    index: I,
}

impl<M, I> VersionCheckOperation<M, I>
where
    M: ManifestEditor,
    I: PackageIndex,
{
    pub fn new(manifest: M, index: I) -> Self {
        Self { manifest, index }
    }

    /// # Errors
    ///
    /// Returns an error if the package is not pinned in the manifest or the
    /// index cannot report a latest version.
    pub fn execute(
        &self,
        manifest_path: &Path,
        package: &str,
        force: bool,
    ) -> Result<VersionCheckOutput> {
        let current_version = self.manifest.read_version(manifest_path, package)?;
        let info = self.index.package_info(package)?;
        let latest_version = info.latest_version;

        let update_type = classify_update(&current_version, &latest_version);
        let newer = needs_update(&current_version, &latest_version);
        let newer_versions: Vec<String> = info
            .stable_versions
            .into_iter()
            .filter(|v| needs_update(&current_version, v))
            .collect();

        info!(
            package,
            current_version = %current_version,
            latest_version = %latest_version,
            %update_type,
            force,
            newer = newer_versions.len(),
            "checked SDK version"
        );

        Ok(VersionCheckOutput {
            package: package.to_string(),
            current_version,
            latest_version,
            update_type,
            has_update: newer || force,
            newer_versions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockManifestEditor, MockPackageIndex};

    const MANIFEST: &str = "backend/requirements.txt";

    fn operation(
        current: &str,
        latest: &str,
    ) -> VersionCheckOperation<MockManifestEditor, MockPackageIndex> {
        VersionCheckOperation::new(
            MockManifestEditor::new().with_pin("strands-agents", current),
            MockPackageIndex::new().with_version("strands-agents", latest),
        )
    }

    #[test]
    fn newer_release_is_an_update() {
        let output = operation("0.1.0", "0.2.0")
            .execute(Path::new(MANIFEST), "strands-agents", false)
            .expect("version check");

        assert!(output.has_update);
        assert_eq!(output.update_type, UpdateType::Minor);
        assert_eq!(output.current_version, "0.1.0");
        assert_eq!(output.latest_version, "0.2.0");
    }

    #[test]
    fn lists_stable_releases_newer_than_pin() {
        let operation = VersionCheckOperation::new(
            MockManifestEditor::new().with_pin("strands-agents", "0.1.9"),
            MockPackageIndex::new().with_versions(
                "strands-agents",
                "0.2.1",
                &["0.2.1", "0.2.0", "0.1.10", "0.1.9", "0.1.0"],
            ),
        );

        let output = operation
            .execute(Path::new(MANIFEST), "strands-agents", false)
            .expect("version check");

        assert_eq!(output.newer_versions, vec!["0.2.1", "0.2.0", "0.1.10"]);
        assert_eq!(output.update_type, UpdateType::Minor);
    }

    #[test]
    fn same_version_is_up_to_date() {
        let output = operation("1.2.3", "1.2.3")
            .execute(Path::new(MANIFEST), "strands-agents", false)
            .expect("version check");

        assert!(!output.has_update);
        assert_eq!(output.update_type, UpdateType::None);
        assert!(output.newer_versions.is_empty());
    }

    #[test]
    fn force_reports_update_without_newer_release() {
        let output = operation("1.2.3", "1.2.3")
            .execute(Path::new(MANIFEST), "strands-agents", true)
            .expect("version check");

        assert!(output.has_update);
        assert_eq!(output.update_type, UpdateType::None);
    }

    #[test]
    fn unpinned_package_is_not_found() {
        let err = operation("0.1.0", "0.2.0")
            .execute(Path::new(MANIFEST), "boto3", false)
            .expect_err("boto3 is not pinned");
        assert!(err.is_not_found());
    }

    #[test]
    fn unknown_package_on_index_is_not_found() {
        let operation = VersionCheckOperation::new(
            MockManifestEditor::new().with_pin("strands-agents", "0.1.0"),
            MockPackageIndex::new(),
        );
        let err = operation
            .execute(Path::new(MANIFEST), "strands-agents", false)
            .expect_err("index has no such package");
        assert!(err.is_not_found());
    }
}
