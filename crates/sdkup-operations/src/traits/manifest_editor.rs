use std::path::Path;

use sdkup_manifest::SpecifierKind;

use crate::Result;

pub trait ManifestEditor: Send + Sync {
    /// # Errors
    ///
    /// Returns an error if the manifest cannot be read or does not pin the package.
    fn read_version(&self, manifest_path: &Path, package: &str) -> Result<String>;

    /// # Errors
    ///
    /// Returns an error if the manifest cannot be written or does not pin the package.
    fn set_version(&self, manifest_path: &Path, package: &str, version: &str)
    -> Result<SpecifierKind>;
}

impl<T: ManifestEditor + ?Sized> ManifestEditor for &T {
    fn read_version(&self, manifest_path: &Path, package: &str) -> Result<String> {
        (**self).read_version(manifest_path, package)
    }

    fn set_version(
        &self,
        manifest_path: &Path,
        package: &str,
        version: &str,
    ) -> Result<SpecifierKind> {
        (**self).set_version(manifest_path, package, version)
    }
}
