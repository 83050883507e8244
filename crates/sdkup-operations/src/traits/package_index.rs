use sdkup_forge::PackageInfo;

use crate::Result;

pub trait PackageIndex: Send + Sync {
    /// Latest published version plus the stable release history.
    ///
    /// # Errors
    ///
    /// Returns a not-found error for an unknown package, or a transport error.
    fn package_info(&self, package: &str) -> Result<PackageInfo>;
}

impl<T: PackageIndex + ?Sized> PackageIndex for &T {
    fn package_info(&self, package: &str) -> Result<PackageInfo> {
        (**self).package_info(package)
    }
}
