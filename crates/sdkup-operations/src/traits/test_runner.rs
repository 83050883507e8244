use std::path::Path;

use crate::Result;
use crate::types::TestReport;

pub trait TestRunner: Send + Sync {
    /// Runs the suites named in `selectors`, or every suite when it is empty.
    ///
    /// Failing tests are reported in the [`TestReport`], not as an error.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown selector or a suite that cannot be started.
    fn run(&self, project_root: &Path, selectors: &[String]) -> Result<TestReport>;
}

impl<T: TestRunner + ?Sized> TestRunner for &T {
    fn run(&self, project_root: &Path, selectors: &[String]) -> Result<TestReport> {
        (**self).run(project_root, selectors)
    }
}
