mod manifest_editor;
mod package_index;
mod pr_host;
mod release_source;
mod test_runner;
mod vcs_provider;

pub use manifest_editor::ManifestEditor;
pub use package_index::PackageIndex;
pub use pr_host::PrHost;
pub use release_source::ReleaseSource;
pub use test_runner::TestRunner;
pub use vcs_provider::VcsProvider;
