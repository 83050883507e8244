mod forge;
mod git;
mod manifest;
mod test_runner;

pub use forge::{GitHubProvider, PyPiProvider};
pub use git::Git2Provider;
pub use manifest::FileManifestEditor;
pub use test_runner::CommandTestRunner;
