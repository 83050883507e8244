mod error;
mod github;
mod http;
mod pypi;
mod repository;

pub use error::{ForgeError, Result};
pub use github::{ClientOptions, GitHubClient, NewPullRequest, PullRequest};
pub use pypi::{PackageInfo, PyPiClient};
pub use repository::RepositoryInfo;

pub const DEFAULT_API_BASE: &str = "https://api.github.com";
pub const DEFAULT_PYPI_BASE: &str = "https://pypi.org/pypi";
