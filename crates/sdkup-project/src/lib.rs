mod config;
mod error;
mod project;

pub const CONFIG_FILE_NAME: &str = "sdkup.toml";

pub use config::{
    AnalysisConfig, HttpConfig, KeywordConfig, PullRequestConfig, RepositoryConfig, SdkConfig,
    SuiteFormat, TestSuiteConfig, TestsConfig, UpdaterConfig,
};
pub use error::ProjectError;
pub use project::{Project, find_config_file, load_config, load_project};

pub type Result<T> = std::result::Result<T, ProjectError>;
