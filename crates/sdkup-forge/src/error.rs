use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForgeError {
    #[error("invalid URL '{url}'")]
    UrlParse {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("repository URL '{url}' has no owner/repo path")]
    InvalidRepositoryPath { url: String },

    #[error("failed to build HTTP client")]
    Client(#[source] reqwest::Error),

    #[error("{resource} not found")]
    NotFound { resource: String },

    #[error("request to '{url}' timed out")]
    Timeout {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to '{url}' failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("'{url}' returned HTTP {status}: {message}")]
    Status {
        url: String,
        status: u16,
        message: String,
    },

    #[error("unexpected response from '{url}'")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("GraphQL request failed: {message}")]
    GraphQl { message: String },
}

impl ForgeError {
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub(crate) fn transport(url: &str, source: reqwest::Error) -> Self {
        if source.is_timeout() {
            Self::Timeout {
                url: url.to_string(),
                source,
            }
        } else {
            Self::Http {
                url: url.to_string(),
                source,
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, ForgeError>;
