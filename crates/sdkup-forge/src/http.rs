use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ForgeError, Result};

const USER_AGENT: &str = concat!("sdkup/", env!("CARGO_PKG_VERSION"));

pub(crate) fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(ForgeError::Client)
}

#[derive(Debug, Deserialize)]
struct ApiMessage {
    message: String,
}

/// Sends the request and returns the body of a successful response.
///
/// A 404 becomes [`ForgeError::NotFound`] naming `resource`.
pub(crate) fn execute(request: RequestBuilder, url: &str, resource: &str) -> Result<String> {
    debug!(url, "sending request");
    let response = request
        .send()
        .map_err(|source| ForgeError::transport(url, source))?;
    let status = response.status();
    let body = response
        .text()
        .map_err(|source| ForgeError::transport(url, source))?;

    if status == StatusCode::NOT_FOUND {
        return Err(ForgeError::NotFound {
            resource: resource.to_string(),
        });
    }

    if !status.is_success() {
        let message = serde_json::from_str::<ApiMessage>(&body)
            .map(|m| m.message)
            .unwrap_or(body);
        return Err(ForgeError::Status {
            url: url.to_string(),
            status: status.as_u16(),
            message,
        });
    }

    Ok(body)
}

pub(crate) fn decode<T: DeserializeOwned>(url: &str, body: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|source| ForgeError::Decode {
        url: url.to_string(),
        source,
    })
}

pub(crate) fn join(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_handles_slashes() {
        assert_eq!(join("https://api.github.com/", "/repos"), "https://api.github.com/repos");
        assert_eq!(join("http://127.0.0.1:1234", "repos"), "http://127.0.0.1:1234/repos");
    }

    #[test]
    fn decode_reports_url() {
        let err = decode::<ApiMessage>("https://x", "not json").expect_err("should fail");
        assert!(matches!(err, ForgeError::Decode { ref url, .. } if url == "https://x"));
    }
}
