//! Thin HTTP layer shared by discovery and generation.
//!
//! All outbound requests go through one [`reqwest::Client`] with a fixed
//! timeout and user-agent. Responses are small (version strings, checksum
//! lines, tag listings), so everything is buffered.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;

/// Per-request timeout. The CDN and the GitHub API both answer well under
/// this; anything slower is treated as a failed unit and skipped.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {status} for {url}")]
    Status { status: StatusCode, url: String },

    #[error("no checksum found in response from {url}")]
    MalformedChecksum { url: String },
}

impl FetchError {
    /// True for a clean HTTP 404, the signal discovery uses to fall back
    /// from stable files to the tags API.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status, .. } if *status == StatusCode::NOT_FOUND)
    }
}

/// Build the shared client. Called once per run.
pub fn build_client() -> Result<Client, FetchError> {
    Ok(Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(crate::USER_AGENT)
        .build()?)
}

/// Fetch the body of `url` as text, treating any non-2xx status as an error.
pub async fn fetch_text(client: &Client, url: &str) -> Result<String, FetchError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            status,
            url: url.to_string(),
        });
    }
    Ok(response.text().await?)
}

/// Fetch and deserialize the JSON body of `url`.
pub async fn fetch_json<T: serde::de::DeserializeOwned>(
    client: &Client,
    url: &str,
) -> Result<T, FetchError> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Status {
            status,
            url: url.to_string(),
        });
    }
    Ok(response.json().await?)
}

/// Fetch a published `.sha256` file and extract the checksum value.
pub async fn fetch_checksum(client: &Client, url: &str) -> Result<String, FetchError> {
    let body = fetch_text(client, url).await?;
    parse_checksum_line(&body).ok_or_else(|| FetchError::MalformedChecksum {
        url: url.to_string(),
    })
}

/// Parse the body of a checksum file published on the release CDN.
///
/// Older releases publish `sha256sum` style lines (`<hash> <filename>`),
/// newer ones a bare hash. Returns the first 64-char hex token found,
/// lowercased.
pub fn parse_checksum_line(text: &str) -> Option<String> {
    for line in text.lines() {
        let Some(first) = line.split_whitespace().next() else {
            continue;
        };
        let candidate = first.trim_end_matches(':');
        if candidate.len() == 64 && candidate.chars().all(|c| c.is_ascii_hexdigit()) {
            return Some(candidate.to_ascii_lowercase());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "a8f5f167f44f4964e6c998dee827110c976e3f55c5ec3ce2332e98c96ec7263b";

    #[test]
    fn test_parse_bare_hash() {
        assert_eq!(parse_checksum_line(HASH), Some(HASH.to_string()));
        assert_eq!(
            parse_checksum_line(&format!("{HASH}\n")),
            Some(HASH.to_string())
        );
    }

    #[test]
    fn test_parse_sha256sum_form() {
        let body = format!("{HASH}  kubectl.exe\n");
        assert_eq!(parse_checksum_line(&body), Some(HASH.to_string()));
    }

    #[test]
    fn test_parse_skips_garbage_lines() {
        let body = format!("not a hash\n\n{HASH} kubectl.exe\n");
        assert_eq!(parse_checksum_line(&body), Some(HASH.to_string()));
    }

    #[test]
    fn test_parse_lowercases() {
        let upper = HASH.to_ascii_uppercase();
        assert_eq!(parse_checksum_line(&upper), Some(HASH.to_string()));
    }

    #[test]
    fn test_parse_rejects_non_hex() {
        assert_eq!(parse_checksum_line("zz".repeat(32).as_str()), None);
        assert_eq!(parse_checksum_line("<html>404</html>"), None);
        assert_eq!(parse_checksum_line(""), None);
    }

    #[tokio::test]
    async fn test_fetch_text_non_2xx_is_error() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/stable.txt")
            .with_status(500)
            .create_async()
            .await;

        let client = build_client().unwrap();
        let err = fetch_text(&client, &format!("{}/stable.txt", server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { .. }));
        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn test_fetch_checksum_malformed_body() {
        let mut server = mockito::Server::new_async().await;
        let _m = server
            .mock("GET", "/kubectl.exe.sha256")
            .with_status(200)
            .with_body("<html>not a checksum</html>")
            .create_async()
            .await;

        let client = build_client().unwrap();
        let err = fetch_checksum(&client, &format!("{}/kubectl.exe.sha256", server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::MalformedChecksum { .. }));
    }
}
