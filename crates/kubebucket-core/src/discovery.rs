//! Release discovery.
//!
//! Primary source is the release CDN: `stable.txt` names the overall latest
//! stable version and `stable-1.NN.txt` the newest release of one minor
//! line. When a line has no stable file (very old lines, or a line cut
//! before its first GA release), discovery falls back to the GitHub tags
//! API. `backfill` uses the releases listing to enumerate every historical
//! version.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use kubebucket_schema::ReleaseVersion;

use crate::fetch::{self, FetchError};

/// Kubernetes release CDN.
pub const DEFAULT_CDN_BASE: &str = "https://dl.k8s.io/release";
/// GitHub API root for the kubernetes/kubernetes repository.
pub const DEFAULT_API_BASE: &str = "https://api.github.com/repos/kubernetes/kubernetes";

const PAGE_SIZE: usize = 100;
// The tag listing also carries every alpha/beta/rc tag, so finding an old
// line can take a while; this bounds the walk.
const MAX_PAGES: usize = 30;

/// Where discovery looks. Overridable so tests can point at a mock server.
#[derive(Debug, Clone)]
pub struct ReleaseEndpoints {
    pub cdn_base: String,
    pub api_base: String,
}

impl Default for ReleaseEndpoints {
    fn default() -> Self {
        Self {
            cdn_base: DEFAULT_CDN_BASE.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl ReleaseEndpoints {
    /// `stable.txt`: the overall latest stable version.
    pub fn stable_url(&self) -> String {
        format!("{}/stable.txt", self.cdn_base)
    }

    /// `stable-1.NN.txt`: the newest release of one minor line.
    pub fn line_stable_url(&self, major: u64, minor: u64) -> String {
        format!("{}/stable-{major}.{minor}.txt", self.cdn_base)
    }

    fn tags_url(&self, page: usize) -> String {
        format!("{}/tags?per_page={PAGE_SIZE}&page={page}", self.api_base)
    }

    fn releases_url(&self, page: usize) -> String {
        format!("{}/releases?per_page={PAGE_SIZE}&page={page}", self.api_base)
    }
}

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("invalid version {text:?} from {url}")]
    InvalidVersion { url: String, text: String },

    #[error("no release tag found for line {major}.{minor}")]
    NoTagForLine { major: u64, minor: u64 },
}

#[derive(Debug, Deserialize)]
struct GithubTag {
    name: String,
}

#[derive(Debug, Deserialize)]
struct GithubRelease {
    tag_name: String,
    #[serde(default)]
    prerelease: bool,
}

/// The overall latest stable version.
pub async fn latest_stable(
    client: &Client,
    endpoints: &ReleaseEndpoints,
) -> Result<ReleaseVersion, DiscoveryError> {
    let url = endpoints.stable_url();
    let body = fetch::fetch_text(client, &url).await?;
    parse_stable_body(&url, &body)
}

/// The newest release of `major.minor`, from its stable file when present,
/// else from the tags API.
pub async fn line_stable(
    client: &Client,
    endpoints: &ReleaseEndpoints,
    major: u64,
    minor: u64,
) -> Result<ReleaseVersion, DiscoveryError> {
    let url = endpoints.line_stable_url(major, minor);
    match fetch::fetch_text(client, &url).await {
        Ok(body) => parse_stable_body(&url, &body),
        Err(err) if err.is_not_found() => {
            debug!(%url, "no stable file, falling back to release tags");
            latest_tag_for_line(client, endpoints, major, minor).await
        }
        Err(err) => Err(err.into()),
    }
}

/// Every stable historical release, newest first, deduplicated.
pub async fn all_release_versions(
    client: &Client,
    endpoints: &ReleaseEndpoints,
) -> Result<Vec<ReleaseVersion>, DiscoveryError> {
    let mut versions: Vec<ReleaseVersion> = Vec::new();
    for page in 1..=MAX_PAGES {
        let releases: Vec<GithubRelease> =
            fetch::fetch_json(client, &endpoints.releases_url(page)).await?;
        if releases.is_empty() {
            break;
        }
        for release in &releases {
            if release.prerelease {
                continue;
            }
            let Ok(version) = ReleaseVersion::parse(&release.tag_name) else {
                continue;
            };
            if version.is_stable() {
                versions.push(version);
            }
        }
        debug!(page, total = versions.len(), "release page fetched");
    }
    versions.sort_unstable_by(|a, b| b.cmp(a));
    versions.dedup();
    Ok(versions)
}

fn parse_stable_body(url: &str, body: &str) -> Result<ReleaseVersion, DiscoveryError> {
    let text = body.trim();
    ReleaseVersion::parse(text).map_err(|_| DiscoveryError::InvalidVersion {
        url: url.to_string(),
        text: text.to_string(),
    })
}

/// Walk the tag listing and keep the highest stable patch of the line.
async fn latest_tag_for_line(
    client: &Client,
    endpoints: &ReleaseEndpoints,
    major: u64,
    minor: u64,
) -> Result<ReleaseVersion, DiscoveryError> {
    let mut best: Option<ReleaseVersion> = None;
    for page in 1..=MAX_PAGES {
        let tags: Vec<GithubTag> = fetch::fetch_json(client, &endpoints.tags_url(page)).await?;
        if tags.is_empty() {
            break;
        }
        for tag in &tags {
            let Ok(version) = ReleaseVersion::parse(&tag.name) else {
                continue;
            };
            if version.is_stable()
                && version.major == major
                && version.minor == minor
                && best.as_ref().is_none_or(|b| version > *b)
            {
                best = Some(version);
            }
        }
    }
    best.ok_or(DiscoveryError::NoTagForLine { major, minor })
}
