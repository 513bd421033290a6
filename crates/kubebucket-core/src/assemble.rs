//! Pure manifest assembly.
//!
//! No network access here: URL templates are formatted from the version and
//! architecture folder name, and checksums are either referenced by the URL
//! of the published `.sha256` file (tracked manifests) or passed in already
//! resolved (pinned manifests from `backfill`).

use std::collections::BTreeMap;
use std::fmt;

use kubebucket_schema::{
    Arch, ArchitectureEntry, Autoupdate, AutoupdateArch, Checkver, HashTemplate, Manifest,
    OneOrMany, ReleaseVersion,
};

use crate::capabilities::Capabilities;

const DESCRIPTION: &str = "Kubernetes kubectl CLI";
const HOMEPAGE: &str = "https://kubernetes.io/";
const LICENSE: &str = "Apache-2.0";

/// Regex the package manager applies to the stable file to extract the
/// current version.
pub const CHECKVER_REGEX: &str = r"v([\d.]+)";

/// A manifest slot that `sync` keeps up to date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Track {
    /// The overall latest stable release (`kubectl.json`).
    Latest,
    /// The newest release of one minor line (`kubectl1.NN.json`).
    Line { major: u64, minor: u64 },
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Latest => write!(f, "latest"),
            Self::Line { major, minor } => write!(f, "line {major}.{minor}"),
        }
    }
}

/// Download URL for one binary of one architecture.
pub fn download_url(cdn_base: &str, version: &ReleaseVersion, arch: Arch, binary: &str) -> String {
    format!(
        "{cdn_base}/v{version}/bin/windows/{dir}/{binary}",
        dir = arch.release_dir()
    )
}

/// The CDN publishes a `.sha256` file next to every binary.
pub fn hash_url(download_url: &str) -> String {
    format!("{download_url}.sha256")
}

/// Deterministic file name for a tracked manifest.
pub fn manifest_file_name(track: Track) -> String {
    match track {
        Track::Latest => "kubectl.json".to_string(),
        Track::Line { major, minor } => format!("kubectl{major}.{minor}.json"),
    }
}

/// Deterministic file name for a pinned historical version.
pub fn pinned_file_name(version: &ReleaseVersion) -> String {
    format!("kubectl@{version}.json")
}

/// Build a tracked manifest. Checksums are referenced by URL; the checkver
/// and autoupdate blocks let the package manager refresh the manifest
/// without rerunning this generator.
pub fn reference_manifest(
    cdn_base: &str,
    version: &ReleaseVersion,
    caps: &Capabilities,
    checkver_url: String,
) -> Manifest {
    let mut architecture = BTreeMap::new();
    for &arch in &caps.architectures {
        let urls: Vec<String> = caps
            .binaries
            .iter()
            .map(|binary| download_url(cdn_base, version, arch, binary))
            .collect();
        let hashes: Vec<String> = urls.iter().map(|url| hash_url(url)).collect();
        architecture.insert(
            arch,
            ArchitectureEntry {
                url: OneOrMany::from_vec(urls),
                hash: OneOrMany::from_vec(hashes),
            },
        );
    }

    Manifest {
        version: version.to_string(),
        description: DESCRIPTION.to_string(),
        homepage: HOMEPAGE.to_string(),
        license: LICENSE.to_string(),
        architecture,
        bin: bin_list(caps),
        checkver: Some(Checkver {
            url: checkver_url,
            regex: CHECKVER_REGEX.to_string(),
        }),
        autoupdate: Some(autoupdate(cdn_base, caps)),
    }
}

/// Build a pinned manifest with literal checksum values, one entry per
/// architecture that a checksum could be resolved for. Pinned manifests
/// never change upstream, so they carry no checkver/autoupdate blocks.
pub fn eager_manifest(
    cdn_base: &str,
    version: &ReleaseVersion,
    caps: &Capabilities,
    hashes: &BTreeMap<Arch, Vec<String>>,
) -> Manifest {
    let mut architecture = BTreeMap::new();
    for &arch in &caps.architectures {
        let Some(values) = hashes.get(&arch) else {
            continue;
        };
        let urls: Vec<String> = caps
            .binaries
            .iter()
            .map(|binary| download_url(cdn_base, version, arch, binary))
            .collect();
        architecture.insert(
            arch,
            ArchitectureEntry {
                url: OneOrMany::from_vec(urls),
                hash: OneOrMany::from_vec(values.clone()),
            },
        );
    }

    Manifest {
        version: version.to_string(),
        description: DESCRIPTION.to_string(),
        homepage: HOMEPAGE.to_string(),
        license: LICENSE.to_string(),
        architecture,
        bin: bin_list(caps),
        checkver: None,
        autoupdate: None,
    }
}

fn bin_list(caps: &Capabilities) -> OneOrMany {
    OneOrMany::from_vec(caps.binaries.iter().map(|b| (*b).to_string()).collect())
}

fn autoupdate(cdn_base: &str, caps: &Capabilities) -> Autoupdate {
    let mut architecture = BTreeMap::new();
    for &arch in &caps.architectures {
        let urls: Vec<String> = caps
            .binaries
            .iter()
            .map(|binary| {
                format!(
                    "{cdn_base}/v$version/bin/windows/{dir}/{binary}",
                    dir = arch.release_dir()
                )
            })
            .collect();
        architecture.insert(
            arch,
            AutoupdateArch {
                url: OneOrMany::from_vec(urls),
            },
        );
    }
    Autoupdate {
        architecture,
        hash: HashTemplate {
            url: "$url.sha256".to_string(),
        },
    }
}
