//! Run orchestration.
//!
//! A [`Generator`] is built from an explicit [`BucketConfig`] and owns the
//! HTTP client for the duration of the run. Units (one manifest file each)
//! are fetched with bounded fan-out; a failing unit is logged and skipped,
//! never aborting its siblings.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use futures::StreamExt;
use futures::stream;
use reqwest::Client;
use tracing::{info, warn};

use kubebucket_schema::{Arch, Manifest, ReleaseVersion};

use crate::assemble::{self, Track};
use crate::capabilities;
use crate::discovery::{self, ReleaseEndpoints};
use crate::error::GenerateError;
use crate::fetch;
use crate::writer::{self, WriteOutcome};

/// Everything a run needs, constructed up front. Replaces the ambient
/// globals (output directory, shared session) of earlier generations of
/// this tool.
#[derive(Debug, Clone)]
pub struct BucketConfig {
    /// Directory manifests are written into; created if missing.
    pub bucket_dir: PathBuf,
    /// Release CDN and tags API roots. Overridable for tests.
    pub endpoints: ReleaseEndpoints,
    /// Cap on simultaneous in-flight units.
    pub concurrency: usize,
    /// How many minor lines behind the latest to track, when `lines` is
    /// not set explicitly.
    pub track_back: usize,
    /// Explicit `(major, minor)` lines to track instead of deriving them
    /// from the latest stable version.
    pub lines: Option<Vec<(u64, u64)>>,
    /// Report what would be written without touching the bucket.
    pub dry_run: bool,
}

impl Default for BucketConfig {
    fn default() -> Self {
        Self {
            bucket_dir: PathBuf::from("bucket"),
            endpoints: ReleaseEndpoints::default(),
            concurrency: 5,
            track_back: 2,
            lines: None,
            dry_run: false,
        }
    }
}

/// Counts for one run. Every configured unit lands in exactly one bucket.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub written: usize,
    pub unchanged: usize,
    pub skipped: usize,
}

impl RunSummary {
    fn record(&mut self, outcome: WriteOutcome) {
        if outcome.is_write() {
            self.written += 1;
        } else {
            self.unchanged += 1;
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} written, {} unchanged, {} skipped",
            self.written, self.unchanged, self.skipped
        )
    }
}

/// The minor lines to track for a given latest version: the latest line and
/// `track_back` lines before it.
pub fn derive_lines(latest: &ReleaseVersion, track_back: usize) -> Vec<(u64, u64)> {
    (0..=track_back as u64)
        .rev()
        .filter_map(|back| latest.minor.checked_sub(back))
        .map(|minor| (latest.major, minor))
        .collect()
}

/// Drives discovery, capability resolution, assembly and writing for one
/// configured bucket.
#[derive(Debug)]
pub struct Generator {
    config: BucketConfig,
    client: Client,
}

impl Generator {
    /// Build the generator and its HTTP client.
    pub fn new(config: BucketConfig) -> Result<Self, GenerateError> {
        let client = fetch::build_client()?;
        Ok(Self { config, client })
    }

    /// Refresh `kubectl.json` plus one `kubectl1.NN.json` per tracked line.
    pub async fn sync(&self) -> Result<RunSummary, GenerateError> {
        self.ensure_bucket_dir()?;

        // With an explicit line set, nothing needs to be known up front and
        // every unit (the latest manifest included) can fail independently.
        // Without one, the latest version is required to derive the lines,
        // so that lookup alone is allowed to fail the run.
        let (latest, lines) = match &self.config.lines {
            Some(lines) => (None, lines.clone()),
            None => {
                let version =
                    discovery::latest_stable(&self.client, &self.config.endpoints).await?;
                info!(version = %version, "latest stable release");
                let lines = derive_lines(&version, self.config.track_back);
                (Some(version), lines)
            }
        };

        let mut units = vec![Track::Latest];
        units.extend(
            lines
                .into_iter()
                .map(|(major, minor)| Track::Line { major, minor }),
        );

        let results: Vec<(Track, Result<WriteOutcome, GenerateError>)> = stream::iter(units)
            .map(|track| {
                let latest = latest.clone();
                async move { (track, self.sync_unit(track, latest.as_ref()).await) }
            })
            .buffer_unordered(self.config.concurrency.max(1))
            .collect()
            .await;

        let mut summary = RunSummary::default();
        for (track, result) in results {
            match result {
                Ok(outcome) => {
                    info!(unit = %track, outcome = %outcome, "manifest processed");
                    summary.record(outcome);
                }
                Err(err) => {
                    warn!(unit = %track, error = %err, "unit skipped");
                    summary.skipped += 1;
                }
            }
        }
        Ok(summary)
    }

    /// Generate one pinned `kubectl@X.Y.Z.json` per historical release,
    /// newest first, optionally capped at `limit` versions.
    pub async fn backfill(&self, limit: Option<usize>) -> Result<RunSummary, GenerateError> {
        self.ensure_bucket_dir()?;

        let mut versions =
            discovery::all_release_versions(&self.client, &self.config.endpoints).await?;
        if let Some(limit) = limit {
            versions.truncate(limit);
        }
        info!(count = versions.len(), "release tags discovered");

        let results: Vec<(ReleaseVersion, Result<WriteOutcome, GenerateError>)> =
            stream::iter(versions)
                .map(|version| async move {
                    let result = self.backfill_unit(&version).await;
                    (version, result)
                })
                .buffer_unordered(self.config.concurrency.max(1))
                .collect()
                .await;

        let mut summary = RunSummary::default();
        for (version, result) in results {
            match result {
                Ok(outcome) => {
                    info!(%version, outcome = %outcome, "manifest processed");
                    summary.record(outcome);
                }
                Err(err) => {
                    warn!(%version, error = %err, "version skipped");
                    summary.skipped += 1;
                }
            }
        }
        Ok(summary)
    }

    async fn sync_unit(
        &self,
        track: Track,
        latest: Option<&ReleaseVersion>,
    ) -> Result<WriteOutcome, GenerateError> {
        let endpoints = &self.config.endpoints;
        let version = match track {
            Track::Latest => match latest {
                Some(version) => version.clone(),
                None => discovery::latest_stable(&self.client, endpoints).await?,
            },
            Track::Line { major, minor } => {
                discovery::line_stable(&self.client, endpoints, major, minor).await?
            }
        };

        let caps = capabilities::resolve(&version);
        if caps.architectures.is_empty() {
            return Err(GenerateError::NoArchitectures {
                version: version.to_string(),
            });
        }

        let checkver_url = match track {
            Track::Latest => endpoints.stable_url(),
            Track::Line { major, minor } => endpoints.line_stable_url(major, minor),
        };
        let manifest =
            assemble::reference_manifest(&endpoints.cdn_base, &version, &caps, checkver_url);
        let path = self.config.bucket_dir.join(assemble::manifest_file_name(track));
        self.commit(&manifest, &path)
    }

    async fn backfill_unit(&self, version: &ReleaseVersion) -> Result<WriteOutcome, GenerateError> {
        let caps = capabilities::resolve(version);

        let mut hashes: BTreeMap<Arch, Vec<String>> = BTreeMap::new();
        for &arch in &caps.architectures {
            match self.fetch_arch_hashes(version, arch, &caps.binaries).await {
                Ok(values) => {
                    hashes.insert(arch, values);
                }
                Err(err) => {
                    warn!(%version, arch = %arch, error = %err, "checksum unavailable, dropping architecture");
                }
            }
        }

        if hashes.is_empty() {
            return Err(GenerateError::NoArchitectures {
                version: version.to_string(),
            });
        }

        let manifest =
            assemble::eager_manifest(&self.config.endpoints.cdn_base, version, &caps, &hashes);
        let path = self
            .config
            .bucket_dir
            .join(assemble::pinned_file_name(version));
        self.commit(&manifest, &path)
    }

    /// One checksum per bundled binary; any failure drops the whole
    /// architecture so url/hash lists always stay aligned.
    async fn fetch_arch_hashes(
        &self,
        version: &ReleaseVersion,
        arch: Arch,
        binaries: &[&'static str],
    ) -> Result<Vec<String>, GenerateError> {
        let cdn_base = &self.config.endpoints.cdn_base;
        let mut hashes = Vec::with_capacity(binaries.len());
        for binary in binaries {
            let url = assemble::hash_url(&assemble::download_url(cdn_base, version, arch, binary));
            hashes.push(fetch::fetch_checksum(&self.client, &url).await?);
        }
        Ok(hashes)
    }

    fn commit(&self, manifest: &Manifest, path: &Path) -> Result<WriteOutcome, GenerateError> {
        let outcome = if self.config.dry_run {
            writer::preview_manifest(manifest, path)?
        } else {
            writer::write_manifest(manifest, path)?
        };
        Ok(outcome)
    }

    fn ensure_bucket_dir(&self) -> Result<(), GenerateError> {
        if self.config.dry_run {
            return Ok(());
        }
        std::fs::create_dir_all(&self.config.bucket_dir).map_err(|source| {
            GenerateError::BucketDir {
                path: self.config.bucket_dir.clone(),
                source,
            }
        })
    }
}
