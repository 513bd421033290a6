//! Configuration loading.
//!
//! Values come from three layers: CLI flags win, then `kubebucket.toml`,
//! then built-in defaults.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use kubebucket_core::BucketConfig;

const DEFAULT_CONFIG_FILE: &str = "kubebucket.toml";

/// Optional on-disk configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub bucket_dir: Option<PathBuf>,
    /// Explicit release lines such as `["1.31", "1.32"]`.
    pub lines: Option<Vec<String>>,
    /// How many minor lines behind the latest to track when `lines` is not
    /// set.
    pub track_back: Option<usize>,
    pub concurrency: Option<usize>,
}

impl FileConfig {
    /// Load an explicit config file, or `kubebucket.toml` from the working
    /// directory when present, or defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: FileConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }
}

/// Merge file values and CLI flags into a validated [`BucketConfig`].
pub fn resolve(
    file: &FileConfig,
    bucket_dir: Option<PathBuf>,
    lines: &[String],
    concurrency: Option<usize>,
    dry_run: bool,
) -> Result<BucketConfig> {
    let mut config = BucketConfig::default();

    if let Some(dir) = bucket_dir.or_else(|| file.bucket_dir.clone()) {
        config.bucket_dir = dir;
    }

    if let Some(cap) = concurrency.or(file.concurrency) {
        if cap == 0 {
            bail!("concurrency must be at least 1");
        }
        config.concurrency = cap;
    }

    if let Some(track_back) = file.track_back {
        config.track_back = track_back;
    }

    let specs: Option<Vec<String>> = if lines.is_empty() {
        file.lines.clone()
    } else {
        Some(lines.to_vec())
    };
    if let Some(specs) = specs {
        if specs.is_empty() {
            bail!("lines must name at least one release line");
        }
        let parsed = specs
            .iter()
            .map(|spec| parse_line(spec))
            .collect::<Result<Vec<_>>>()?;
        config.lines = Some(parsed);
    }

    config.dry_run = dry_run;
    Ok(config)
}

/// Parse a release line spec such as `1.21` into `(1, 21)`.
fn parse_line(spec: &str) -> Result<(u64, u64)> {
    let invalid = || format!("Invalid release line {spec:?} (expected MAJOR.MINOR)");
    let (major, minor) = spec.trim().split_once('.').with_context(invalid)?;
    let major = major.parse().with_context(invalid)?;
    let minor = minor.parse().with_context(invalid)?;
    Ok((major, minor))
}
