//! Idempotent manifest persistence.
//!
//! The canonical serialized form is compared byte-for-byte against what is
//! already on disk; the file is rewritten only on difference, via a temp
//! file and rename.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use kubebucket_schema::Manifest;

#[derive(Error, Debug)]
pub enum WriteError {
    #[error("failed to serialize manifest: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// What happened to one manifest file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// No file existed; one was written.
    Created,
    /// Existing file had different content; it was replaced.
    Updated,
    /// Existing file already matched; nothing was touched.
    Unchanged,
}

impl WriteOutcome {
    /// True when the file was (or, in a preview, would have been) written.
    pub fn is_write(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

impl fmt::Display for WriteOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Unchanged => "unchanged",
        };
        write!(f, "{label}")
    }
}

/// Serialize `manifest` and write it to `path` unless the on-disk content
/// already matches.
pub fn write_manifest(manifest: &Manifest, path: &Path) -> Result<WriteOutcome, WriteError> {
    let rendered = manifest.to_canonical_json()?;
    let outcome = classify(path, &rendered)?;
    if outcome.is_write() {
        persist(path, &rendered)?;
    }
    Ok(outcome)
}

/// Like [`write_manifest`] but without the write: reports what a real run
/// would do. Used by dry-run.
pub fn preview_manifest(manifest: &Manifest, path: &Path) -> Result<WriteOutcome, WriteError> {
    let rendered = manifest.to_canonical_json()?;
    classify(path, &rendered)
}

fn classify(path: &Path, rendered: &str) -> Result<WriteOutcome, WriteError> {
    match std::fs::read_to_string(path) {
        Ok(existing) if existing == rendered => Ok(WriteOutcome::Unchanged),
        Ok(_) => Ok(WriteOutcome::Updated),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(WriteOutcome::Created),
        Err(err) => Err(WriteError::Io {
            path: path.to_path_buf(),
            source: err,
        }),
    }
}

// Write to a temp file then rename, so readers never observe a half-written
// manifest.
fn persist(path: &Path, rendered: &str) -> Result<(), WriteError> {
    let temp_path = path.with_extension("json.tmp");
    std::fs::write(&temp_path, rendered).map_err(|source| WriteError::Io {
        path: temp_path.clone(),
        source,
    })?;
    std::fs::rename(&temp_path, path).map_err(|source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    })
}
