//! Domain-specific errors for manifest generation

use std::path::PathBuf;

use thiserror::Error;

use crate::discovery::DiscoveryError;
use crate::fetch::FetchError;
use crate::writer::WriteError;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error("failed to create bucket directory {path}: {source}")]
    BucketDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no architectures resolved for {version}")]
    NoArchitectures { version: String },
}
