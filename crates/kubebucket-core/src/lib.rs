//! kubebucket-core - generation pipeline for Scoop kubectl manifests.
//!
//! # Overview
//!
//! The pipeline per tracked unit is: discover the release version, resolve
//! which architectures and bundled binaries it supports, assemble the
//! manifest record, and write it to the bucket directory only if the
//! serialized content changed.
//!
//! # Architecture
//!
//! - **Pure core**: [`capabilities::resolve`] and [`assemble`] never touch
//!   the network; everything they need is passed in.
//! - **Explicit configuration**: [`generate::BucketConfig`] replaces ambient
//!   globals; the HTTP client is built when a [`generate::Generator`] is
//!   constructed and dropped with it.
//! - **Skip, never abort**: a failure in one version line or one
//!   architecture is logged and skipped; sibling units always run.

pub mod assemble;
pub mod capabilities;
pub mod discovery;
pub mod error;
pub mod fetch;
pub mod generate;
pub mod writer;

pub use error::GenerateError;
pub use generate::{BucketConfig, Generator, RunSummary};

/// User Agent string
pub const USER_AGENT: &str = concat!("kubebucket/", env!("CARGO_PKG_VERSION"));
