//! Shared types for kubebucket: release versions, Windows CPU targets, and
//! the Scoop manifest wire format.
//!
//! Kept dependency-light so both the generator core and any downstream
//! tooling can consume the types without pulling in HTTP machinery.

pub mod arch;
pub mod manifest;
pub mod version;

pub use arch::Arch;
pub use manifest::{
    ArchitectureEntry, Autoupdate, AutoupdateArch, Checkver, HashTemplate, Manifest, OneOrMany,
};
pub use version::{ReleaseVersion, VersionError};
