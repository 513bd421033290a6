//! Scoop manifest record types.
//!
//! A manifest is assembled once per run and never mutated afterwards; the
//! serialized form is canonical (struct field order, `BTreeMap` for the
//! architecture map, 2-space indent, trailing newline) so that byte
//! comparison against the on-disk file decides whether to rewrite it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::arch::Arch;

/// A field that Scoop renders as a bare string when there is a single value
/// and as a JSON array otherwise (`url`, `hash`, `bin`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany {
    One(String),
    Many(Vec<String>),
}

impl OneOrMany {
    /// Collapse a list into the single-value form when possible.
    pub fn from_vec(mut items: Vec<String>) -> Self {
        if items.len() == 1 {
            Self::One(items.remove(0))
        } else {
            Self::Many(items)
        }
    }

    pub fn as_slice(&self) -> &[String] {
        match self {
            Self::One(item) => std::slice::from_ref(item),
            Self::Many(items) => items,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

/// Download URL(s) and checksum reference(s) for one architecture, one entry
/// per bundled binary. The hash side holds either a literal sha256 value or
/// the URL of the published `.sha256` file, depending on the generation mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchitectureEntry {
    pub url: OneOrMany,
    pub hash: OneOrMany,
}

/// Where the package manager polls for new versions of this manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkver {
    pub url: String,
    pub regex: String,
}

/// Checksum-fetch template inside the autoupdate block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashTemplate {
    pub url: String,
}

/// Per-architecture URL template with `$version` placeholders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoupdateArch {
    pub url: OneOrMany,
}

/// Templates the package manager uses to regenerate download links for
/// future versions without rerunning this generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Autoupdate {
    pub architecture: BTreeMap<Arch, AutoupdateArch>,
    pub hash: HashTemplate,
}

/// One Scoop bucket manifest: everything the package manager needs to fetch
/// and install a specific kubectl version on Windows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    pub version: String,
    pub description: String,
    pub homepage: String,
    pub license: String,
    pub architecture: BTreeMap<Arch, ArchitectureEntry>,
    pub bin: OneOrMany,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkver: Option<Checkver>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub autoupdate: Option<Autoupdate>,
}

impl Manifest {
    /// Canonical textual form: 2-space indentation, stable key order,
    /// trailing newline. Byte-identical across runs for equal content.
    pub fn to_canonical_json(&self) -> serde_json::Result<String> {
        let mut rendered = serde_json::to_string_pretty(self)?;
        rendered.push('\n');
        Ok(rendered)
    }
}
