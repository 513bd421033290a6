//! Check command

use std::path::Path;

use anyhow::{Context, Result, bail};
use regex::Regex;

use kubebucket_core::capabilities;
use kubebucket_schema::{Manifest, ReleaseVersion};

/// Validate an existing manifest file against the capability gates.
pub fn check(path: &Path) -> Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let manifest: Manifest = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    let version = ReleaseVersion::parse(&manifest.version)
        .with_context(|| format!("Invalid version {:?}", manifest.version))?;
    let caps = capabilities::resolve(&version);

    let mut problems = Vec::new();

    for arch in manifest.architecture.keys() {
        if !caps.architectures.contains(arch) {
            problems.push(format!(
                "architecture {arch} is not published for {version}"
            ));
        }
    }
    for &arch in &caps.architectures {
        if !manifest.architecture.contains_key(&arch) {
            println!("  Warning: expected architecture {arch} is missing");
        }
    }

    let bins = manifest.bin.as_slice();
    for bin in bins {
        if !caps.binaries.contains(&bin.as_str()) {
            problems.push(format!("binary {bin} is not bundled with {version}"));
        }
    }

    for (arch, entry) in &manifest.architecture {
        if entry.url.len() != bins.len() || entry.hash.len() != bins.len() {
            problems.push(format!("{arch}: url/hash entries do not match the bin list"));
        }
    }

    if let Some(checkver) = &manifest.checkver {
        Regex::new(&checkver.regex)
            .with_context(|| format!("checkver regex {:?} does not compile", checkver.regex))?;
    }

    if !problems.is_empty() {
        for problem in &problems {
            eprintln!("  {problem}");
        }
        bail!("{} problem(s) found in {}", problems.len(), path.display());
    }

    println!("✓ Manifest is valid");
    println!("  Version: {version}");
    println!("  Architectures: {}", manifest.architecture.len());
    Ok(())
}
