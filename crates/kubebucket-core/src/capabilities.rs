//! Version-gated capability resolution.
//!
//! Pure and total: given a release version, which Windows architectures have
//! published binaries, and which binaries ship alongside kubectl. Pre-release
//! suffixes never influence the gates ([`ReleaseVersion`] ordering ignores
//! them).

use kubebucket_schema::{Arch, ReleaseVersion};

/// The kubectl binary itself, present in every release.
pub const KUBECTL_BIN: &str = "kubectl.exe";
/// Bundled starting with 1.22.0.
pub const KUBECTL_CONVERT_BIN: &str = "kubectl-convert.exe";

/// What a given release version supports on Windows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    /// Architectures with published binaries, in manifest order.
    pub architectures: Vec<Arch>,
    /// Relative binary names bundled with the release.
    pub binaries: Vec<&'static str>,
}

/// Resolve the capability set for `version`.
///
/// Windows arm64 builds first shipped with 1.21.0; kubectl-convert joined
/// the release artifacts with 1.22.0.
pub fn resolve(version: &ReleaseVersion) -> Capabilities {
    let mut architectures = vec![Arch::X64, Arch::X86];
    if *version >= ReleaseVersion::new(1, 21, 0) {
        architectures.push(Arch::Arm64);
    }

    let mut binaries = vec![KUBECTL_BIN];
    if *version >= ReleaseVersion::new(1, 22, 0) {
        binaries.push(KUBECTL_CONVERT_BIN);
    }

    Capabilities {
        architectures,
        binaries,
    }
}
