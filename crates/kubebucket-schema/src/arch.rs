/// Windows CPU targets that kubectl binaries are published for.
///
/// The variant order is the order Scoop buckets conventionally list
/// architecture entries in, and `BTreeMap<Arch, _>` relies on it.
///
/// # Example
///
/// ```
/// use kubebucket_schema::Arch;
///
/// assert_eq!(Arch::X64.scoop_key(), "64bit");
/// assert_eq!(Arch::X64.release_dir(), "amd64");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum Arch {
    /// 64-bit x86 (`amd64` on the release CDN)
    #[serde(rename = "64bit")]
    X64,
    /// 32-bit x86 (`386` on the release CDN)
    #[serde(rename = "32bit")]
    X86,
    /// 64-bit ARM
    #[serde(rename = "arm64")]
    Arm64,
}

impl Arch {
    /// The key Scoop uses in the manifest `architecture` map.
    pub fn scoop_key(&self) -> &'static str {
        match self {
            Self::X64 => "64bit",
            Self::X86 => "32bit",
            Self::Arm64 => "arm64",
        }
    }

    /// Directory name under `bin/windows/` on the release CDN.
    ///
    /// Distinct from [`scoop_key()`](Self::scoop_key): the CDN follows Go
    /// platform naming (`amd64` / `386`), Scoop follows its own.
    pub fn release_dir(&self) -> &'static str {
        match self {
            Self::X64 => "amd64",
            Self::X86 => "386",
            Self::Arm64 => "arm64",
        }
    }
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.scoop_key())
    }
}

impl std::str::FromStr for Arch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "64bit" | "amd64" | "x86_64" | "x64" => Ok(Self::X64),
            "32bit" | "386" | "x86" | "i386" => Ok(Self::X86),
            "arm64" | "aarch64" => Ok(Self::Arm64),
            _ => Err(format!("Unknown architecture: {s}")),
        }
    }
}
