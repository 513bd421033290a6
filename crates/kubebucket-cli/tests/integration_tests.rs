use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

/// Test context that runs the binary inside a temporary working directory
struct TestContext {
    temp_dir: TempDir,
}

impl TestContext {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    fn kubebucket_cmd(&self) -> Command {
        let bin_path = env!("CARGO_BIN_EXE_kubebucket");
        let mut cmd = Command::new(bin_path);
        cmd.current_dir(self.temp_dir.path());
        cmd
    }

    fn write(&self, name: &str, content: &str) -> std::path::PathBuf {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, content).expect("failed to write fixture");
        path
    }
}

const VALID_MANIFEST: &str = r#"{
  "version": "1.21.5",
  "description": "Kubernetes kubectl CLI",
  "homepage": "https://kubernetes.io/",
  "license": "Apache-2.0",
  "architecture": {
    "64bit": {
      "url": "https://dl.k8s.io/release/v1.21.5/bin/windows/amd64/kubectl.exe",
      "hash": "https://dl.k8s.io/release/v1.21.5/bin/windows/amd64/kubectl.exe.sha256"
    },
    "32bit": {
      "url": "https://dl.k8s.io/release/v1.21.5/bin/windows/386/kubectl.exe",
      "hash": "https://dl.k8s.io/release/v1.21.5/bin/windows/386/kubectl.exe.sha256"
    },
    "arm64": {
      "url": "https://dl.k8s.io/release/v1.21.5/bin/windows/arm64/kubectl.exe",
      "hash": "https://dl.k8s.io/release/v1.21.5/bin/windows/arm64/kubectl.exe.sha256"
    }
  },
  "bin": "kubectl.exe"
}
"#;

// 1.20 never shipped arm64 builds, so this manifest is inconsistent
const UNGATED_MANIFEST: &str = r#"{
  "version": "1.20.15",
  "description": "Kubernetes kubectl CLI",
  "homepage": "https://kubernetes.io/",
  "license": "Apache-2.0",
  "architecture": {
    "64bit": {
      "url": "https://dl.k8s.io/release/v1.20.15/bin/windows/amd64/kubectl.exe",
      "hash": "https://dl.k8s.io/release/v1.20.15/bin/windows/amd64/kubectl.exe.sha256"
    },
    "arm64": {
      "url": "https://dl.k8s.io/release/v1.20.15/bin/windows/arm64/kubectl.exe",
      "hash": "https://dl.k8s.io/release/v1.20.15/bin/windows/arm64/kubectl.exe.sha256"
    }
  },
  "bin": "kubectl.exe"
}
"#;

#[test]
fn test_help_command() {
    let ctx = TestContext::new();
    let output = ctx
        .kubebucket_cmd()
        .arg("--help")
        .output()
        .expect("failed to run kubebucket");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("sync"));
    assert!(stdout.contains("backfill"));
}

#[test]
fn test_version_command() {
    let ctx = TestContext::new();
    let output = ctx
        .kubebucket_cmd()
        .arg("--version")
        .output()
        .expect("failed to run kubebucket");
    assert!(output.status.success());
}

#[test]
fn test_check_valid_manifest() {
    let ctx = TestContext::new();
    let path = ctx.write("kubectl1.21.json", VALID_MANIFEST);

    let output = ctx
        .kubebucket_cmd()
        .arg("check")
        .arg(&path)
        .output()
        .expect("failed to run kubebucket check");
    assert!(output.status.success(), "check should accept the manifest");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Manifest is valid"));
}

#[test]
fn test_check_rejects_ungated_architecture() {
    let ctx = TestContext::new();
    let path = ctx.write("kubectl1.20.json", UNGATED_MANIFEST);

    let output = ctx
        .kubebucket_cmd()
        .arg("check")
        .arg(&path)
        .output()
        .expect("failed to run kubebucket check");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("arm64"));
}

#[test]
fn test_check_missing_file_fails_gracefully() {
    let ctx = TestContext::new();
    let output = ctx
        .kubebucket_cmd()
        .arg("check")
        .arg(Path::new("no-such-manifest.json"))
        .output()
        .expect("failed to run kubebucket check");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Failed to read"));
}

#[test]
fn test_sync_rejects_bad_line_flag() {
    let ctx = TestContext::new();
    let output = ctx
        .kubebucket_cmd()
        .args(["sync", "--lines", "not-a-line"])
        .output()
        .expect("failed to run kubebucket sync");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Invalid release line"));
}
