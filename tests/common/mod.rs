//! Shared helpers for integration tests that drive the `rebloat` binary.

use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

/// Catalog with one empty default category, one GitHub default, one app of an
/// unknown type, and a selectable category with a persisted selection.
pub const SAMPLE_JSON: &str = r#"{
  "apps": {
    "utilities": [
      {"name": "7-Zip", "type": "github", "repo": "ip7z/7zip", "file_pattern": "x64\\.exe$", "install_args": "/S"},
      {"name": "Scoop Thing", "type": "scoop"}
    ],
    "drivers": []
  },
  "selectable_apps": {
    "browsers": [
      {"name": "Firefox", "type": "github", "repo": "mozilla/firefox", "file_pattern": "\\.msi$"},
      {"name": "Chrome", "type": "github", "repo": "google/chrome", "file_pattern": "\\.msi$"},
      {"name": "Edge", "type": "github", "repo": "microsoft/edge", "file_pattern": "\\.msi$", "selected": true}
    ]
  }
}"#;

/// Captured result of one `rebloat` invocation.
#[derive(Debug)]
pub struct RunOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Run `rebloat` with its temp directory redirected into `temp_root`.
///
/// GitHub API requests go to a closed local port so nothing leaves the host.
pub fn rebloat(args: &[&str], temp_root: &Path) -> RunOutput {
    let output = Command::new(env!("CARGO_BIN_EXE_rebloat"))
        .args(args)
        .current_dir(temp_root)
        .env("TMPDIR", temp_root)
        .env("TMP", temp_root)
        .env("TEMP", temp_root)
        .env("RUST_LOG", "rebloat=info")
        .env("NO_COLOR", "1")
        .env("REBLOAT_GITHUB_API", "http://127.0.0.1:9")
        .env_remove("HTTP_PROXY")
        .env_remove("HTTPS_PROXY")
        .env_remove("ALL_PROXY")
        .env_remove("http_proxy")
        .env_remove("https_proxy")
        .env_remove("all_proxy")
        .output()
        .expect("run rebloat");
    RunOutput {
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    }
}

pub fn write_config(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("write config");
    path
}

pub fn workspace_dir(temp_root: &Path) -> PathBuf {
    temp_root.join("rebloat")
}
