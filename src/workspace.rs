//! Shared download directory for a single run.
//!
//! Every artifact lands directly under the workspace root, so apps are
//! processed one at a time. The directory is removed once at the end.
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Fixed subfolder of the system temp directory.
pub const WORKSPACE_DIR_NAME: &str = "rebloat";

const FORBIDDEN_NAME_CHARS: &[char] = &['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

/// What teardown found and did.
#[derive(Debug)]
pub enum Teardown {
    Removed,
    NotPresent,
    Failed(std::io::Error),
}

impl Workspace {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// `<temp>/rebloat`, resolved from the process environment.
    pub fn default_root() -> PathBuf {
        std::env::temp_dir().join(WORKSPACE_DIR_NAME)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the directory if needed. Returns whether it was created.
    pub fn ensure(&self) -> Result<bool> {
        if self.root.is_dir() {
            return Ok(false);
        }
        fs::create_dir_all(&self.root)
            .with_context(|| format!("create workspace {}", self.root.display()))?;
        tracing::info!(path = %self.root.display(), "workspace created");
        Ok(true)
    }

    /// Destination path for an app's artifact, without the extension.
    pub fn artifact_prefix(&self, app_name: &str) -> PathBuf {
        self.root.join(sanitize_name(app_name))
    }

    /// Remove the directory and everything in it. Never fails the run.
    pub fn teardown(&self) -> Teardown {
        if !self.root.exists() {
            tracing::info!(path = %self.root.display(), "no temporary files to clean up");
            return Teardown::NotPresent;
        }
        match fs::remove_dir_all(&self.root) {
            Ok(()) => {
                tracing::info!(path = %self.root.display(), "temporary files cleaned up");
                Teardown::Removed
            }
            Err(err) => {
                tracing::error!(
                    path = %self.root.display(),
                    error = %err,
                    "failed to clean up temporary files"
                );
                Teardown::Failed(err)
            }
        }
    }
}

/// Lowercase, spaces to underscores, path and wildcard characters dropped.
pub fn sanitize_name(name: &str) -> String {
    name.to_lowercase()
        .replace(' ', "_")
        .chars()
        .filter(|ch| !FORBIDDEN_NAME_CHARS.contains(ch))
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_name_strips_path_characters() {
        assert_eq!(sanitize_name("Visual Studio Code"), "visual_studio_code");
        assert_eq!(sanitize_name("7-Zip: x64/<arm>?"), "7-zip_x64arm");
        assert_eq!(sanitize_name("A\\B|C*\"D\""), "abcd");
    }

    #[test]
    fn artifact_prefix_is_under_root() {
        let dir = tempfile::tempdir().expect("tempdir");
        let workspace = Workspace::new(dir.path().join(WORKSPACE_DIR_NAME));
        assert_eq!(
            workspace.artifact_prefix("Notepad++"),
            dir.path().join(WORKSPACE_DIR_NAME).join("notepad++")
        );
    }

    #[test]
    fn ensure_is_idempotent() {
        let dir = tempfile::tempdir().expect("tempdir");
        let workspace = Workspace::new(dir.path().join(WORKSPACE_DIR_NAME));

        assert!(workspace.ensure().expect("first ensure"));
        assert!(!workspace.ensure().expect("second ensure"));
        assert!(workspace.root().is_dir());
    }

    #[test]
    fn teardown_removes_contents() {
        let dir = tempfile::tempdir().expect("tempdir");
        let workspace = Workspace::new(dir.path().join(WORKSPACE_DIR_NAME));
        workspace.ensure().expect("ensure");
        fs::write(workspace.artifact_prefix("app").with_extension("msi"), b"x")
            .expect("write artifact");

        assert!(matches!(workspace.teardown(), Teardown::Removed));
        assert!(!workspace.root().exists());
    }

    #[test]
    fn teardown_of_missing_directory_is_a_no_op() {
        let dir = tempfile::tempdir().expect("tempdir");
        let workspace = Workspace::new(dir.path().join("never-created"));
        assert!(matches!(workspace.teardown(), Teardown::NotPresent));
    }

    #[test]
    fn default_root_uses_fixed_subfolder() {
        assert_eq!(
            Workspace::default_root().file_name().and_then(|name| name.to_str()),
            Some(WORKSPACE_DIR_NAME)
        );
    }
}
