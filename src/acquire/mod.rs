//! Fetching installer artifacts to local disk.
//!
//! Dispatch is on [`AppSource`]; every failure comes back as an
//! [`AcquireError`] value so one bad app never stops the run.
mod github;
#[cfg(test)]
pub(crate) mod test_server;
mod website;

use crate::catalog::{AppSource, AppSpec};
use crate::error::AcquireError;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use github::GITHUB_API_BASE;
use website::SCRIPT_HOST;

const USER_AGENT: &str = concat!("rebloat/", env!("CARGO_PKG_VERSION"));

/// Produces a local installer file for an app.
pub trait Acquire {
    /// Download the artifact to `prefix` plus the artifact's own extension.
    fn fetch(&self, app: &AppSpec, prefix: &Path) -> Result<PathBuf, AcquireError>;
}

/// Real acquirer: GitHub releases over HTTPS and URL scripts on the script host.
pub struct NetworkAcquirer {
    agent: ureq::Agent,
    api_base: String,
    script_host: String,
}

impl NetworkAcquirer {
    pub fn new() -> Self {
        Self {
            agent: ureq::Agent::new_with_defaults(),
            api_base: GITHUB_API_BASE.to_string(),
            script_host: SCRIPT_HOST.to_string(),
        }
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    #[cfg(test)]
    pub(crate) fn with_agent(mut self, agent: ureq::Agent) -> Self {
        self.agent = agent;
        self
    }
}

impl Default for NetworkAcquirer {
    fn default() -> Self {
        Self::new()
    }
}

impl Acquire for NetworkAcquirer {
    fn fetch(&self, app: &AppSpec, prefix: &Path) -> Result<PathBuf, AcquireError> {
        match &app.source {
            AppSource::Github { repo, file_pattern } => github::fetch(
                &self.agent,
                &self.api_base,
                repo,
                file_pattern,
                prefix,
            ),
            AppSource::Website { get_url_function } => {
                website::fetch(&self.agent, &self.script_host, get_url_function, prefix)
            }
            AppSource::Incomplete { kind, missing } => Err(AcquireError::MissingField {
                kind: kind.clone(),
                field: *missing,
            }),
            AppSource::Unsupported { kind } => Err(AcquireError::UnsupportedSource {
                kind: kind.clone(),
            }),
        }
    }
}

/// `prefix` with the extension of `file_name` appended, if it has one.
pub(crate) fn artifact_path(prefix: &Path, file_name: &str) -> PathBuf {
    let mut path = OsString::from(prefix.as_os_str());
    if let Some(extension) = Path::new(file_name).extension() {
        path.push(".");
        path.push(extension);
    }
    PathBuf::from(path)
}

/// Stream `url` into `dest`. A partial file is removed on failure.
pub(crate) fn download(agent: &ureq::Agent, url: &str, dest: &Path) -> Result<(), AcquireError> {
    let response = agent
        .get(url)
        .header("User-Agent", USER_AGENT)
        .call()
        .map_err(|err| AcquireError::from_http(url, err))?;
    let mut reader = response.into_body().into_reader();
    let mut file = File::create(dest).map_err(|source| AcquireError::Io {
        path: dest.to_path_buf(),
        source,
    })?;
    if let Err(source) = io::copy(&mut reader, &mut file) {
        drop(file);
        let _ = fs::remove_file(dest);
        return Err(AcquireError::Io {
            path: dest.to_path_buf(),
            source,
        });
    }
    tracing::info!(path = %dest.display(), "download complete");
    Ok(())
}
