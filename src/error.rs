//! Per-app failure types.
//!
//! These never escape the pipeline: each one is logged against the app that
//! raised it and the run moves on. Fatal errors (configuration) use `anyhow`.
use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Failure to produce a local artifact for an app.
#[derive(Debug, Error)]
pub enum AcquireError {
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: ureq::Error,
    },

    #[error("request to {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("invalid file_pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("no asset in the latest release of {repo} matches {pattern:?}")]
    NoMatchingAsset { repo: String, pattern: String },

    #[error("script host {host} not found: {source}")]
    ScriptHost {
        host: String,
        #[source]
        source: which::Error,
    },

    #[error("failed to run {host}: {source}")]
    ScriptSpawn {
        host: String,
        #[source]
        source: std::io::Error,
    },

    #[error("URL script exited with {status}: {detail}")]
    Script { status: ExitStatus, detail: String },

    #[error("URL script printed no URL")]
    EmptyScriptOutput,

    #[error("write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("downloaded artifact missing at {}", path.display())]
    ArtifactMissing { path: PathBuf },

    #[error("{kind} app is missing `{field}`")]
    MissingField { kind: String, field: &'static str },

    #[error("unsupported app type {kind:?}")]
    UnsupportedSource { kind: String },
}

impl AcquireError {
    /// Map a `ureq` failure, splitting out non-success HTTP statuses.
    pub fn from_http(url: &str, err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(status) => AcquireError::Status {
                url: url.to_string(),
                status,
            },
            source => AcquireError::Http {
                url: url.to_string(),
                source,
            },
        }
    }
}

/// Failure to run an installer for a downloaded artifact.
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    Failed { program: String, status: ExitStatus },

    #[error("unsupported install file type {extension:?}")]
    UnsupportedType { extension: String },
}
