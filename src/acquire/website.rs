//! Script-driven acquisition for apps without a release feed.
//!
//! The configured script runs unrestricted on the script host with the
//! privileges of this process.
use super::{artifact_path, download};
use crate::error::AcquireError;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

pub(crate) const SCRIPT_HOST: &str = "powershell";
/// Function every URL script must define.
pub(crate) const URL_ENTRY_POINT: &str = "Get-Url";

pub(super) fn fetch(
    agent: &ureq::Agent,
    script_host: &str,
    script: &str,
    prefix: &Path,
) -> Result<PathBuf, AcquireError> {
    let stdout = run_url_script(script_host, script)?;
    let url = url_from_output(&stdout).ok_or(AcquireError::EmptyScriptOutput)?;
    let file_name = file_name_from_url(url);
    tracing::info!(url, file = file_name, "downloading from website");
    let dest = artifact_path(prefix, file_name);
    download(agent, url, &dest)?;
    Ok(dest)
}

/// Script body followed by a call to the entry point.
pub(crate) fn script_command(script: &str) -> String {
    format!("{script}\n{URL_ENTRY_POINT}\n")
}

/// Last non-blank line of the script's output.
pub(crate) fn url_from_output(stdout: &str) -> Option<&str> {
    stdout
        .lines()
        .map(str::trim)
        .rev()
        .find(|line| !line.is_empty())
}

/// Final path segment of a URL, ignoring any query or fragment.
pub(crate) fn file_name_from_url(url: &str) -> &str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    path.rsplit('/').next().unwrap_or(path)
}

fn run_url_script(script_host: &str, script: &str) -> Result<String, AcquireError> {
    let host = which::which(script_host).map_err(|source| AcquireError::ScriptHost {
        host: script_host.to_string(),
        source,
    })?;
    let output = Command::new(&host)
        .args(["-NoProfile", "-Command"])
        .arg(script_command(script))
        .stdin(Stdio::null())
        .output()
        .map_err(|source| AcquireError::ScriptSpawn {
            host: host.display().to_string(),
            source,
        })?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let detail = stderr
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .unwrap_or("no error output")
            .to_string();
        return Err(AcquireError::Script {
            status: output.status,
            detail,
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}
