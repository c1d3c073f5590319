//! GitHub release acquisition.
use super::{artifact_path, download, USER_AGENT};
use crate::error::AcquireError;
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub(crate) const GITHUB_API_BASE: &str = "https://api.github.com";

#[derive(Debug, Deserialize)]
pub(crate) struct Release {
    #[serde(default)]
    pub(crate) tag_name: Option<String>,
    #[serde(default)]
    pub(crate) assets: Vec<ReleaseAsset>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReleaseAsset {
    pub(crate) name: String,
    pub(crate) browser_download_url: String,
}

pub(crate) fn latest_release_url(api_base: &str, repo: &str) -> String {
    format!(
        "{}/repos/{}/releases/latest",
        api_base.trim_end_matches('/'),
        repo.trim_matches('/')
    )
}

/// First asset, in API order, whose name the pattern finds a match in.
pub(crate) fn select_asset<'a>(
    assets: &'a [ReleaseAsset],
    pattern: &Regex,
) -> Option<&'a ReleaseAsset> {
    assets.iter().find(|asset| pattern.is_match(&asset.name))
}

pub(super) fn fetch(
    agent: &ureq::Agent,
    api_base: &str,
    repo: &str,
    file_pattern: &str,
    prefix: &Path,
) -> Result<PathBuf, AcquireError> {
    let pattern = Regex::new(file_pattern).map_err(|source| AcquireError::InvalidPattern {
        pattern: file_pattern.to_string(),
        source,
    })?;
    let release = latest_release(agent, api_base, repo)?;
    let asset = select_asset(&release.assets, &pattern).ok_or_else(|| {
        AcquireError::NoMatchingAsset {
            repo: repo.to_string(),
            pattern: file_pattern.to_string(),
        }
    })?;
    tracing::info!(
        repo,
        tag = release.tag_name.as_deref().unwrap_or("unknown"),
        asset = %asset.name,
        "downloading release asset"
    );
    let dest = artifact_path(prefix, &asset.name);
    download(agent, &asset.browser_download_url, &dest)?;
    Ok(dest)
}

fn latest_release(agent: &ureq::Agent, api_base: &str, repo: &str) -> Result<Release, AcquireError> {
    let url = latest_release_url(api_base, repo);
    let mut response = agent
        .get(&url)
        .header("User-Agent", USER_AGENT)
        .header("Accept", "application/vnd.github+json")
        .call()
        .map_err(|err| AcquireError::from_http(&url, err))?;
    response
        .body_mut()
        .read_json::<Release>()
        .map_err(|err| AcquireError::from_http(&url, err))
}
