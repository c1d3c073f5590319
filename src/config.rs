//! Configuration loading.
//!
//! Content is tried as JSON first, then as TOML. Any failure here is fatal:
//! nothing is downloaded or installed without a valid catalog.
use crate::catalog::Catalog;
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::PathBuf;

pub const DEFAULT_CONFIG_PATH: &str = "./config.toml";

/// Where configuration content comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Raw content passed on the command line.
    Inline(String),
    File(PathBuf),
}

impl ConfigSource {
    /// Inline content wins over the path when both are given.
    pub fn from_args(inline: Option<String>, path: PathBuf) -> Self {
        match inline {
            Some(content) => ConfigSource::Inline(content),
            None => ConfigSource::File(path),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "JSON",
            ConfigFormat::Toml => "TOML",
        }
    }
}

/// Read and parse the catalog.
pub fn load_config(source: &ConfigSource) -> Result<Catalog> {
    let content = match source {
        ConfigSource::Inline(content) => content.clone(),
        ConfigSource::File(path) => fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?,
    };
    let (catalog, format) = parse_config(&content)?;
    tracing::info!(
        format = format.as_str(),
        apps = catalog.app_count(),
        "configuration parsed as {}",
        format.as_str()
    );
    Ok(catalog)
}

/// Parse content as JSON, falling back to TOML when it is not JSON at all.
///
/// Content that is valid JSON but has the wrong shape is reported as a JSON
/// error rather than retried as TOML.
pub fn parse_config(content: &str) -> Result<(Catalog, ConfigFormat)> {
    let json_err = match serde_json::from_str::<Catalog>(content) {
        Ok(catalog) => return Ok((catalog, ConfigFormat::Json)),
        Err(err) if err.is_data() => {
            return Err(anyhow::Error::new(err).context("parse config as JSON"));
        }
        Err(err) => err,
    };
    match toml::from_str::<Catalog>(content) {
        Ok(catalog) => Ok((catalog, ConfigFormat::Toml)),
        Err(toml_err) => Err(anyhow!(
            "unsupported configuration format: not JSON ({json_err}); not TOML ({})",
            toml_err.message()
        )),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
