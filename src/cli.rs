//! CLI argument parsing.
//!
//! Without a mode flag the tool installs; the mode flags only read the catalog.
use crate::config::DEFAULT_CONFIG_PATH;
use clap::Parser;
use std::path::PathBuf;

/// Environment override for the GitHub API base URL (mirrors, Enterprise).
pub const GITHUB_API_ENV: &str = "REBLOAT_GITHUB_API";

#[derive(Parser, Debug)]
#[command(
    name = "rebloat",
    version,
    about = "Silently download and install a configured set of Windows apps",
    after_help = "Examples:\n  rebloat --config-path apps.toml\n  rebloat --optional-select \"browsers:Firefox:Chrome,office:LibreOffice\"\n  rebloat --get-info --optional-select browsers:Brave\n  rebloat --config '{\"apps\": {}}' --get-json-config"
)]
pub struct RootArgs {
    /// Raw configuration content (JSON or TOML); takes precedence over --config-path
    #[arg(long, value_name = "TEXT")]
    pub config: Option<String>,

    /// Path to the configuration file
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub config_path: PathBuf,

    /// List available apps and exit
    #[arg(long, group = "mode")]
    pub get_info: bool,

    /// Print the resolved configuration as a structure and exit
    #[arg(long, group = "mode")]
    pub get_object_config: bool,

    /// Print the resolved configuration as JSON and exit
    #[arg(long, group = "mode")]
    pub get_json_config: bool,

    /// Selectable apps to install, e.g. "browsers:Firefox:Chrome,office:LibreOffice"
    #[arg(long, value_name = "TEXT")]
    pub optional_select: Option<String>,

    /// Exit with a failure status if any app failed to install
    #[arg(long)]
    pub strict: bool,
}

/// What a run does once the catalog is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Install,
    Info,
    ObjectDump,
    JsonDump,
}

impl RootArgs {
    pub fn mode(&self) -> Mode {
        if self.get_info {
            Mode::Info
        } else if self.get_object_config {
            Mode::ObjectDump
        } else if self.get_json_config {
            Mode::JsonDump
        } else {
            Mode::Install
        }
    }
}
