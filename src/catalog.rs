//! In-memory catalog of default and selectable app categories.
//!
//! Field names mirror the configuration file so the JSON dump reads back the
//! same way it was written. Category order is document order, which is also
//! install order.
use crate::selection::Selection;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Source type tag for apps published as GitHub releases.
pub const GITHUB_TYPE: &str = "github";
/// Source type tag for apps whose download URL comes from a script.
pub const WEBSITE_TYPE: &str = "website";

/// Every configured category, defaults first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Catalog {
    /// Always installed; `selected` is ignored.
    #[serde(rename = "apps", default, with = "ordered_categories")]
    pub defaults: Vec<Category>,
    /// Installed only when selected.
    #[serde(rename = "selectable_apps", default, with = "ordered_categories")]
    pub selectable: Vec<Category>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub apps: Vec<AppSpec>,
}

/// One installable application.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "RawApp", into = "RawApp")]
pub struct AppSpec {
    pub name: String,
    pub source: AppSource,
    pub install_args: InstallArgs,
    /// `None` when the entry has no `selected` value.
    pub selected: Option<bool>,
    /// Entry keys not read by this crate, written back unchanged by the dumps.
    pub extra: Map<String, Value>,
}

/// Where an app's installer comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppSource {
    /// Latest release of `repo` (owner/name), first asset matching `file_pattern`.
    Github { repo: String, file_pattern: String },
    /// Script body defining `Get-Url`, which prints the download URL.
    Website { get_url_function: String },
    /// Known type without a field it needs; only this app fails to download.
    Incomplete { kind: String, missing: &'static str },
    /// Any other `type` value; kept so the pipeline can report it per app.
    Unsupported { kind: String },
}

impl AppSource {
    /// The configuration `type` tag for this source.
    pub fn kind(&self) -> &str {
        match self {
            AppSource::Github { .. } => GITHUB_TYPE,
            AppSource::Website { .. } => WEBSITE_TYPE,
            AppSource::Incomplete { kind, .. } | AppSource::Unsupported { kind } => kind,
        }
    }
}

/// Extra arguments for `.exe` installers, either one command-line string or a list.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum InstallArgs {
    Line(String),
    List(Vec<String>),
}

impl Default for InstallArgs {
    fn default() -> Self {
        InstallArgs::List(Vec::new())
    }
}

impl InstallArgs {
    /// Discrete process arguments; a single string is split on whitespace.
    pub fn to_argv(&self) -> Vec<String> {
        match self {
            InstallArgs::Line(line) => line.split_whitespace().map(str::to_string).collect(),
            InstallArgs::List(args) => args.clone(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            InstallArgs::Line(line) => line.trim().is_empty(),
            InstallArgs::List(args) => args.is_empty(),
        }
    }
}

/// Wire shape of an app entry as it appears in configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub(crate) struct RawApp {
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    repo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    file_pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    get_url_function: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    install_args: Option<InstallArgs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    selected: Option<bool>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<RawApp> for AppSpec {
    fn from(raw: RawApp) -> Self {
        let RawApp {
            name,
            kind,
            mut repo,
            mut file_pattern,
            mut get_url_function,
            install_args,
            selected,
            mut extra,
        } = raw;
        let source = match kind.as_str() {
            GITHUB_TYPE => match (repo.take(), file_pattern.take()) {
                (Some(repo), Some(file_pattern)) => AppSource::Github { repo, file_pattern },
                (found_repo, found_pattern) => {
                    let missing = if found_repo.is_none() {
                        "repo"
                    } else {
                        "file_pattern"
                    };
                    repo = found_repo;
                    file_pattern = found_pattern;
                    AppSource::Incomplete {
                        kind: kind.clone(),
                        missing,
                    }
                }
            },
            WEBSITE_TYPE => match get_url_function.take() {
                Some(get_url_function) => AppSource::Website { get_url_function },
                None => AppSource::Incomplete {
                    kind: kind.clone(),
                    missing: "get_url_function",
                },
            },
            other => AppSource::Unsupported {
                kind: other.to_string(),
            },
        };
        // Source fields the resolved type does not use stay in the document.
        for (key, value) in [
            ("repo", repo),
            ("file_pattern", file_pattern),
            ("get_url_function", get_url_function),
        ] {
            if let Some(value) = value {
                extra.insert(key.to_string(), Value::String(value));
            }
        }
        AppSpec {
            name,
            source,
            install_args: install_args.unwrap_or_default(),
            selected,
            extra,
        }
    }
}

impl From<AppSpec> for RawApp {
    fn from(app: AppSpec) -> Self {
        let kind = app.source.kind().to_string();
        let (repo, file_pattern, get_url_function) = match app.source {
            AppSource::Github { repo, file_pattern } => (Some(repo), Some(file_pattern), None),
            AppSource::Website { get_url_function } => (None, None, Some(get_url_function)),
            AppSource::Incomplete { .. } | AppSource::Unsupported { .. } => (None, None, None),
        };
        RawApp {
            name: app.name,
            kind,
            repo,
            file_pattern,
            get_url_function,
            install_args: (!app.install_args.is_empty()).then_some(app.install_args),
            selected: app.selected,
            extra: app.extra,
        }
    }
}

impl Catalog {
    /// Copy of the catalog whose selectable `selected` flags carry `selection`.
    pub fn with_selection(&self, selection: &Selection) -> Catalog {
        let mut resolved = self.clone();
        for (category_index, category) in resolved.selectable.iter_mut().enumerate() {
            for (app_index, app) in category.apps.iter_mut().enumerate() {
                app.selected = Some(selection.is_selected(category_index, app_index));
            }
        }
        resolved
    }

    pub fn app_count(&self) -> usize {
        self.defaults
            .iter()
            .chain(&self.selectable)
            .map(|category| category.apps.len())
            .sum()
    }
}

/// Category tables as an ordered list, preserving document order both ways.
mod ordered_categories {
    use super::*;

    pub(super) fn serialize<S: Serializer>(
        categories: &[Category],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(categories.len()))?;
        for category in categories {
            map.serialize_entry(&category.name, &category.apps)?;
        }
        map.end()
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Vec<Category>, D::Error> {
        deserializer.deserialize_map(CategoriesVisitor)
    }

    struct CategoriesVisitor;

    impl<'de> Visitor<'de> for CategoriesVisitor {
        type Value = Vec<Category>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a table mapping category names to app lists")
        }

        fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<Self::Value, M::Error> {
            let mut categories: Vec<Category> = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((name, apps)) = map.next_entry::<String, Vec<AppSpec>>()? {
                // A repeated key keeps its first position and its last value.
                match categories.iter_mut().find(|category| category.name == name) {
                    Some(existing) => existing.apps = apps,
                    None => categories.push(Category { name, apps }),
                }
            }
            Ok(categories)
        }
    }
}
