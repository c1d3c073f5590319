//! Selection of optional apps for a single run.
//!
//! A selection string names, per selectable category, exactly which apps to
//! install. Resolution is pure: the catalog's persisted flags are read, never
//! rewritten, and the result is a separate [`Selection`] the pipeline consults.
use crate::catalog::Catalog;
use std::collections::{BTreeMap, BTreeSet};

/// Parsed selection string: category name to lowercased app-name tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionRequest {
    groups: BTreeMap<String, BTreeSet<String>>,
}

impl SelectionRequest {
    /// Parse `group (',' group)*` where `group := key (':' value)*`.
    ///
    /// A group without a colon maps its key to no apps. Empty groups and
    /// empty tokens are dropped; a repeated category keeps its last group.
    pub fn parse(raw: &str) -> Self {
        let mut groups = BTreeMap::new();
        for group in raw.split(',').map(str::trim).filter(|group| !group.is_empty()) {
            let (key, tokens) = match group.split_once(':') {
                Some((key, rest)) => (
                    key.trim(),
                    rest.split(':')
                        .map(str::trim)
                        .filter(|token| !token.is_empty())
                        .map(str::to_lowercase)
                        .collect(),
                ),
                None => (group, BTreeSet::new()),
            };
            groups.insert(key.to_string(), tokens);
        }
        Self { groups }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Lowercased app tokens requested for `category`, if the category was named.
    pub fn tokens(&self, category: &str) -> Option<&BTreeSet<String>> {
        self.groups.get(category)
    }
}

/// Effective selected flags, indexed like `Catalog::selectable`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    flags: Vec<Vec<bool>>,
}

impl Selection {
    pub fn is_selected(&self, category_index: usize, app_index: usize) -> bool {
        self.flags
            .get(category_index)
            .and_then(|apps| apps.get(app_index))
            .copied()
            .unwrap_or(false)
    }

    pub fn selected_count(&self) -> usize {
        self.flags.iter().flatten().filter(|selected| **selected).count()
    }
}

/// Resolve which selectable apps are active.
///
/// Categories named in `request` start from all-unselected and select exactly
/// the apps whose names match a token case-insensitively. Other categories keep
/// their persisted `selected` flags. Unknown categories and names are ignored.
pub fn resolve(catalog: &Catalog, request: &SelectionRequest) -> Selection {
    let flags = catalog
        .selectable
        .iter()
        .map(|category| match request.tokens(&category.name) {
            Some(tokens) => category
                .apps
                .iter()
                .map(|app| tokens.contains(&app.name.to_lowercase()))
                .collect(),
            None => category
                .apps
                .iter()
                .map(|app| app.selected.unwrap_or(false))
                .collect(),
        })
        .collect();
    Selection { flags }
}

#[cfg(test)]
#[path = "selection_tests.rs"]
mod tests;
