//! Read-only views of the catalog: the app listing and the two dumps.
use crate::catalog::{Catalog, Category};
use crate::selection::Selection;
use anyhow::{Context, Result};
use std::fmt::Write;

/// Human-readable listing of default and selectable apps.
pub fn render_info(catalog: &Catalog, selection: &Selection) -> String {
    let mut out = String::new();
    out.push_str("\n=== Available Bloatware ===\n\n");
    out.push_str("\n= Defaults =\n\n");
    for category in &catalog.defaults {
        render_category(&mut out, category, |_| false);
    }
    out.push_str("\n= Selectable =\n\n");
    for (category_index, category) in catalog.selectable.iter().enumerate() {
        render_category(&mut out, category, |app_index| {
            selection.is_selected(category_index, app_index)
        });
    }
    out
}

fn render_category(out: &mut String, category: &Category, is_selected: impl Fn(usize) -> bool) {
    if category.apps.is_empty() {
        out.push_str("  No applications available.\n");
        return;
    }
    let _ = writeln!(out, "{}:", capitalize(&category.name));
    for (index, app) in category.apps.iter().enumerate() {
        if is_selected(index) {
            let _ = writeln!(out, "    - {} (selected)", app.name);
        } else {
            let _ = writeln!(out, "    - {}", app.name);
        }
    }
    out.push('\n');
}

/// First character uppercased, the rest lowercased.
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Structural dump of the resolved catalog.
pub fn render_object(catalog: &Catalog) -> String {
    format!("{catalog:#?}")
}

/// Pretty JSON of the resolved catalog, using configuration field names.
pub fn render_json(catalog: &Catalog) -> Result<String> {
    serde_json::to_string_pretty(catalog).context("serialize config JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::selection::{resolve, SelectionRequest};

    const CONFIG: &str = r#"{
      "apps": {
        "utilities": [
          {"name": "7-Zip", "type": "website", "get_url_function": "function Get-Url { 'x' }"}
        ],
        "empty": []
      },
      "selectable_apps": {
        "web browsers": [
          {"name": "Firefox", "type": "website", "get_url_function": "function Get-Url { 'x' }"},
          {"name": "Edge", "type": "website", "get_url_function": "function Get-Url { 'x' }", "selected": true}
        ]
      }
    }"#;

    #[test]
    fn capitalize_lowercases_the_rest() {
        assert_eq!(capitalize("browsers"), "Browsers");
        assert_eq!(capitalize("gameLaunchers"), "Gamelaunchers");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn info_lists_categories_and_marks_selected() {
        let (catalog, _) = parse_config(CONFIG).expect("parse config");
        let selection = resolve(&catalog, &SelectionRequest::parse("web browsers:firefox"));
        let info = render_info(&catalog, &selection);

        let expected = "\n=== Available Bloatware ===\n\n\
                        \n= Defaults =\n\n\
                        Utilities:\n    - 7-Zip\n\n  No applications available.\n\
                        \n= Selectable =\n\n\
                        Web browsers:\n    - Firefox (selected)\n    - Edge\n\n";
        assert_eq!(info, expected);
    }

    #[test]
    fn json_dump_uses_config_field_names_and_effective_selection() {
        let (catalog, _) = parse_config(CONFIG).expect("parse config");
        let selection = resolve(&catalog, &SelectionRequest::parse("web browsers:firefox"));
        let json = render_json(&catalog.with_selection(&selection)).expect("render JSON");

        let value: serde_json::Value = serde_json::from_str(&json).expect("valid JSON");
        let browsers = &value["selectable_apps"]["web browsers"];
        assert_eq!(browsers[0]["selected"], true);
        assert_eq!(browsers[1]["selected"], false);
        assert_eq!(value["apps"]["utilities"][0]["type"], "website");
        assert!(value["apps"]["utilities"][0].get("repo").is_none());
        assert!(
            value["apps"]["utilities"][0].get("selected").is_none(),
            "default apps are dumped as written"
        );
        assert!(json.contains("\n  \"apps\": {"), "two-space indent:\n{json}");
    }

    #[test]
    fn json_dump_reparses_to_the_same_catalog() {
        let (catalog, _) = parse_config(CONFIG).expect("parse config");
        let json = render_json(&catalog).expect("render JSON");
        let (reparsed, _) = parse_config(&json).expect("reparse");
        assert_eq!(reparsed, catalog);
    }

    #[test]
    fn object_dump_shows_resolved_flags() {
        let (catalog, _) = parse_config(CONFIG).expect("parse config");
        let selection = resolve(&catalog, &SelectionRequest::parse("web browsers"));
        let dump = render_object(&catalog.with_selection(&selection));
        assert!(dump.starts_with("Catalog {"));
        assert!(!dump.contains("selected: true"));
    }
}
