//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`, applying precedence
//! rules.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use xsearch_query::ComparisonOperator;

use crate::{
    Config, DuplicateField, Field, LabelSettings, Settings,
    parse::{RawConfig, RawField, RawLabelSettings, RawSettings},
};

/// A parsed config file with its source path.
#[derive(Debug, Clone)]
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to CWD),
/// lowest precedence last (global config).
///
/// Merge rules:
/// - Settings and labels: first defined value wins (highest precedence)
/// - Comparator labels: merged per comparator, first definition wins
/// - Fields: merged by name, first definition wins completely; the registry keeps the order in
///   which names first appear
pub fn merge_configs(configs: &[ParsedConfig]) -> Config {
    Config {
        settings: merge_settings(configs),
        labels: merge_labels(configs),
        fields: merge_fields(configs),
        config_root: configs
            .first()
            .and_then(|parsed| parsed.path.parent())
            .map(Path::to_path_buf),
        duplicate_fields: find_duplicates(configs),
    }
}

/// Merges general settings.
fn merge_settings(configs: &[ParsedConfig]) -> Settings {
    let mut result = Settings::default();

    // Iterate in reverse (lowest precedence first) so higher precedence overwrites
    for parsed in configs.iter().rev() {
        if let Some(ref settings) = parsed.config.settings {
            apply_raw_settings(&mut result, settings);
        }
    }

    result
}

/// Applies raw settings to result, overwriting any present values.
fn apply_raw_settings(result: &mut Settings, raw: &RawSettings) {
    if let Some(ref v) = raw.default_field {
        result.default_field = Some(v.clone());
    }
    if let Some(ref v) = raw.base_url {
        result.base_url = Some(v.clone());
    }
}

/// Merges display labels.
fn merge_labels(configs: &[ParsedConfig]) -> LabelSettings {
    let mut result = LabelSettings::default();

    for parsed in configs.iter().rev() {
        if let Some(ref labels) = parsed.config.labels {
            apply_raw_labels(&mut result, labels);
        }
    }

    result
}

/// Applies raw labels to result.
fn apply_raw_labels(result: &mut LabelSettings, raw: &RawLabelSettings) {
    if let Some(ref v) = raw.and {
        result.and.clone_from(v);
    }
    if let Some(ref v) = raw.or {
        result.or.clone_from(v);
    }
    if let Some(ref comparators) = raw.comparators {
        result.comparators.extend(
            comparators
                .iter()
                .map(|(op, label)| (op.clone(), label.clone())),
        );
    }
}

/// Merges the field registries of all configs.
fn merge_fields(configs: &[ParsedConfig]) -> Vec<Field> {
    let mut fields: Vec<Field> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for raw in configs
        .iter()
        .flat_map(|parsed| parsed.config.field.iter().flatten())
    {
        if !seen.insert(raw.name.as_str()) {
            // Already defined by a higher-precedence entry
            continue;
        }
        fields.push(convert_field(raw));
    }

    fields
}

/// Converts a raw field to the resolved type with defaults applied.
fn convert_field(raw: &RawField) -> Field {
    Field {
        name: raw.name.clone(),
        label: raw.label.clone().unwrap_or_else(|| raw.name.clone()),
        kind: raw.kind.unwrap_or_default(),
        operators: raw
            .operators
            .clone()
            .unwrap_or_else(|| ComparisonOperator::ALL.to_vec()),
        values: raw.values.clone().unwrap_or_default(),
    }
}

/// Finds names defined more than once within one file.
fn find_duplicates(configs: &[ParsedConfig]) -> Vec<DuplicateField> {
    let mut duplicates = Vec::new();

    for parsed in configs {
        let mut seen = HashSet::new();
        for raw in parsed.config.field.iter().flatten() {
            if !seen.insert(raw.name.as_str()) {
                duplicates.push(DuplicateField {
                    name: raw.name.clone(),
                    path: parsed.path.clone(),
                });
            }
        }
    }

    duplicates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FieldKind, parse::parse_config_str};

    fn parsed(path: &str, toml: &str) -> ParsedConfig {
        ParsedConfig {
            path: PathBuf::from(path),
            config: parse_config_str(toml, Path::new(path)).unwrap(),
        }
    }

    fn names(config: &Config) -> Vec<&str> {
        config.fields.iter().map(|f| f.name.as_str()).collect()
    }

    #[test]
    fn merge_empty_configs() {
        let result = merge_configs(&[]);
        assert!(result.fields.is_empty());
        assert!(result.config_root.is_none());
        assert_eq!(result.labels.and, "AND");
    }

    #[test]
    fn field_defaults() {
        let result = merge_configs(&[parsed("/p/.xsearch.toml", "[[field]]\nname = \"ort\"\n")]);
        let field = &result.fields[0];
        assert_eq!(field.label, "ort");
        assert_eq!(field.kind, FieldKind::Text);
        assert_eq!(field.operators, ComparisonOperator::ALL.to_vec());
        assert!(field.values.is_empty());
        assert_eq!(result.config_root, Some(PathBuf::from("/p")));
    }

    #[test]
    fn settings_highest_precedence_wins() {
        let high = parsed(
            "/p/sub/.xsearch.toml",
            "[settings]\ndefault_field = \"near\"\n",
        );
        let low = parsed(
            "/p/.xsearch.toml",
            "[settings]\ndefault_field = \"far\"\nbase_url = \"https://x.org/s\"\n",
        );

        let result = merge_configs(&[high, low]);
        assert_eq!(result.settings.default_field.as_deref(), Some("near"));
        assert_eq!(result.settings.base_url.as_deref(), Some("https://x.org/s"));
        assert_eq!(result.config_root, Some(PathBuf::from("/p/sub")));
    }

    #[test]
    fn comparator_labels_merge_per_key() {
        let high = parsed("/a", "[labels]\nand = \"UND\"\n[labels.comparators]\n\"==\" = \"ist\"\n");
        let low = parsed(
            "/b",
            "[labels]\nor = \"ODER\"\n[labels.comparators]\n\"==\" = \"equals\"\n\"!=\" = \"is not\"\n",
        );

        let labels = merge_configs(&[high, low]).labels;
        assert_eq!(labels.and, "UND");
        assert_eq!(labels.or, "ODER");
        assert_eq!(labels.comparators["=="], "ist");
        assert_eq!(labels.comparators["!="], "is not");
    }

    #[test]
    fn fields_first_definition_wins_in_first_appearance_order() {
        let high = parsed(
            "/a",
            "[[field]]\nname = \"b\"\nlabel = \"near b\"\n\n[[field]]\nname = \"c\"\n",
        );
        let low = parsed(
            "/b",
            "[[field]]\nname = \"a\"\n\n[[field]]\nname = \"b\"\nlabel = \"far b\"\n",
        );

        let result = merge_configs(&[high, low]);
        assert_eq!(names(&result), vec!["b", "c", "a"]);
        assert_eq!(result.fields[0].label, "near b");
        assert!(result.duplicate_fields.is_empty());
    }

    #[test]
    fn duplicates_within_one_file_are_recorded() {
        let config = parsed(
            "/a/.xsearch.toml",
            "[[field]]\nname = \"x\"\nlabel = \"first\"\n\n[[field]]\nname = \"x\"\nlabel = \"second\"\n",
        );

        let result = merge_configs(&[config]);
        assert_eq!(names(&result), vec!["x"]);
        assert_eq!(result.fields[0].label, "first");
        assert_eq!(
            result.duplicate_fields,
            vec![DuplicateField {
                name: "x".into(),
                path: PathBuf::from("/a/.xsearch.toml"),
            }]
        );
    }
}
