//! Configuration file parsing.
//!
//! Parses individual `.xsearch.toml` files into `RawConfig` structures whose fields are all
//! optional, so partial files can be merged.

use std::{collections::BTreeMap, fs, path::Path};

use serde::Deserialize;
use serde_with::{OneOrMany, serde_as};
#[cfg(test)]
use toml::de::Error as TomlError;
use xsearch_query::ComparisonOperator;

use crate::{ConfigError, FieldKind};

/// Raw configuration as parsed directly from a TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// When true, stop discovery here - ignore parent and global configs.
    pub root: Option<bool>,
    /// General settings section.
    pub settings: Option<RawSettings>,
    /// Display labels section.
    pub labels: Option<RawLabelSettings>,
    /// `[[field]]` entries, in file order.
    pub field: Option<Vec<RawField>>,
}

/// Raw general settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSettings {
    /// Field given to newly added terms.
    pub default_field: Option<String>,
    /// Search page that deep links point at.
    pub base_url: Option<String>,
}

/// Raw display labels.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawLabelSettings {
    /// Label for `;`.
    pub and: Option<String>,
    /// Label for `,`.
    pub or: Option<String>,
    /// Labels keyed by RSQL comparator (`"=="`, `"<="`, ...).
    pub comparators: Option<BTreeMap<String, String>>,
}

/// Raw `[[field]]` entry.
#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct RawField {
    /// Field name as used in RSQL.
    pub name: String,
    /// Display label.
    pub label: Option<String>,
    /// Value type.
    #[serde(rename = "type")]
    pub kind: Option<FieldKind>,
    /// Allowed comparators; a single string or a list.
    #[serde(default)]
    #[serde_as(as = "Option<OneOrMany<_>>")]
    pub operators: Option<Vec<ComparisonOperator>>,
    /// Value translations for enumerated fields.
    pub values: Option<BTreeMap<String, String>>,
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    let config: RawConfig = toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })?;

    let empty_name = config
        .field
        .iter()
        .flatten()
        .any(|field| field.name.trim().is_empty());
    if empty_name {
        return Err(ConfigError::EmptyFieldName {
            path: path.to_path_buf(),
        });
    }

    Ok(config)
}

/// Parses configuration from a TOML string without path context (tests only).
#[cfg(test)]
pub fn parse_config(contents: &str) -> Result<RawConfig, TomlError> {
    toml::from_str(contents)
}

/// Checks if a config file has `root = true` set.
///
/// Returns false if the file cannot be read or parsed.
pub fn is_root_config(path: &Path) -> bool {
    fs::read_to_string(path)
        .ok()
        .and_then(|contents| toml::from_str::<RawConfig>(&contents).ok())
        .is_some_and(|config| config.root == Some(true))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(toml: &str) -> RawConfig {
        parse_config_str(toml, Path::new("test.toml")).unwrap()
    }

    #[test]
    fn empty_config() {
        let config = parse("");
        assert!(config.root.is_none());
        assert!(config.settings.is_none());
        assert!(config.labels.is_none());
        assert!(config.field.is_none());
    }

    #[test]
    fn settings_and_labels() {
        let config = parse(
            r#"
[settings]
default_field = "settlement-search"

[labels]
and = "UND"

[labels.comparators]
"==" = "ist"
"#,
        );
        let settings = config.settings.unwrap();
        assert_eq!(settings.default_field.as_deref(), Some("settlement-search"));
        assert!(settings.base_url.is_none());

        let labels = config.labels.unwrap();
        assert_eq!(labels.and.as_deref(), Some("UND"));
        assert!(labels.or.is_none());
        assert_eq!(labels.comparators.unwrap()["=="], "ist");
    }

    #[test]
    fn fields_keep_file_order() {
        let config = parse(
            r#"
[[field]]
name = "b"

[[field]]
name = "a"
type = "enum"
"#,
        );
        let fields = config.field.unwrap();
        assert_eq!(fields[0].name, "b");
        assert_eq!(fields[1].name, "a");
        assert_eq!(fields[1].kind, Some(FieldKind::Enum));
    }

    #[test]
    fn operators_accept_one_or_many() {
        let config = parse(
            r#"
[[field]]
name = "one"
operators = "=="

[[field]]
name = "many"
operators = ["<", ">="]

[[field]]
name = "none"
"#,
        );
        let fields = config.field.unwrap();
        assert_eq!(fields[0].operators, Some(vec![ComparisonOperator::Equal]));
        assert_eq!(
            fields[1].operators,
            Some(vec![ComparisonOperator::Less, ComparisonOperator::GreaterOrEqual])
        );
        assert!(fields[2].operators.is_none());
    }

    #[test]
    fn enum_values() {
        let config = parse(
            r#"
[[field]]
name = "material"
type = "enum"
values = { parchment = "Pergament", paper = "Papier" }
"#,
        );
        let values = config.field.unwrap().remove(0).values.unwrap();
        assert_eq!(values["paper"], "Papier");
    }

    #[test]
    fn unknown_operator_is_an_error() {
        let result = parse_config_str(
            "[[field]]\nname = \"x\"\noperators = \"=in=\"\n",
            Path::new("test.toml"),
        );
        assert!(matches!(result, Err(ConfigError::ParseToml { .. })));
    }

    #[test]
    fn unknown_type_is_an_error() {
        let result = parse_config_str(
            "[[field]]\nname = \"x\"\ntype = \"blob\"\n",
            Path::new("test.toml"),
        );
        assert!(matches!(result, Err(ConfigError::ParseToml { .. })));
    }

    #[test]
    fn empty_field_name_is_an_error() {
        let result = parse_config_str("[[field]]\nname = \" \"\n", Path::new("x.toml"));
        assert!(matches!(result, Err(ConfigError::EmptyFieldName { .. })));
    }

    #[test]
    fn invalid_toml() {
        let result = parse_config_str("[settings", Path::new("bad.toml"));
        let err = result.unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }
}
