//! Configuration system for xsearch.
//!
//! xsearch uses TOML configuration files named `.xsearch.toml`. Configuration is resolved by
//! walking up the directory tree from the current working directory, collecting any
//! `.xsearch.toml` files found, then loading `~/.xsearch.toml` as the global config with lowest
//! precedence.
//!
//! The configuration carries the field registry (which fields exist, their labels, value types
//! and allowed comparators) and the display labels used by the readable preview.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod templates;
#[cfg(test)]
mod test_support;
mod validate;

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawConfig, RawField, RawLabelSettings, RawSettings, parse_config_file, parse_config_str,
};
use serde::{Deserialize, Serialize};
pub use templates::{global_template, local_template};
pub use validate::ConfigWarning;
use validate::validate_config;
use xsearch_query::{ComparisonOperator, Labels, LogicOperator};

/// Field used for new terms when no field is configured.
pub const FALLBACK_FIELD: &str = "all";

/// Top-level merged configuration for xsearch.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// General settings.
    pub settings: Settings,
    /// Display labels for operators.
    pub labels: LabelSettings,
    /// The field registry, in order of first appearance.
    pub fields: Vec<Field>,
    /// Directory containing the most specific config file.
    pub config_root: Option<PathBuf>,
    /// Fields defined more than once within a single file.
    pub duplicate_fields: Vec<DuplicateField>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.xsearch.toml` files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        let parsed = files
            .iter()
            .map(|path| {
                Ok(ParsedConfig {
                    path: path.clone(),
                    config: parse_config_file(path)?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(merge_configs(&parsed))
    }

    /// Validates the configuration and returns any warnings.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Looks up a registered field by name.
    pub fn find_field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Field given to newly added terms.
    ///
    /// `settings.default_field` if set, otherwise the first registered field, otherwise
    /// [`FALLBACK_FIELD`].
    pub fn default_field(&self) -> &str {
        self.settings
            .default_field
            .as_deref()
            .or_else(|| self.fields.first().map(|field| field.name.as_str()))
            .unwrap_or(FALLBACK_FIELD)
    }

    /// Serializes the effective configuration to TOML.
    ///
    /// The output has the shape of an `.xsearch.toml` file.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        let serializable = SerializableConfig {
            settings: &self.settings,
            labels: &self.labels,
            field: &self.fields,
        };
        Ok(toml::to_string_pretty(&serializable)?)
    }
}

impl Labels for Config {
    fn field(&self, field: &str) -> String {
        self.find_field(field)
            .map_or_else(|| field.to_string(), |found| found.label.clone())
    }

    fn comparator(&self, op: ComparisonOperator) -> String {
        self.labels
            .comparators
            .get(op.as_rsql())
            .cloned()
            .unwrap_or_else(|| op.as_rsql().to_string())
    }

    fn logic(&self, op: LogicOperator) -> String {
        match op {
            LogicOperator::And => self.labels.and.clone(),
            LogicOperator::Or => self.labels.or.clone(),
        }
    }

    fn value(&self, field: &str, value: &str) -> String {
        self.find_field(field)
            .and_then(|found| found.values.get(value))
            .cloned()
            .unwrap_or_else(|| value.to_string())
    }

    fn is_text_field(&self, field: &str) -> bool {
        self.find_field(field)
            .is_none_or(|found| found.kind == FieldKind::Text)
    }
}

/// General settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Field given to newly added terms.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_field: Option<String>,
    /// Search page that deep links point at.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Display labels for logic and comparison operators.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LabelSettings {
    /// Label for AND.
    pub and: String,
    /// Label for OR.
    pub or: String,
    /// Labels keyed by RSQL comparator.
    pub comparators: BTreeMap<String, String>,
}

impl Default for LabelSettings {
    fn default() -> Self {
        Self {
            and: LogicOperator::And.keyword().to_string(),
            or: LogicOperator::Or.keyword().to_string(),
            comparators: BTreeMap::new(),
        }
    }
}

/// Value type of a field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Free text, shown raw in the preview.
    #[default]
    Text,
    /// One of a fixed set of values, translated in the preview.
    Enum,
    /// A date.
    Date,
    /// A number.
    Number,
}

impl FieldKind {
    /// The name used in configuration files.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Enum => "enum",
            Self::Date => "date",
            Self::Number => "number",
        }
    }
}

/// A registered search field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Field {
    /// Name as used in RSQL.
    pub name: String,
    /// Display label (defaults to the name).
    pub label: String,
    /// Value type.
    #[serde(rename = "type")]
    pub kind: FieldKind,
    /// Allowed comparators (defaults to all).
    pub operators: Vec<ComparisonOperator>,
    /// Value translations.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub values: BTreeMap<String, String>,
}

impl Field {
    /// Returns true when `op` may be used with this field.
    pub fn allows(&self, op: ComparisonOperator) -> bool {
        self.operators.contains(&op)
    }
}

/// A field name that appears twice in one config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateField {
    /// The repeated name.
    pub name: String,
    /// File holding both definitions.
    pub path: PathBuf,
}

/// Borrowed view of [`Config`] with the TOML file layout.
#[derive(Serialize)]
struct SerializableConfig<'a> {
    /// General settings.
    settings: &'a Settings,
    /// Display labels.
    labels: &'a LabelSettings,
    /// Field registry as `[[field]]` tables.
    field: &'a [Field],
}
