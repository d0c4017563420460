//! Configuration validation.
//!
//! Validates a loaded configuration and reports warnings for potential issues.

use std::fmt;

use crate::Config;

/// A non-fatal warning about the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigWarning {
    /// No fields are registered.
    NoFieldsDefined,
    /// `settings.default_field` names a field that is not registered.
    UnknownDefaultField {
        /// The configured name.
        field: String,
    },
    /// A field is defined twice in one file; the first definition is used.
    DuplicateField {
        /// Name of the field.
        field: String,
        /// File holding both definitions.
        path: String,
    },
    /// A field allows no comparison operator, so no term can use it.
    NoOperators {
        /// Name of the field.
        field: String,
    },
}

impl fmt::Display for ConfigWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoFieldsDefined => write!(f, "no fields are defined in configuration"),
            Self::UnknownDefaultField { field } => {
                write!(f, "default field '{field}' is not a defined field")
            }
            Self::DuplicateField { field, path } => {
                write!(f, "field '{field}' is defined more than once in {path}")
            }
            Self::NoOperators { field } => {
                write!(f, "field '{field}' allows no comparison operators")
            }
        }
    }
}

/// Validates the configuration and returns any warnings.
///
/// This checks for:
/// - Empty registry (no fields defined)
/// - A default field that is not registered
/// - Fields defined twice in one file
/// - Fields with an empty operator list
pub fn validate_config(config: &Config) -> Vec<ConfigWarning> {
    if config.fields.is_empty() {
        return vec![ConfigWarning::NoFieldsDefined];
    }

    let mut warnings = Vec::new();

    if let Some(ref name) = config.settings.default_field
        && config.find_field(name).is_none()
    {
        warnings.push(ConfigWarning::UnknownDefaultField {
            field: name.clone(),
        });
    }

    warnings.extend(
        config
            .duplicate_fields
            .iter()
            .map(|dup| ConfigWarning::DuplicateField {
                field: dup.name.clone(),
                path: dup.path.display().to_string(),
            }),
    );

    warnings.extend(
        config
            .fields
            .iter()
            .filter(|field| field.operators.is_empty())
            .map(|field| ConfigWarning::NoOperators {
                field: field.name.clone(),
            }),
    );

    warnings
}
