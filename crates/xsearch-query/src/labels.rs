//! Display labels for the human-readable preview.
//!
//! The field registry and translations live outside this crate; the preview only sees them
//! through [`Labels`].

use crate::model::{ComparisonOperator, LogicOperator};

/// Lookup of display text for fields, operators and values.
///
/// Every method has a default that renders the raw value, so implementors override only what
/// they translate.
pub trait Labels {
    /// Display name of a field.
    fn field(&self, field: &str) -> String {
        field.to_string()
    }

    /// Display text of a comparison operator.
    fn comparator(&self, op: ComparisonOperator) -> String {
        op.as_rsql().to_string()
    }

    /// Display text of a logic operator.
    fn logic(&self, op: LogicOperator) -> String {
        op.keyword().to_string()
    }

    /// Display text of a value of a non-text field.
    fn value(&self, _field: &str, value: &str) -> String {
        value.to_string()
    }

    /// Whether values of `field` are free text (shown raw, never translated).
    fn is_text_field(&self, _field: &str) -> bool {
        true
    }
}

/// Labels that show everything raw.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawLabels;

impl Labels for RawLabels {}
