//! Field resolution engine.
//!
//! Pure, synchronous functions turning a compiled [`FormSchema`](crate::core::models::FormSchema)
//! and a profile's raw sources into edit-form values and ordered display fields.
//! Nothing here performs I/O; callers materialise every input first.

pub mod display;
pub mod initial_values;
pub mod subjects;

pub use display::{derive_display_label, merge_overrides, override_map, OverrideMap};
pub use initial_values::{coerce_integer, resolve_field, resolve_form, resolve_initial_values, Resolution};
pub use subjects::partition_ordered_subjects;

use crate::core::models::FormValues;
use std::fmt;

/// Knobs for initial-value resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResolveOptions {
    /// Keep values a source explicitly set to something falsy (`0`, `false`, `""`).
    /// Off by default: the edit form has always dropped them.
    pub keep_cleared: bool,
}

/// A per-field data problem. Recorded and logged, never raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldIssue {
    /// No source has anything for the field
    MissingFieldSource {
        /// Field name
        field: String,
    },
    /// The matching record lacks the member this field type reads
    MalformedRecord {
        /// Field name
        field: String,
        /// Member that was expected (`value` or `code`)
        expected: &'static str,
    },
    /// Integer coercion failed; the field resolved to `NotANumber`
    TypeCoercionFailure {
        /// Field name
        field: String,
        /// Value that failed to coerce
        raw: String,
    },
}

impl FieldIssue {
    fn missing(field: &str) -> Self {
        Self::MissingFieldSource {
            field: field.to_string(),
        }
    }

    /// Name of the field the issue concerns
    #[must_use]
    pub fn field(&self) -> &str {
        match self {
            Self::MissingFieldSource { field }
            | Self::MalformedRecord { field, .. }
            | Self::TypeCoercionFailure { field, .. } => field,
        }
    }
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFieldSource { field } => write!(f, "field '{field}': no source value"),
            Self::MalformedRecord { field, expected } => {
                write!(f, "field '{field}': record has no `{expected}`")
            }
            Self::TypeCoercionFailure { field, raw } => {
                write!(f, "field '{field}': '{raw}' is not a number")
            }
        }
    }
}

/// Resolved form values with the issues met along the way
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResolvedForm {
    /// Sparse values in schema order
    pub values: FormValues,
    /// Per-field issues in schema order
    pub issues: Vec<FieldIssue>,
}
