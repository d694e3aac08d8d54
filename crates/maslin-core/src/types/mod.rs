//! # Core Type Definitions
//!
//! This module contains the shared types of the maslin import/export core:
//! - Model identifiers (`DomainNumber`, `ClassNumber`)
//! - The instance attribute bag (`Instance`)
//! - Error types (`MaslinError`)
//!
//! ## Determinism Guarantees
//!
//! Identifiers implement `Ord` so the model can be keyed by `BTreeMap` and
//! enumerated in a stable, ascending order.

use std::fmt;
use thiserror::Error;

// =============================================================================
// MODEL IDENTIFIERS
// =============================================================================

/// Identifier of a model namespace.
///
/// The import flow uses a single namespace, [`DomainNumber::DEFAULT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DomainNumber(pub u8);

impl DomainNumber {
    /// The namespace every record is imported into.
    pub const DEFAULT: Self = Self(crate::primitives::DOMAIN_NUMBER);
}

/// Identifier of an instantiable class within the class-number space.
///
/// Class numbers are dense: a schema with `n` classes uses exactly `0..n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClassNumber(pub usize);

impl ClassNumber {
    /// Get the raw class number.
    #[must_use]
    pub const fn value(self) -> usize {
        self.0
    }
}

impl fmt::Display for ClassNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// INSTANCE
// =============================================================================

/// An instance of a model class: an ordered bag of named attribute values.
///
/// Instances are created by record handlers and are never mutated after the
/// model is sealed. Attribute order follows the class schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    class: ClassNumber,
    attributes: Vec<(String, String)>,
}

impl Instance {
    /// Create an empty instance of the given class.
    #[must_use]
    pub fn new(class: ClassNumber) -> Self {
        Self {
            class,
            attributes: Vec::new(),
        }
    }

    /// Append an attribute value.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.push((name.into(), value.into()));
    }

    /// Builder-style variant of [`Instance::push`].
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    /// The class this instance belongs to.
    #[must_use]
    pub fn class(&self) -> ClassNumber {
        self.class
    }

    /// Look up an attribute value by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(attr, _)| attr == name)
            .map(|(_, value)| value.as_str())
    }

    /// Attribute values in schema order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.attributes.iter().map(|(_, value)| value.as_str())
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur while importing or dumping a model.
///
/// Errors fall into two classes:
/// - **record errors** concern a single input line and may be skipped under
///   [`ErrorPolicy::Skip`](crate::ingestor::ErrorPolicy::Skip)
/// - **run errors** always abort the run
///
/// The core never panics on malformed input.
#[derive(Debug, Error)]
pub enum MaslinError {
    /// The line starts with the delimiter, so its element name is empty.
    #[error("Empty element name")]
    EmptyElement,

    /// No handler is registered for the element name.
    #[error("Unknown element: {0}")]
    UnknownElement(String),

    /// The line carries more value fields than a record can hold.
    #[error("Too many values for {element}: at most {limit} are supported")]
    TooManyValues { element: String, limit: usize },

    /// A value was supplied in a slot the class has no attribute for.
    #[error("Unexpected value for {element} in slot {slot}: class has {expected} attributes")]
    ExtraValues {
        element: String,
        slot: usize,
        expected: usize,
    },

    /// A decoded value exceeds the per-field bound.
    #[error("Value in slot {slot} is {length} bytes (maximum {limit})")]
    ValueTooLong {
        slot: usize,
        length: usize,
        limit: usize,
    },

    /// A field does not decode to valid UTF-8.
    #[error("Invalid UTF-8 in {field}")]
    InvalidUtf8 { field: String },

    /// A dump statement does not follow `INSERT INTO <KL> VALUES (...);`.
    #[error("Malformed statement: {0}")]
    MalformedStatement(String),

    /// A dump statement names key letters outside the schema.
    #[error("Unknown key letters: {0}")]
    UnknownKeyLetters(String),

    /// A dump statement carries a different number of values than its
    /// class has attributes.
    #[error("{key_letters} takes {expected} values, statement has {found}")]
    ValueCount {
        key_letters: String,
        found: usize,
        expected: usize,
    },

    /// A record error, annotated with the 1-based input line it occurred on.
    #[error("line {line}: {source}")]
    AtLine {
        line: u64,
        #[source]
        source: Box<MaslinError>,
    },

    /// An input line exceeds the reader capacity.
    #[error("line {line}: exceeds maximum length of {limit} bytes")]
    LineTooLong { line: u64, limit: usize },

    /// The class schema is inconsistent.
    #[error("Invalid schema: {0}")]
    Schema(String),

    /// The configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// An I/O error occurred on the input or output stream.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MaslinError {
    /// Whether this error concerns a single record rather than the whole run.
    #[must_use]
    pub fn is_record_error(&self) -> bool {
        match self {
            Self::EmptyElement
            | Self::UnknownElement(_)
            | Self::TooManyValues { .. }
            | Self::ExtraValues { .. }
            | Self::ValueTooLong { .. }
            | Self::InvalidUtf8 { .. }
            | Self::MalformedStatement(_)
            | Self::UnknownKeyLetters(_)
            | Self::ValueCount { .. } => true,
            Self::AtLine { source, .. } => source.is_record_error(),
            Self::LineTooLong { .. } | Self::Schema(_) | Self::Config(_) | Self::Io(_) => false,
        }
    }

    /// Attach a line number to this error.
    #[must_use]
    pub fn at_line(self, line: u64) -> Self {
        match self {
            Self::AtLine { .. } | Self::LineTooLong { .. } => self,
            other => Self::AtLine {
                line,
                source: Box::new(other),
            },
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instance_lookup_by_name() {
        let instance = Instance::new(ClassNumber(0))
            .with("name", "MyPackage")
            .with("number", "1");

        assert_eq!(instance.get("name"), Some("MyPackage"));
        assert_eq!(instance.get("number"), Some("1"));
        assert_eq!(instance.get("missing"), None);
        assert_eq!(instance.values().collect::<Vec<_>>(), vec!["MyPackage", "1"]);
    }

    #[test]
    fn record_errors_are_classified() {
        assert!(MaslinError::EmptyElement.is_record_error());
        assert!(MaslinError::UnknownElement("X".to_string()).is_record_error());
        assert!(!MaslinError::LineTooLong { line: 1, limit: 4 }.is_record_error());
        assert!(!MaslinError::Config("bad".to_string()).is_record_error());
    }

    #[test]
    fn at_line_wraps_once() {
        let err = MaslinError::UnknownElement("FOO".to_string())
            .at_line(3)
            .at_line(7);

        assert!(err.is_record_error());
        assert_eq!(err.to_string(), "line 3: Unknown element: FOO");
    }

    #[test]
    fn default_domain_is_zero() {
        assert_eq!(DomainNumber::DEFAULT, DomainNumber(0));
    }
}
