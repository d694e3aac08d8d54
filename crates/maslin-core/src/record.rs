//! # Record Buffer
//!
//! Splits an input line into an element name and up to [`MAX_VALUES`]
//! decoded value fields, stored in a fixed set of reusable slots.
//!
//! ## Framing
//!
//! `<element-name>,<value1>,<value2>,...,<valueN>`
//!
//! - Single delimiter, no quoting and no escaping. A raw comma always ends
//!   a field; a value that must contain a comma is sent as `%2C`
//! - The element name is taken verbatim (not decoded)
//! - Each value is percent-decoded after splitting
//! - A line without any comma is a record with zero values
//!
//! ## Slot Reuse
//!
//! Every slot is cleared at the start of [`RecordBuffer::fill`], so a short
//! record never exposes a value left behind by a longer one.

use crate::MaslinError;
use crate::decode::decode_into;
use crate::primitives::{DELIMITER, MAX_VALUES, MAX_VALUE_LENGTH};

/// The fixed-width value sequence handed to record handlers.
pub type Values = [String; MAX_VALUES];

/// Reusable scratch storage for one parsed record.
#[derive(Debug, Default)]
pub struct RecordBuffer {
    element: String,
    values: Values,
    present: usize,
    scratch: Vec<u8>,
}

impl RecordBuffer {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `line` into this buffer, replacing the previous record.
    ///
    /// On error the buffer content is unspecified until the next successful
    /// call.
    pub fn fill(&mut self, line: &[u8]) -> Result<(), MaslinError> {
        self.clear();

        let mut fields = line.split(|&b| b == DELIMITER);
        let element = fields.next().unwrap_or_default();
        if element.is_empty() {
            return Err(MaslinError::EmptyElement);
        }
        let element = std::str::from_utf8(element).map_err(|_| MaslinError::InvalidUtf8 {
            field: "element name".to_string(),
        })?;
        self.element.push_str(element);

        for (slot, raw) in fields.enumerate() {
            if slot >= MAX_VALUES {
                return Err(MaslinError::TooManyValues {
                    element: self.element.clone(),
                    limit: MAX_VALUES,
                });
            }

            decode_into(raw, &mut self.scratch);
            if self.scratch.len() > MAX_VALUE_LENGTH {
                return Err(MaslinError::ValueTooLong {
                    slot,
                    length: self.scratch.len(),
                    limit: MAX_VALUE_LENGTH,
                });
            }
            let value =
                std::str::from_utf8(&self.scratch).map_err(|_| MaslinError::InvalidUtf8 {
                    field: format!("value {}", slot + 1),
                })?;

            self.values[slot].push_str(value);
            self.present = slot + 1;
        }

        Ok(())
    }

    /// Reset the element name and every value slot.
    pub fn clear(&mut self) {
        self.element.clear();
        for value in &mut self.values {
            value.clear();
        }
        self.present = 0;
    }

    /// The element name of the current record.
    #[must_use]
    pub fn element(&self) -> &str {
        &self.element
    }

    /// All value slots; slots past [`RecordBuffer::present`] are empty.
    #[must_use]
    pub fn values(&self) -> &Values {
        &self.values
    }

    /// Number of value fields the current line actually carried.
    #[must_use]
    pub fn present(&self) -> usize {
        self.present
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(line: &str) -> RecordBuffer {
        let mut record = RecordBuffer::new();
        record.fill(line.as_bytes()).expect("fill");
        record
    }

    #[test]
    fn splits_element_and_values() {
        let record = filled("PKG,MyPackage,1");

        assert_eq!(record.element(), "PKG");
        assert_eq!(record.present(), 2);
        assert_eq!(record.values()[0], "MyPackage");
        assert_eq!(record.values()[1], "1");
        assert!(record.values()[2..].iter().all(String::is_empty));
    }

    #[test]
    fn splits_before_decoding() {
        let record = filled("OBJ,a%2Cb,c");

        assert_eq!(record.present(), 2);
        assert_eq!(record.values()[0], "a,b");
        assert_eq!(record.values()[1], "c");
    }

    #[test]
    fn line_without_delimiter_has_no_values() {
        let record = filled("SYS");

        assert_eq!(record.element(), "SYS");
        assert_eq!(record.present(), 0);
        assert!(record.values().iter().all(String::is_empty));
    }

    #[test]
    fn trailing_delimiter_yields_empty_value() {
        let record = filled("PKG,name,");
        assert_eq!(record.present(), 2);
        assert_eq!(record.values()[1], "");
    }

    #[test]
    fn element_is_not_decoded() {
        let record = filled("P%4BG,x");
        assert_eq!(record.element(), "P%4BG");
    }

    #[test]
    fn exactly_eight_values_fill_every_slot() {
        let record = filled("SVC,1,2,3,4,5,6,7,8");

        assert_eq!(record.present(), MAX_VALUES);
        let expected: Vec<String> = (1..=8).map(|i| i.to_string()).collect();
        assert_eq!(record.values().to_vec(), expected);
    }

    #[test]
    fn nine_values_are_rejected() {
        let mut record = RecordBuffer::new();
        let err = record.fill(b"SVC,1,2,3,4,5,6,7,8,9").expect_err("too many");
        assert!(matches!(err, MaslinError::TooManyValues { limit: 8, .. }));
    }

    #[test]
    fn empty_element_is_rejected() {
        let mut record = RecordBuffer::new();
        assert!(matches!(
            record.fill(b",value"),
            Err(MaslinError::EmptyElement)
        ));
    }

    #[test]
    fn shorter_record_does_not_see_stale_values() {
        let mut record = RecordBuffer::new();
        record
            .fill(b"SVC,aaaaaaaa,bbbbbbbb,c,d,e,f,g,h")
            .expect("long record");
        record.fill(b"PKG,x").expect("short record");

        assert_eq!(record.element(), "PKG");
        assert_eq!(record.present(), 1);
        assert_eq!(record.values()[0], "x");
        assert!(record.values()[1..].iter().all(String::is_empty));
    }

    #[test]
    fn oversized_value_is_rejected() {
        let line = format!("PKG,{}", "x".repeat(MAX_VALUE_LENGTH + 1));
        let mut record = RecordBuffer::new();
        let err = record.fill(line.as_bytes()).expect_err("too long");
        assert!(matches!(err, MaslinError::ValueTooLong { slot: 0, .. }));
    }

    #[test]
    fn invalid_utf8_value_is_rejected() {
        let mut record = RecordBuffer::new();
        let err = record.fill(b"PKG,ok,%C3").expect_err("bad utf8");
        assert_eq!(err.to_string(), "Invalid UTF-8 in value 2");
    }
}
