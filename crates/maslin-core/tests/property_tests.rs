//! # Property-Based Tests
//!
//! Framing and decoding invariants checked with proptest.

use maslin_core::decode::{decode, encode};
use maslin_core::{
    ClassNumber, DomainNumber, IngestConfig, Ingestor, Model, RecordBuffer, Registry, Schema,
    SqlDumper, export,
};
use proptest::collection::vec;
use proptest::prelude::*;
use std::io::Cursor;

/// Printable text that never contains `%`.
fn plain_text() -> impl Strategy<Value = String> {
    "[^%\\x00-\\x1f]{0,40}"
}

/// Arbitrary field content, including delimiters, percent signs and quotes.
fn any_field() -> impl Strategy<Value = String> {
    "[ -~äöü€]{0,24}"
}

// =============================================================================
// PROPERTY TESTS
// =============================================================================

proptest! {
    /// Text without `%` decodes to itself.
    #[test]
    fn decode_is_identity_without_percent(text in plain_text()) {
        prop_assert_eq!(decode(&text).expect("utf8"), text);
    }

    /// Encoding every field, joining with the delimiter, then splitting and
    /// decoding yields the original fields.
    #[test]
    fn encoded_fields_survive_split_and_decode(fields in vec(any_field(), 0..=8)) {
        let mut line = String::from("OBJ");
        for field in &fields {
            line.push(',');
            line.push_str(&encode(field));
        }

        let mut record = RecordBuffer::new();
        record.fill(line.as_bytes()).expect("fill");

        prop_assert_eq!(record.element(), "OBJ");
        prop_assert_eq!(record.present(), fields.len());
        for (slot, field) in fields.iter().enumerate() {
            prop_assert_eq!(&record.values()[slot], field);
        }
        for slot in fields.len()..8 {
            prop_assert!(record.values()[slot].is_empty());
        }
    }

    /// Encoded output never contains a raw delimiter.
    #[test]
    fn encoded_text_has_no_delimiter(field in any_field()) {
        prop_assert!(!encode(&field).contains(','));
    }

    /// A reused buffer only exposes the fields of the latest line.
    #[test]
    fn reused_buffer_never_leaks(
        first in vec("[a-z]{1,6}", 0..=8),
        second in vec("[a-z]{1,6}", 0..=8),
    ) {
        let mut record = RecordBuffer::new();
        record.fill(format!("A,{}", first.join(",")).as_bytes()).expect("first");
        let line = if second.is_empty() {
            "B".to_string()
        } else {
            format!("B,{}", second.join(","))
        };
        record.fill(line.as_bytes()).expect("second");

        prop_assert_eq!(record.element(), "B");
        let filled: Vec<_> = record.values().iter().filter(|v| !v.is_empty()).cloned().collect();
        prop_assert_eq!(filled, second);
    }

    /// Same input, same dump.
    #[test]
    fn identical_input_produces_identical_dump(names in vec("[A-Za-z]{1,10}", 0..20)) {
        let input: String = names
            .iter()
            .enumerate()
            .map(|(n, name)| format!("PKG,{},{}\n", encode(name), n))
            .collect();

        let dump = |input: &str| {
            let schema = Schema::builtin();
            let registry = Registry::from_schema(&schema);
            let mut model = Model::new(schema);
            Ingestor::new(&registry, IngestConfig::default())
                .ingest(Cursor::new(input.as_bytes()), &mut model, |_| {})
                .expect("ingest");
            let model = model.seal();
            assert_eq!(
                model.instances(DomainNumber::DEFAULT, ClassNumber(0)).len(),
                names.len()
            );
            let mut out = Vec::new();
            export(&model, &mut SqlDumper, &mut out).expect("export");
            out
        };

        prop_assert_eq!(dump(&input), dump(&input));
    }
}
