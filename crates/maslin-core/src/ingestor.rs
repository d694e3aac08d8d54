//! # Ingestor Module
//!
//! Record stream ingestion for maslin.
//!
//! - Read one bounded line at a time
//! - Split, then decode, into reusable record slots
//! - Resolve the element name and populate the model
//! - Apply the configured policy to record-level failures
//!
//! Ingestion is a single synchronous pass; the only blocking point is the
//! input stream.

use crate::MaslinError;
use crate::model::Model;
use crate::primitives::DEFAULT_MAX_LINE_LENGTH;
use crate::reader::LineReader;
use crate::record::RecordBuffer;
use crate::registry::Registry;
use serde::Deserialize;
use std::io::BufRead;

// =============================================================================
// CONFIGURATION
// =============================================================================

/// What to do when a single record cannot be imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Fail the whole run on the first bad record.
    #[default]
    Stop,
    /// Report the record through `on_failure` and continue.
    Skip,
}

/// Limits and policies for one ingestion pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestConfig {
    /// Longest accepted line in bytes, excluding the terminator.
    pub max_line_length: usize,
    /// Handling of record-level failures.
    pub on_error: ErrorPolicy,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            max_line_length: DEFAULT_MAX_LINE_LENGTH,
            on_error: ErrorPolicy::Stop,
        }
    }
}

// =============================================================================
// OUTCOME
// =============================================================================

/// Counters for one ingestion pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IngestOutcome {
    /// Lines read, including blank and failed ones.
    pub lines: u64,
    /// Records handed to a handler successfully.
    pub records: u64,
    /// Zero-length lines, which carry no record.
    pub blank: u64,
    /// Records skipped under [`ErrorPolicy::Skip`].
    pub failed: u64,
}

impl IngestOutcome {
    /// Add the counters of another pass.
    pub fn merge(&mut self, other: Self) {
        self.lines += other.lines;
        self.records += other.records;
        self.blank += other.blank;
        self.failed += other.failed;
    }
}

/// A record skipped under [`ErrorPolicy::Skip`].
#[derive(Debug)]
pub struct RecordFailure {
    /// 1-based line number within the stream.
    pub line: u64,
    /// Why the record was rejected.
    pub error: MaslinError,
}

// =============================================================================
// INGESTOR
// =============================================================================

/// Feeds a record stream into a model.
///
/// One `Ingestor` owns a single [`RecordBuffer`] that is reused for every
/// line of every stream it ingests.
#[derive(Debug)]
pub struct Ingestor<'r> {
    registry: &'r Registry,
    config: IngestConfig,
    record: RecordBuffer,
}

impl<'r> Ingestor<'r> {
    /// Create an ingestor dispatching through `registry`.
    #[must_use]
    pub fn new(registry: &'r Registry, config: IngestConfig) -> Self {
        Self {
            registry,
            config,
            record: RecordBuffer::new(),
        }
    }

    /// Ingest every line of `reader` into `model` until end of stream.
    ///
    /// Handlers are invoked once per record, in input order. Record errors
    /// either abort the pass (annotated with their line number) or are
    /// passed to `on_failure`, depending on [`IngestConfig::on_error`].
    /// Run errors (I/O, over-long lines) always abort.
    pub fn ingest<R, N>(
        &mut self,
        reader: R,
        model: &mut Model,
        mut on_failure: N,
    ) -> Result<IngestOutcome, MaslinError>
    where
        R: BufRead,
        N: FnMut(RecordFailure),
    {
        let mut lines = LineReader::new(reader, self.config.max_line_length);
        let mut outcome = IngestOutcome::default();

        while let Some(line) = lines.next_line()? {
            outcome.lines += 1;
            let line_number = outcome.lines;

            if line.is_empty() {
                outcome.blank += 1;
                continue;
            }

            match self.process(line, model) {
                Ok(()) => outcome.records += 1,
                Err(error) if error.is_record_error() && self.config.on_error == ErrorPolicy::Skip => {
                    outcome.failed += 1;
                    on_failure(RecordFailure {
                        line: line_number,
                        error,
                    });
                }
                Err(error) => return Err(error.at_line(line_number)),
            }
        }

        Ok(outcome)
    }

    fn process(&mut self, line: &[u8], model: &mut Model) -> Result<(), MaslinError> {
        self.record.fill(line)?;
        self.registry
            .populate(model, self.record.element(), self.record.values())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;
    use crate::{ClassNumber, DomainNumber};
    use std::io::Cursor;

    fn run(
        input: &str,
        config: IngestConfig,
    ) -> (Result<IngestOutcome, MaslinError>, Model, Vec<RecordFailure>) {
        let schema = Schema::builtin();
        let registry = Registry::from_schema(&schema);
        let mut model = Model::new(schema);
        let mut failures = Vec::new();

        let result = Ingestor::new(&registry, config).ingest(
            Cursor::new(input.as_bytes()),
            &mut model,
            |failure| failures.push(failure),
        );
        (result, model, failures)
    }

    #[test]
    fn ingests_records_in_order() {
        let (result, model, _) = run("PKG,A,1\nPKG,B,2\nDOM,D,A\n", IngestConfig::default());
        let outcome = result.expect("ingest");

        assert_eq!(outcome.records, 3);
        let names: Vec<_> = model
            .instances(DomainNumber::DEFAULT, ClassNumber(0))
            .iter()
            .filter_map(|i| i.get("name"))
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn blank_lines_are_counted_not_ingested() {
        let (result, model, _) = run("\nPKG,A,1\n\n", IngestConfig::default());
        let outcome = result.expect("ingest");

        assert_eq!(outcome.lines, 3);
        assert_eq!(outcome.blank, 2);
        assert_eq!(outcome.records, 1);
        assert_eq!(model.instance_count(), 1);
    }

    #[test]
    fn stop_policy_fails_on_unknown_element() {
        let (result, _, failures) = run("PKG,A,1\nBOGUS,x\n", IngestConfig::default());

        let err = result.expect_err("unknown element");
        assert_eq!(err.to_string(), "line 2: Unknown element: BOGUS");
        assert!(failures.is_empty());
    }

    #[test]
    fn skip_policy_reports_and_continues() {
        let config = IngestConfig {
            on_error: ErrorPolicy::Skip,
            ..IngestConfig::default()
        };
        let (result, model, failures) = run("BOGUS,x\n,y\nPKG,A,1\n", config);
        let outcome = result.expect("ingest");

        assert_eq!(outcome.records, 1);
        assert_eq!(outcome.failed, 2);
        assert_eq!(model.instance_count(), 1);
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].line, 1);
        assert!(matches!(failures[0].error, MaslinError::UnknownElement(_)));
        assert_eq!(failures[1].line, 2);
        assert!(matches!(failures[1].error, MaslinError::EmptyElement));
    }

    #[test]
    fn skip_policy_still_aborts_on_long_line() {
        let config = IngestConfig {
            max_line_length: 8,
            on_error: ErrorPolicy::Skip,
        };
        let (result, _, _) = run("PKG,A,1\nPKG,waytoolong,1\n", config);

        assert!(matches!(
            result,
            Err(MaslinError::LineTooLong { line: 2, limit: 8 })
        ));
    }

    #[test]
    fn outcome_merge_adds_counters() {
        let mut total = IngestOutcome {
            lines: 2,
            records: 1,
            blank: 1,
            failed: 0,
        };
        total.merge(IngestOutcome {
            lines: 3,
            records: 2,
            blank: 0,
            failed: 1,
        });

        assert_eq!(total.lines, 5);
        assert_eq!(total.records, 3);
        assert_eq!(total.blank, 1);
        assert_eq!(total.failed, 1);
    }
}
