//! # Instance Loader
//!
//! Reads a persisted instance dump back into a model, so the output of an
//! earlier run can seed a new one (the globals of a project).
//!
//! ## Format
//!
//! ```text
//! -- comment and banner lines are ignored, as are blank lines
//! INSERT INTO <key letters> VALUES ('v1', 'v2', ...);
//! ```
//!
//! - Quoted values double embedded quotes (`'O''Brien'`) and may span
//!   several lines
//! - Unquoted values (`1`, `true`) are taken verbatim, blanks trimmed
//! - Key letters resolve through the model's schema, and the statement
//!   must carry exactly one value per class attribute
//!
//! This is the inverse of [`SqlDumper`](crate::export::SqlDumper). Every
//! failure aborts the load, annotated with the line its statement starts on.

use crate::MaslinError;
use crate::model::Model;
use crate::reader::LineReader;
use crate::{DomainNumber, Instance};
use std::io::BufRead;

/// Counters for one load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoadOutcome {
    /// Lines read, including comments and blank lines.
    pub lines: u64,
    /// Statements loaded, one instance each.
    pub statements: u64,
}

impl LoadOutcome {
    /// Add the counters of another load.
    pub fn merge(&mut self, other: Self) {
        self.lines += other.lines;
        self.statements += other.statements;
    }
}

// =============================================================================
// LOADER
// =============================================================================

/// Loads instance dumps into a model.
#[derive(Debug, Clone, Copy)]
pub struct InstanceLoader {
    max_statement_length: usize,
}

impl InstanceLoader {
    /// Create a loader accepting statements of at most `max_statement_length`
    /// bytes, which also bounds each physical line.
    #[must_use]
    pub fn new(max_statement_length: usize) -> Self {
        Self {
            max_statement_length,
        }
    }

    /// Load every statement of `reader` into `model`, in order.
    pub fn load<R: BufRead>(
        &self,
        reader: R,
        model: &mut Model,
    ) -> Result<LoadOutcome, MaslinError> {
        let mut lines = LineReader::new(reader, self.max_statement_length);
        let mut outcome = LoadOutcome::default();
        let mut statement = String::new();
        let mut line_number = 0;
        let mut start = 0;
        let mut quotes = 0usize;

        while let Some(line) = lines.next_line()? {
            line_number += 1;
            let line = std::str::from_utf8(line).map_err(|_| {
                MaslinError::InvalidUtf8 {
                    field: "statement".to_string(),
                }
                .at_line(line_number)
            })?;

            if statement.is_empty() {
                let trimmed = line.trim();
                if trimmed.is_empty() || trimmed.starts_with("--") {
                    continue;
                }
                start = line_number;
            } else {
                statement.push('\n');
            }
            statement.push_str(line);

            if statement.len() > self.max_statement_length {
                return Err(MaslinError::MalformedStatement(format!(
                    "statement exceeds {} bytes",
                    self.max_statement_length
                ))
                .at_line(start));
            }

            // An odd quote count means a quoted value continues on the next line.
            quotes += line.bytes().filter(|&b| b == b'\'').count();
            if quotes % 2 == 1 {
                continue;
            }

            load_statement(&statement, model).map_err(|e| e.at_line(start))?;
            outcome.statements += 1;
            statement.clear();
            quotes = 0;
        }

        if !statement.is_empty() {
            return Err(
                MaslinError::MalformedStatement("unterminated quoted value".to_string())
                    .at_line(start),
            );
        }

        outcome.lines = lines.line_number();
        Ok(outcome)
    }
}

// =============================================================================
// STATEMENT PARSING
// =============================================================================

fn malformed(reason: &str) -> MaslinError {
    MaslinError::MalformedStatement(reason.to_string())
}

/// Parse one statement and insert its instance.
fn load_statement(text: &str, model: &mut Model) -> Result<(), MaslinError> {
    let (key_letters, values) = parse_statement(text)?;

    let instance = {
        let class = model
            .schema()
            .by_key_letters(key_letters)
            .ok_or_else(|| MaslinError::UnknownKeyLetters(key_letters.to_string()))?;
        if values.len() != class.attributes.len() {
            return Err(MaslinError::ValueCount {
                key_letters: key_letters.to_string(),
                found: values.len(),
                expected: class.attributes.len(),
            });
        }

        let mut instance = Instance::new(class.number);
        for (attribute, value) in class.attributes.iter().zip(values) {
            instance.push(attribute.name, value);
        }
        instance
    };

    model.insert(DomainNumber::DEFAULT, instance)
}

/// Split `INSERT INTO <KL> VALUES (...);` into key letters and values.
fn parse_statement(text: &str) -> Result<(&str, Vec<String>), MaslinError> {
    let rest = text
        .trim_start()
        .strip_prefix("INSERT INTO")
        .ok_or_else(|| malformed("expected INSERT INTO"))?
        .trim_start();
    let end = rest
        .find(char::is_whitespace)
        .ok_or_else(|| malformed("expected VALUES"))?;
    let (key_letters, rest) = rest.split_at(end);
    let mut rest = rest
        .trim_start()
        .strip_prefix("VALUES")
        .ok_or_else(|| malformed("expected VALUES"))?
        .trim_start()
        .strip_prefix('(')
        .ok_or_else(|| malformed("expected '('"))?
        .trim_start();

    let mut values = Vec::new();
    if let Some(after) = rest.strip_prefix(')') {
        rest = after;
    } else {
        loop {
            let (value, after) = parse_value(rest)?;
            values.push(value);
            let after = after.trim_start();
            if let Some(after) = after.strip_prefix(',') {
                rest = after.trim_start();
            } else if let Some(after) = after.strip_prefix(')') {
                rest = after;
                break;
            } else {
                return Err(malformed("expected ',' or ')'"));
            }
        }
    }

    if rest.trim() != ";" {
        return Err(malformed("expected ';' after the value list"));
    }
    Ok((key_letters, values))
}

/// Parse one value at the start of `text`, returning it and the remainder.
fn parse_value(text: &str) -> Result<(String, &str), MaslinError> {
    let Some(quoted) = text.strip_prefix('\'') else {
        let end = text.find([',', ')']).unwrap_or(text.len());
        let value = text[..end].trim();
        if value.is_empty() {
            return Err(malformed("missing value"));
        }
        return Ok((value.to_string(), &text[end..]));
    };

    let mut value = String::new();
    let mut chars = quoted.char_indices();
    while let Some((at, c)) = chars.next() {
        if c != '\'' {
            value.push(c);
        } else if quoted[at + 1..].starts_with('\'') {
            value.push('\'');
            chars.next();
        } else {
            return Ok((value, &quoted[at + 1..]));
        }
    }
    Err(malformed("unterminated quoted value"))
}

// =============================================================================
// TESTS
// =============================================================================
