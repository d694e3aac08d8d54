//! # Protocol Primitives
//!
//! Hardcoded constants of the record stream and dump protocols.
//!
//! These values are compiled into the binary and are immutable at runtime.
//! The banner lines in particular are a format-versioning contract with the
//! downstream consumer of the dump and must never change between runs.

/// The single field delimiter of the input protocol.
///
/// There is no quoting or escaping: a raw delimiter always ends a field.
/// Values that need a literal comma must percent-encode it as `%2C`.
pub const DELIMITER: u8 = b',';

/// The escape introducer of the percent encoding (`%XX`).
pub const PERCENT: u8 = b'%';

/// Maximum number of value fields carried by one record.
///
/// Every handler receives exactly this many slots; trailing slots the
/// input line did not provide are empty.
pub const MAX_VALUES: usize = 8;

/// Maximum decoded length of a single value field, in bytes.
pub const MAX_VALUE_LENGTH: usize = 64_000;

/// Default capacity of the line reader, in bytes, excluding the newline.
///
/// Lines longer than this are rejected; they are never truncated.
pub const DEFAULT_MAX_LINE_LENGTH: usize = 1024 * 1024;

/// The single model namespace used throughout import and dump.
pub const DOMAIN_NUMBER: u8 = 0;

// =============================================================================
// DUMP BANNER
// =============================================================================

/// First banner line: the root types contained in the dump.
///
/// The dump is imported into an existing project, so the root types are
/// packages rather than the system.
pub const ROOT_TYPES_LINE: &str = "-- root-types-contained: Package_c";

/// Second banner line: content kind and persistence version.
pub const PERSISTENCE_LINE: &str =
    "-- BP 7.1 content: StreamData syschar: 3 persistence-version: 7.1.6";

// =============================================================================
// MODEL OPTION NAMES
// =============================================================================

/// Option name carrying the action language dialect (`-a`).
pub const OPTION_ACTION_DIALECT: &str = "actiondialect";

/// Option name carrying the project root (`-i` / `-o`).
pub const OPTION_PROJECT_ROOT: &str = "projectroot";
