//! # maslin-core
//!
//! The record import/export core of maslin - THE LOGIC.
//!
//! This crate ingests a line-oriented stream of comma-delimited,
//! percent-encoded records into a typed in-memory model, then dumps that
//! model class by class behind a fixed, versioned banner.
//!
//! ## Data Flow
//!
//! ```text
//! InstanceLoader (globals dump) ───────────────────────────┐
//! LineReader ─▶ RecordBuffer (split, decode) ─▶ Registry ─▶ Model
//!                                                             │ seal
//!                                                             ▼
//!                            stdout ◀─ export (banner, classes) ◀─ SealedModel
//! ```
//!
//! ## Architectural Constraints
//!
//! - Single-threaded, synchronous, blocking only on the input stream
//! - Bounded: one reusable line buffer, one set of reusable value slots
//! - No logging and no process I/O; the binary owns both
//! - The model has one writer phase followed by one reader phase

// =============================================================================
// MODULES
// =============================================================================

pub mod config;
pub mod decode;
pub mod export;
pub mod ingestor;
pub mod load;
pub mod model;
pub mod primitives;
pub mod reader;
pub mod record;
pub mod registry;
pub mod schema;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{ClassNumber, DomainNumber, Instance, MaslinError};

// =============================================================================
// RE-EXPORTS: Import / Export
// =============================================================================

pub use config::ImportConfig;
pub use export::{ExportOutcome, InstanceDumper, SqlDumper, export, write_banner};
pub use ingestor::{ErrorPolicy, IngestConfig, IngestOutcome, Ingestor, RecordFailure};
pub use load::{InstanceLoader, LoadOutcome};
pub use model::{Model, ModelOption, SealedModel};
pub use reader::LineReader;
pub use record::{RecordBuffer, Values};
pub use registry::{ClassHandler, RecordHandler, Registry};
pub use schema::{AttributeDef, ClassDef, Schema};
