//! # CLI Command Implementations
//!
//! The import pipeline behind the `maslin` binary:
//!
//! 1. Create the model over the built-in schema and apply model options
//! 2. Load every globals file (an earlier instance dump) into the model
//! 3. Ingest the main record stream
//! 4. Seal the model and write the dump
//!
//! Nothing reaches the output unless every load and ingestion succeeded.

use maslin_core::{
    ExportOutcome, ImportConfig, IngestOutcome, Ingestor, InstanceLoader, LoadOutcome,
    MaslinError, Model, ModelOption, RecordFailure, Registry, Schema, SealedModel, SqlDumper,
    export,
};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Source label used in diagnostics for the main record stream.
const STDIN_LABEL: &str = "<stdin>";

/// Counters for one complete run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Combined counters of all globals files.
    pub globals: LoadOutcome,
    /// Counters of the main record stream.
    pub input: IngestOutcome,
    /// Counters of the dump.
    pub export: ExportOutcome,
}

// =============================================================================
// IMPORT COMMAND
// =============================================================================

/// Import globals and `input` into a fresh model, then dump it to `out`.
pub fn run_import<R, W>(
    config: &ImportConfig,
    input: R,
    out: &mut W,
) -> Result<RunSummary, MaslinError>
where
    R: BufRead,
    W: Write,
{
    let (model, mut summary) = import_model(config, input)?;

    summary.export = export(&model, &mut SqlDumper, out)?;
    out.flush()?;

    tracing::info!(
        records = summary.input.records,
        globals = summary.globals.statements,
        blank = summary.input.blank,
        skipped = summary.input.failed,
        instances = summary.export.instances,
        "Import complete"
    );

    Ok(summary)
}

/// Build and seal the model: options, then globals, then `input`.
pub fn import_model<R: BufRead>(
    config: &ImportConfig,
    input: R,
) -> Result<(SealedModel, RunSummary), MaslinError> {
    let schema = Schema::builtin();
    let registry = Registry::from_schema(&schema);
    let mut model = Model::new(schema);
    config.apply_to(&mut model);
    for option in ModelOption::ALL {
        if let Some(value) = model.option(option) {
            tracing::debug!(option = option.name(), value, "Model option set");
        }
    }

    let mut summary = RunSummary::default();

    let loader = InstanceLoader::new(config.max_line_length);
    for path in &config.globals {
        summary.globals.merge(load_globals(&loader, &mut model, path)?);
    }

    let mut ingestor = Ingestor::new(&registry, config.ingest_config());
    summary.input = ingestor.ingest(input, &mut model, |failure| {
        report_failure(STDIN_LABEL, &failure)
    })?;

    Ok((model.seal(), summary))
}

/// Load one globals dump into `model`.
fn load_globals(
    loader: &InstanceLoader,
    model: &mut Model,
    path: &Path,
) -> Result<LoadOutcome, MaslinError> {
    let file = File::open(path).map_err(|e| {
        MaslinError::Config(format!(
            "Cannot open globals file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let label = path.display().to_string();
    tracing::debug!(path = %label, "Loading globals");

    loader
        .load(BufReader::new(file), model)
        .inspect_err(|e| tracing::error!(path = %label, "Globals file rejected: {}", e))
}

fn report_failure(source: &str, failure: &RecordFailure) {
    tracing::warn!(
        source,
        line = failure.line,
        "Skipped record: {}",
        failure.error
    );
}

// =============================================================================
// TESTS
// =============================================================================
