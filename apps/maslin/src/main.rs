//! # maslin
//!
//! Command-line entry point: imports a MASL record stream from stdin and
//! writes the xtUML instance dump to stdout.
//!
//! ## Usage
//!
//! ```bash
//! # Plain import
//! maslin < model.masl.txt > model.sql
//!
//! # With globals, action dialect and project root
//! maslin -g globals.txt -a masl -i /work/project < model.masl.txt > model.sql
//! ```
//!
//! stdout carries only the dump. Diagnostics go to stderr, filtered by
//! `RUST_LOG` (default `maslin=info`); `MASLIN_LOG_FORMAT=json` switches
//! them to JSON lines.

use maslin::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

fn main() {
    // Logging to stderr only; stdout is reserved for the dump.
    let log_format = std::env::var("MASLIN_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "maslin=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::parse_args(std::env::args_os()).unwrap_or_else(|e| e.exit());

    if let Err(e) = cli::execute(&cli) {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}
