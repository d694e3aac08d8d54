//! # maslin
//!
//! Library half of the maslin binary: argument parsing, configuration
//! resolution and the stdin-to-stdout import pipeline. `main.rs` only adds
//! logging setup and the process exit status.

pub mod cli;
