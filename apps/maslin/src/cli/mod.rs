//! # maslin CLI Module
//!
//! Option parsing for the maslin binary.
//!
//! ## Options
//!
//! - `-g PATH` - Load an earlier instance dump as globals (repeatable)
//! - `-a DIALECT` - Set the `actiondialect` model option
//! - `-i PATH` / `-o PATH` - Set the `projectroot` model option
//! - `--config PATH` - Read settings from a TOML file (`MASLIN_CONFIG`)
//!
//! Letters follow getopt conventions: an option's argument is the rest of
//! its token or else the next token, even one starting with `-`. Repeated
//! `-a`, `-i` or `-o` keep the last value, and an unrecognized option only
//! produces a warning. A recognized option without its argument is a usage
//! error.

mod commands;

use clap::Parser;
use clap::error::{ContextKind, ContextValue, ErrorKind};
use maslin_core::{ImportConfig, MaslinError};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// maslin - MASL record stream importer
///
/// Reads comma-delimited, percent-encoded records from stdin and writes the
/// populated model to stdout as an xtUML instance dump.
#[derive(Parser, Debug, Default)]
#[command(name = "maslin")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Instance dump loaded as globals before stdin (repeatable)
    #[arg(short = 'g', value_name = "PATH", allow_hyphen_values = true)]
    pub globals: Vec<PathBuf>,

    /// Action language dialect of imported action bodies
    #[arg(short = 'a', value_name = "DIALECT", allow_hyphen_values = true)]
    pub action_dialect: Vec<String>,

    /// Root directory of the target project (`-o` is an alias)
    #[arg(
        short = 'i',
        short_alias = 'o',
        value_name = "PATH",
        allow_hyphen_values = true
    )]
    pub project_root: Vec<PathBuf>,

    /// TOML configuration file
    #[arg(long, env = "MASLIN_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,
}

// =============================================================================
// ARGUMENT PARSING
// =============================================================================

/// Parse `args`, dropping unrecognized options with a warning.
///
/// Every other parse failure (missing option argument, `--help`,
/// `--version`) is returned for the caller to report through
/// [`clap::Error::exit`].
pub fn parse_args<I, T>(args: I) -> Result<Cli, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString>,
{
    let mut args: Vec<OsString> = args.into_iter().map(Into::into).collect();

    loop {
        match Cli::try_parse_from(&args) {
            Ok(cli) => return Ok(cli),
            Err(err) if err.kind() == ErrorKind::UnknownArgument => {
                let Some(invalid) = invalid_arg(&err) else {
                    return Err(err);
                };
                if !scrub(&mut args, &invalid) {
                    return Err(err);
                }
                warn_unknown(&invalid);
            }
            Err(err) => return Err(err),
        }
    }
}

fn invalid_arg(err: &clap::Error) -> Option<String> {
    match err.get(ContextKind::InvalidArg)? {
        ContextValue::String(arg) => Some(arg.clone()),
        _ => None,
    }
}

fn warn_unknown(invalid: &str) {
    match short_letter(invalid) {
        Some(letter) => tracing::warn!("Unknown option character '{}'.", letter),
        None => tracing::warn!("Ignoring unrecognized argument '{}'.", invalid),
    }
}

/// The letter of a single short option such as `-x`.
fn short_letter(arg: &str) -> Option<char> {
    let mut chars = arg.strip_prefix('-')?.chars();
    match (chars.next(), chars.next()) {
        (Some(letter), None) if letter != '-' => Some(letter),
        _ => None,
    }
}

/// Short options that take an argument.
const VALUE_LETTERS: [char; 4] = ['a', 'g', 'i', 'o'];

/// Long options that take an argument.
const VALUE_LONGS: [&str; 1] = ["config"];

/// Remove `invalid` from the option part of `args`.
///
/// Tokens are walked the way the parser reads them: the argument of a
/// value-taking option is never touched, whether attached (`-aexample`) or
/// in the next token. Inside a bundle (`-ex`) only the unknown letter
/// itself is removed, and only if no value-taking letter precedes it.
/// Returns `false` when nothing could be removed.
fn scrub(args: &mut Vec<OsString>, invalid: &str) -> bool {
    let letter = short_letter(invalid);
    let mut value_follows = false;

    for index in 1..args.len() {
        if std::mem::take(&mut value_follows) {
            continue;
        }
        let Some(arg) = args[index].to_str() else {
            continue;
        };
        if arg == "--" {
            return false;
        }

        if let Some(long) = arg.strip_prefix("--") {
            let name = long.split_once('=').map_or(long, |(name, _)| name);
            if arg == invalid || invalid.strip_prefix("--") == Some(name) {
                args.remove(index);
                return true;
            }
            value_follows = !long.contains('=') && VALUE_LONGS.contains(&name);
            continue;
        }

        let Some(bundle) = arg.strip_prefix('-').filter(|bundle| !bundle.is_empty()) else {
            if arg == invalid {
                args.remove(index);
                return true;
            }
            continue;
        };

        for (at, c) in bundle.char_indices() {
            if Some(c) == letter {
                let mut rest = bundle.to_string();
                rest.remove(at);
                if rest.is_empty() {
                    args.remove(index);
                } else {
                    args[index] = OsString::from(format!("-{rest}"));
                }
                return true;
            }
            if VALUE_LETTERS.contains(&c) {
                value_follows = at + c.len_utf8() == bundle.len();
                break;
            }
        }
    }
    false
}

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Read an [`ImportConfig`] from a TOML file.
pub fn load_config_file(path: &Path) -> Result<ImportConfig, MaslinError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        MaslinError::Config(format!("Cannot read config '{}': {}", path.display(), e))
    })?;
    toml::from_str(&text)
        .map_err(|e| MaslinError::Config(format!("Invalid config '{}': {}", path.display(), e)))
}

impl Cli {
    /// Build the run configuration.
    ///
    /// Defaults are overlaid by the config file, then by command-line
    /// options. `-g` paths replace the file's globals list; for `-a` and
    /// `-i`/`-o` the last occurrence wins.
    pub fn resolve(&self) -> Result<ImportConfig, MaslinError> {
        let mut config = match &self.config {
            Some(path) => load_config_file(path)?,
            None => ImportConfig::default(),
        };

        if !self.globals.is_empty() {
            config.globals = self.globals.clone();
        }
        if let Some(dialect) = self.action_dialect.last() {
            config.action_dialect = Some(dialect.clone());
        }
        if let Some(root) = self.project_root.last() {
            config.project_root = Some(root.clone());
        }

        config.validate()?;
        Ok(config)
    }
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Resolve the configuration and run the import on the process streams.
pub fn execute(cli: &Cli) -> Result<RunSummary, MaslinError> {
    let config = cli.resolve()?;
    tracing::debug!(?config, "resolved configuration");

    let stdin = std::io::stdin().lock();
    let mut stdout = std::io::BufWriter::new(std::io::stdout().lock());
    run_import(&config, stdin, &mut stdout)
}

// =============================================================================
// TESTS
// =============================================================================
