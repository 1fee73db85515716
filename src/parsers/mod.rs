//! # Parser Contract
//!
//! Every command-output parser implements [`Parser`]. A parser receives the
//! fully buffered text captured from one command and returns the ordered
//! sequence of records it describes, or a [`ParseError`] pointing at the
//! first malformed token. Parsers never return partial data.
//!
//! ## Module Structure
//!
//! - **`jobs`**: shell job listings (`jobs`, `jobs -l`)
//! - **`pip_list`**: installed package tables (`pip3 list`)
//! - **`pip_show`**: package metadata blocks (`pip3 show`)

use serde::Serialize;
use tracing::warn;

use crate::errors::ParseError;

pub mod jobs;
pub mod pip_list;
pub mod pip_show;

pub use jobs::{History, JobEntry, JobsParser};
pub use pip_list::PipListParser;
pub use pip_show::PipShowParser;

// ============================================================================
// CORE TYPES AND TRAITS
// ============================================================================

/// One output record. Field order is defined by each parser and preserved
/// through serialization.
pub type Record = serde_json::Value;

/// Flags forwarded by the driver to every parser call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseOptions {
    /// Skip semantic post-processing (numeric coercion, null normalization).
    pub raw: bool,
    /// Suppress non-fatal warnings. Never changes whether parsing fails.
    pub quiet: bool,
}

impl ParseOptions {
    pub fn new(raw: bool, quiet: bool) -> Self {
        Self { raw, quiet }
    }
}

/// Operating systems a parser's source command is known to run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    Darwin,
    Cygwin,
    Win32,
    Aix,
    Freebsd,
}

impl Platform {
    /// The platform this binary was compiled for, if it is one we track.
    pub fn current() -> Option<Self> {
        match std::env::consts::OS {
            "linux" => Some(Platform::Linux),
            "macos" => Some(Platform::Darwin),
            "windows" => Some(Platform::Win32),
            "freebsd" => Some(Platform::Freebsd),
            "aix" => Some(Platform::Aix),
            _ => None,
        }
    }
}

/// Static metadata describing a parser, used by help and about output.
#[derive(Debug, Clone, Serialize)]
pub struct ParserInfo {
    pub version: &'static str,
    pub description: &'static str,
    pub author: &'static str,
    pub compatible: &'static [Platform],
}

/// Core trait that all command-output parsers must implement
pub trait Parser: Send + Sync {
    /// Static metadata for help and about output.
    fn info(&self) -> &ParserInfo;

    /// Parse the complete captured output of one command.
    ///
    /// # Arguments
    /// * `data` - Full text read from the input stream
    /// * `options` - Raw and quiet toggles
    ///
    /// # Returns
    /// Records in input order, or the first fatal error encountered
    fn parse(&self, data: &str, options: ParseOptions) -> Result<Vec<Record>, ParseError>;
}

// ============================================================================
// SHARED HELPERS
// ============================================================================

/// Emits a warning when the running platform is not in the parser's
/// compatibility list. Silent when `quiet` is set.
pub fn check_compatibility(name: &str, info: &ParserInfo, quiet: bool) {
    if quiet {
        return;
    }
    match Platform::current() {
        Some(platform) if info.compatible.contains(&platform) => {}
        _ => warn!(
            "{} parser is not compatible with your OS ({}). Compatible platforms: {}",
            name,
            std::env::consts::OS,
            info.compatible
                .iter()
                .map(|p| format!("{:?}", p).to_lowercase())
                .collect::<Vec<_>>()
                .join(", ")
        ),
    }
}

/// A whitespace-delimited field and its byte offset within the line it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub offset: usize,
}

/// Splits `line` on runs of whitespace into at most `max` fields. The last
/// field keeps the remainder of the line verbatim, minus its leading
/// whitespace. Leading whitespace on the line never produces an empty field.
pub fn split_fields(line: &str, max: usize) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    if max == 0 {
        return tokens;
    }

    let mut rest = line;
    let mut offset = 0;
    loop {
        let trimmed = rest.trim_start();
        offset += rest.len() - trimmed.len();
        if trimmed.is_empty() {
            break;
        }
        if tokens.len() + 1 == max {
            tokens.push(Token {
                text: trimmed,
                offset,
            });
            break;
        }
        let end = trimmed
            .find(char::is_whitespace)
            .unwrap_or(trimmed.len());
        tokens.push(Token {
            text: &trimmed[..end],
            offset,
        });
        offset += end;
        rest = &trimmed[end..];
    }
    tokens
}

/// Iterates the lines of `data` together with each line's byte offset,
/// skipping lines that contain only whitespace.
pub fn content_lines(data: &str) -> impl Iterator<Item = (usize, &str)> {
    let mut offset = 0;
    data.split_inclusive('\n').filter_map(move |raw| {
        let start = offset;
        offset += raw.len();
        let line = raw.trim_end_matches(&['\n', '\r'][..]);
        if line.trim().is_empty() {
            None
        } else {
            Some((start, line))
        }
    })
}
