//! # cmdjson Error Handling
//!
//! Two layers of `miette`-based diagnostics:
//!
//! - **`ParseError`**: raised by a parser. Carries the full captured input and
//!   a span on the offending token so diagnostic mode can show exactly where
//!   the command output stopped matching the expected shape.
//! - **`CmdJsonError`**: everything the driver can report. Parse failures are
//!   wrapped here at the dispatch boundary, naming the parser that failed.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::parsers::Token;

/// Convenience alias used throughout the crate.
pub type Result<T, E = CmdJsonError> = std::result::Result<T, E>;

// ============================================================================
// PARSE ERRORS - raised by individual parsers
// ============================================================================

/// A fatal failure inside a parser. No records are returned when this occurs.
#[derive(Debug, Error, Diagnostic)]
pub enum ParseError {
    #[error("`{token}` is not a valid {field}")]
    #[diagnostic(
        code(cmdjson::parse::integer),
        help("numeric columns must contain only digits once brackets and history markers are removed")
    )]
    InvalidInteger {
        field: &'static str,
        token: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("expected an integer")]
        span: SourceSpan,
    },

    #[error("line {line} has no {field} column")]
    #[diagnostic(code(cmdjson::parse::missing_field))]
    MissingField {
        field: &'static str,
        line: usize,
        #[source_code]
        src: NamedSource<String>,
        #[label("this line ends early")]
        span: SourceSpan,
    },

    #[error("failed to build record: {0}")]
    #[diagnostic(code(cmdjson::parse::record))]
    Record(#[from] serde_json::Error),
}

impl ParseError {
    /// Builds an `InvalidInteger` error for `token`, which sits on the line
    /// beginning at byte `line_start` of `input`.
    pub fn invalid_integer(
        parser: &str,
        input: &str,
        field: &'static str,
        token: &Token<'_>,
        line_start: usize,
    ) -> Self {
        ParseError::InvalidInteger {
            field,
            token: token.text.to_string(),
            src: NamedSource::new(parser, input.to_string()),
            span: (line_start + token.offset, token.text.len().max(1)).into(),
        }
    }

    /// Builds a `MissingField` error spanning the whole offending line.
    pub fn missing_field(
        parser: &str,
        input: &str,
        field: &'static str,
        line_number: usize,
        line_start: usize,
        line: &str,
    ) -> Self {
        ParseError::MissingField {
            field,
            line: line_number,
            src: NamedSource::new(parser, input.to_string()),
            span: (line_start, line.len().max(1)).into(),
        }
    }
}

// ============================================================================
// DRIVER ERRORS - everything the command-line tool reports
// ============================================================================

/// Unified error type for resolution, dispatch, and I/O failures.
#[derive(Debug, Error, Diagnostic)]
pub enum CmdJsonError {
    /// Magic syntax matched no parser, or matched several and the arguments
    /// could not tell them apart.
    #[error("parser not found for \"{command}\"")]
    #[diagnostic(code(cmdjson::resolve))]
    Resolution { command: String },

    #[error("{parser} parser could not parse the input data. Did you use the correct parser?")]
    #[diagnostic(code(cmdjson::parse), help("For details use the -d option."))]
    Parse {
        parser: String,
        #[source]
        source: ParseError,
    },

    #[error("{0}")]
    #[diagnostic(code(cmdjson::usage))]
    Usage(String),

    #[error("failed to read input: {0}")]
    #[diagnostic(code(cmdjson::io))]
    Io(#[from] std::io::Error),

    #[error("could not run `{command}`: {source}")]
    #[diagnostic(code(cmdjson::command))]
    Command {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("duplicate {kind} `{name}` in parser registry")]
    #[diagnostic(code(cmdjson::registry))]
    Registry { kind: &'static str, name: String },

    #[error("failed to serialize output: {0}")]
    #[diagnostic(code(cmdjson::output))]
    Serialize(#[from] serde_json::Error),
}

impl CmdJsonError {
    pub fn usage(message: impl Into<String>) -> Self {
        CmdJsonError::Usage(message.into())
    }

    pub fn resolution(tokens: &[String]) -> Self {
        CmdJsonError::Resolution {
            command: tokens.join(" "),
        }
    }
}
