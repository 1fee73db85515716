//! # Jobs Parser
//!
//! Parses the output of the shell `jobs` builtin, with or without `-l`.
//!
//! ```text
//! [1]   Running     sleep 10000 &
//! [4]-  14814 Running     sleep 10003 &
//! [5]+  14815 Running     sleep 10004 &
//! ```
//!
//! Each non-blank line becomes one record with the fields `job_number`,
//! `pid` (long format only), `history` (when a `+`/`-` marker is present),
//! `status`, and `command`. Lines are handled independently.

use serde::Serialize;

use super::{content_lines, split_fields, ParseOptions, Parser, ParserInfo, Platform, Record, Token};
use crate::errors::ParseError;

const NAME: &str = "jobs";

static INFO: ParserInfo = ParserInfo {
    version: "1.1",
    description: "jobs command parser",
    author: "cmdjson contributors",
    compatible: &[
        Platform::Linux,
        Platform::Darwin,
        Platform::Cygwin,
        Platform::Aix,
        Platform::Freebsd,
    ],
};

/// Which job a history marker refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum History {
    /// `+`: the job most recently stopped or started in the background.
    Current,
    /// `-`: the job before that.
    Previous,
}

/// One processed line of `jobs` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobEntry {
    pub job_number: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pid: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<History>,
    pub status: String,
    pub command: String,
}

/// Same shape as [`JobEntry`], with numeric columns left as written.
#[derive(Debug, Serialize)]
struct RawJobEntry<'a> {
    job_number: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pid: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    history: Option<History>,
    status: &'a str,
    command: &'a str,
}

/// Fields of a single line after tokenization, before numeric coercion.
#[derive(Debug)]
struct JobLine<'a> {
    job_number: Token<'a>,
    pid: Option<Token<'a>>,
    history: Option<History>,
    status: &'a str,
    command: &'a str,
}

pub struct JobsParser;

impl Parser for JobsParser {
    fn info(&self) -> &ParserInfo {
        &INFO
    }

    fn parse(&self, data: &str, options: ParseOptions) -> Result<Vec<Record>, ParseError> {
        let mut output = Vec::new();

        for (index, (line_start, line)) in content_lines(data).enumerate() {
            let (fields, entry) = parse_line(data, index + 1, line_start, line)?;
            let record = if options.raw {
                serde_json::to_value(RawJobEntry {
                    job_number: fields.job_number.text,
                    pid: fields.pid.map(|t| t.text),
                    history: fields.history,
                    status: fields.status,
                    command: fields.command,
                })?
            } else {
                serde_json::to_value(entry)?
            };
            output.push(record);
        }

        Ok(output)
    }
}

impl JobsParser {
    /// Parses `data` into typed entries, bypassing JSON conversion.
    pub fn entries(&self, data: &str) -> Result<Vec<JobEntry>, ParseError> {
        content_lines(data)
            .enumerate()
            .map(|(index, (line_start, line))| {
                parse_line(data, index + 1, line_start, line).map(|(_, entry)| entry)
            })
            .collect()
    }
}

fn parse_line<'a>(
    data: &str,
    line_number: usize,
    line_start: usize,
    line: &'a str,
) -> Result<(JobLine<'a>, JobEntry), ParseError> {
    let fields = split_line(data, line_number, line_start, line)?;
    let entry = JobEntry {
        job_number: parse_number(data, "job number", &fields.job_number, line_start)?,
        pid: fields
            .pid
            .as_ref()
            .map(|token| parse_number(data, "pid", token, line_start))
            .transpose()?,
        history: fields.history,
        status: fields.status.to_string(),
        command: fields.command.to_string(),
    };
    Ok((fields, entry))
}

// ============================================================================
// LINE TOKENIZATION
// ============================================================================

fn split_line<'a>(
    data: &str,
    line_number: usize,
    line_start: usize,
    line: &'a str,
) -> Result<JobLine<'a>, ParseError> {
    let missing =
        |field: &'static str| ParseError::missing_field(NAME, data, field, line_number, line_start, line);

    let tokens = split_fields(line, 3);
    let (mut job_number, second) = match tokens.as_slice() {
        [first, second, ..] => (*first, *second),
        _ => return Err(missing("status")),
    };

    let (pid, status, command) = if second.text.chars().all(|c| c.is_ascii_digit()) {
        // `jobs -l` inserts the pid column before status.
        let rest = tokens.get(2).ok_or_else(|| missing("status"))?;
        let rest_fields = split_fields(rest.text, 2);
        match rest_fields.as_slice() {
            [status, command] => (Some(second), status.text, command.text),
            _ => return Err(missing("command")),
        }
    } else {
        let command = tokens.get(2).ok_or_else(|| missing("command"))?;
        (None, second.text, command.text)
    };

    // Both markers are checked in turn; `-` wins when a line carries both.
    let mut history = None;
    if job_number.text.contains('+') {
        history = Some(History::Current);
    }
    if job_number.text.contains('-') {
        history = Some(History::Previous);
    }
    job_number.text = job_number.text.trim_end_matches(&['+', '-'][..]);

    let stripped = job_number.text.trim_start_matches('[');
    job_number.offset += job_number.text.len() - stripped.len();
    job_number.text = stripped.trim_end_matches(']');

    Ok(JobLine {
        job_number,
        pid,
        history,
        status,
        command,
    })
}

fn parse_number<T: std::str::FromStr>(
    data: &str,
    field: &'static str,
    token: &Token<'_>,
    line_start: usize,
) -> Result<T, ParseError> {
    if token.text.is_empty() || !token.text.chars().all(|c| c.is_ascii_digit()) {
        return Err(ParseError::invalid_integer(NAME, data, field, token, line_start));
    }
    token
        .text
        .parse()
        .map_err(|_| ParseError::invalid_integer(NAME, data, field, token, line_start))
}
