//! # Pip List Parser
//!
//! Parses `pip3 list` in both the columnar layout
//!
//! ```text
//! Package    Version  Location
//! ---------- -------- ------------------
//! requests   2.31.0
//! mylib      0.1.0    /home/user/src/mylib
//! ```
//!
//! and the legacy layout (`requests (2.31.0)`).

use serde_json::{Map, Value};
use tracing::warn;

use super::{content_lines, split_fields, ParseOptions, Parser, ParserInfo, Platform, Record};
use crate::errors::ParseError;

static INFO: ParserInfo = ParserInfo {
    version: "1.0",
    description: "pip list command parser",
    author: "cmdjson contributors",
    compatible: &[
        Platform::Linux,
        Platform::Darwin,
        Platform::Cygwin,
        Platform::Win32,
    ],
};

pub struct PipListParser;

impl Parser for PipListParser {
    fn info(&self) -> &ParserInfo {
        &INFO
    }

    fn parse(&self, data: &str, options: ParseOptions) -> Result<Vec<Record>, ParseError> {
        let lines: Vec<&str> = content_lines(data).map(|(_, line)| line).collect();
        let Some(first) = lines.first() else {
            return Ok(Vec::new());
        };

        if first.contains(" (") {
            Ok(parse_legacy(&lines, options.quiet))
        } else {
            Ok(parse_table(&lines))
        }
    }
}

/// Header row names the keys; each row is split into at most as many fields.
fn parse_table(lines: &[&str]) -> Vec<Record> {
    let mut rows = lines.iter().filter(|line| !line.contains("---"));
    let Some(header) = rows.next() else {
        return Vec::new();
    };
    let keys: Vec<String> = split_fields(header, usize::MAX)
        .iter()
        .map(|t| t.text.to_lowercase())
        .collect();

    rows.map(|row| {
        let values = split_fields(row, keys.len());
        let record: Map<String, Value> = keys
            .iter()
            .zip(values.iter())
            .map(|(key, value)| (key.clone(), Value::String(value.text.to_string())))
            .collect();
        Value::Object(record)
    })
    .collect()
}

fn parse_legacy(lines: &[&str], quiet: bool) -> Vec<Record> {
    let mut output = Vec::new();
    for line in lines {
        let Some((package, rest)) = line.split_once(" (") else {
            if !quiet {
                warn!("pip-list parser skipped unrecognized line: {:?}", line);
            }
            continue;
        };
        let inner = rest.trim_end().trim_end_matches(')');
        let mut record = Map::new();
        record.insert("package".to_string(), Value::String(package.trim().to_string()));
        match inner.split_once(',') {
            Some((version, location)) => {
                record.insert("version".to_string(), Value::String(version.trim().to_string()));
                record.insert("location".to_string(), Value::String(location.trim().to_string()));
            }
            None => {
                record.insert("version".to_string(), Value::String(inner.trim().to_string()));
            }
        }
        output.push(Value::Object(record));
    }
    output
}
