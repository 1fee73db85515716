//! # Pip Show Parser
//!
//! Parses `pip3 show`, which prints one `Key: value` block per package with
//! `---` lines between packages.

use serde_json::{Map, Value};
use tracing::warn;

use super::{ParseOptions, Parser, ParserInfo, Platform, Record};
use crate::errors::ParseError;

static INFO: ParserInfo = ParserInfo {
    version: "1.0",
    description: "pip show command parser",
    author: "cmdjson contributors",
    compatible: &[
        Platform::Linux,
        Platform::Darwin,
        Platform::Cygwin,
        Platform::Win32,
    ],
};

pub struct PipShowParser;

impl Parser for PipShowParser {
    fn info(&self) -> &ParserInfo {
        &INFO
    }

    fn parse(&self, data: &str, options: ParseOptions) -> Result<Vec<Record>, ParseError> {
        let mut output = Vec::new();
        let mut package: Vec<(String, String)> = Vec::new();

        for line in data.lines() {
            if line.trim().is_empty() {
                continue;
            }
            if line.starts_with("---") {
                if !package.is_empty() {
                    output.push(finish(std::mem::take(&mut package), options.raw));
                }
                continue;
            }
            if line.starts_with(char::is_whitespace) {
                if let Some((_, value)) = package.last_mut() {
                    if !value.is_empty() {
                        value.push('\n');
                    }
                    value.push_str(line.trim());
                    continue;
                }
            }
            match line.split_once(':') {
                Some((key, value)) => {
                    let key = key.trim().to_lowercase().replace('-', "_");
                    package.push((key, value.trim().to_string()));
                }
                None => {
                    if !options.quiet {
                        warn!("pip-show parser skipped unrecognized line: {:?}", line);
                    }
                }
            }
        }

        if !package.is_empty() {
            output.push(finish(package, options.raw));
        }
        Ok(output)
    }
}

/// Empty values become `null` unless raw output was requested.
fn finish(fields: Vec<(String, String)>, raw: bool) -> Record {
    let record: Map<String, Value> = fields
        .into_iter()
        .map(|(key, value)| {
            let value = if value.is_empty() && !raw {
                Value::Null
            } else {
                Value::String(value)
            };
            (key, value)
        })
        .collect();
    Value::Object(record)
}
