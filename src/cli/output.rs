//! Handles all user-facing output for the CLI.
//!
//! JSON goes to standard output; help text and error lines go to standard
//! error so a failed run never leaves partial JSON behind.

use std::io::{self, Write};

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::errors::Result;
use crate::parsers::ParserInfo;
use crate::registry::ParserRegistry;

const INDENT: usize = 12;
const PAD: usize = 17;

// ============================================================================
// JSON OUTPUT
// ============================================================================

/// Serializes `value` to standard output, followed by a newline.
pub fn write_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_json_to(&mut out, value, pretty)?;
    out.flush()?;
    Ok(())
}

pub fn write_json_to<W: Write, T: Serialize + ?Sized>(
    out: &mut W,
    value: &T,
    pretty: bool,
) -> Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

// ============================================================================
// ABOUT DOCUMENT
// ============================================================================

#[derive(Debug, Serialize)]
pub struct About<'a> {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub author: &'static str,
    pub parser_count: usize,
    pub parsers: Vec<ParserSummary<'a>>,
}

#[derive(Debug, Serialize)]
pub struct ParserSummary<'a> {
    pub name: &'static str,
    pub argument: String,
    #[serde(flatten)]
    pub info: &'a ParserInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magic_command: Option<&'static str>,
}

pub fn about(registry: &ParserRegistry) -> About<'_> {
    let parsers: Vec<ParserSummary<'_>> = registry
        .iter()
        .map(|d| ParserSummary {
            name: d.short_name,
            argument: d.invocation_flag(),
            info: d.parser.info(),
            magic_command: d.magic_command,
        })
        .collect();

    About {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        description: env!("CARGO_PKG_DESCRIPTION"),
        author: "cmdjson contributors",
        parser_count: parsers.len(),
        parsers,
    }
}

// ============================================================================
// HELP AND ERROR TEXT
// ============================================================================

/// One line per parser: the flag padded to a column, then the description.
pub fn parsers_text(registry: &ParserRegistry, indent: usize, pad: usize) -> String {
    let mut text = String::new();
    for descriptor in registry.iter() {
        let flag = descriptor.invocation_flag();
        text.push_str(&format!(
            "{:indent$}{:<pad$}{}\n",
            "",
            flag,
            descriptor.parser.info().description,
            indent = indent,
            pad = pad
        ));
    }
    text
}

pub fn help_text(message: &str, registry: &ParserRegistry) -> String {
    let indent = " ".repeat(INDENT);
    format!(
        "\
cmdjson:     {message}

Usage:  cmdjson PARSER [OPTIONS]

        or magic syntax:

        cmdjson COMMAND [ARGS...]

Parsers:
{parsers}
Options:
{indent}-a               about cmdjson
{indent}-d               debug - show full diagnostics
{indent}-p               pretty print output
{indent}-q               quiet - suppress warnings
{indent}-r               raw JSON output

Example:
{indent}jobs -l | cmdjson --jobs -p

{indent}or using the magic syntax:

{indent}cmdjson pip3 list
",
        message = message,
        parsers = parsers_text(registry, INDENT, PAD),
        indent = indent,
    )
}

/// Writes `message` to standard error behind a highlighted error prefix.
pub fn print_error_line(message: &str) {
    let choice = if atty::is(atty::Stream::Stderr) {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stderr = StandardStream::stderr(choice);
    let _ = stderr.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true));
    let _ = write!(stderr, "cmdjson:  Error");
    let _ = stderr.reset();
    let _ = writeln!(stderr, " - {}", message);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::build_default_registry;

    #[test]
    fn test_parsers_text_alignment() {
        let registry = build_default_registry().unwrap();
        let text = parsers_text(&registry, 2, 12);
        let first = text.lines().next().unwrap();
        assert_eq!(first, "  --jobs      jobs command parser");
    }

    #[test]
    fn test_help_text_names_message_and_parsers() {
        let registry = build_default_registry().unwrap();
        let text = help_text("missing piped data", &registry);
        assert!(text.starts_with("cmdjson:     missing piped data"));
        assert!(text.contains("--pip-show"));
    }

    #[test]
    fn test_about_document() {
        let registry = build_default_registry().unwrap();
        let value = serde_json::to_value(about(&registry)).unwrap();
        assert_eq!(value["parser_count"], 3);
        assert_eq!(value["parsers"][0]["argument"], "--jobs");
        assert_eq!(value["parsers"][1]["magic_command"], "pip3 list");
        assert_eq!(value["parsers"][0]["compatible"][0], "linux");
    }

    #[test]
    fn test_compact_and_pretty_json() {
        let mut compact = Vec::new();
        write_json_to(&mut compact, &serde_json::json!([{"a": 1}]), false).unwrap();
        assert_eq!(String::from_utf8(compact).unwrap(), "[{\"a\":1}]\n");

        let mut pretty = Vec::new();
        write_json_to(&mut pretty, &serde_json::json!({"a": 1}), true).unwrap();
        assert_eq!(String::from_utf8(pretty).unwrap(), "{\n  \"a\": 1\n}\n");
    }
}
