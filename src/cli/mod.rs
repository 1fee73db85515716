//! The cmdjson Command-Line Interface.
//!
//! This module is the main entry point for the binary. It builds the parser
//! registry once, decides between magic syntax and flag invocation, runs the
//! selected parser through [`dispatch`], and turns every failure into a
//! message on standard error plus exit status 1.

use std::io::{self, Read};
use std::process::ExitCode;

use clap::error::ErrorKind;
use miette::Report;
use tracing::debug;

use crate::errors::{CmdJsonError, Result};
use crate::magic::{self, MagicResolver};
use crate::parsers::{check_compatibility, ParseOptions, Record};
use crate::registry::{build_default_registry, ParserDescriptor, ParserRegistry};
use crate::logging;

pub mod args;
pub mod output;

use args::Invocation;

// ============================================================================
// MAIN ENTRY POINT
// ============================================================================

/// The main entry point for the CLI.
pub fn run() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let registry = match build_default_registry() {
        Ok(registry) => registry,
        Err(e) => {
            eprintln!("{:?}", Report::new(e));
            return ExitCode::FAILURE;
        }
    };

    if magic::is_magic_invocation(&args) {
        logging::init(false);
        return finish(run_magic(&registry, &args), &registry, false);
    }

    let invocation = match args::parse_args(&registry, &args) {
        Ok(invocation) => invocation,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let message = format!("missing or incorrect arguments ({})", e.kind());
            return finish(Err(CmdJsonError::usage(message)), &registry, false);
        }
    };

    logging::init(invocation.options.debug);
    let debug = invocation.options.debug;
    if !invocation.ignored.is_empty() {
        debug!("ignoring unrecognised arguments: {:?}", invocation.ignored);
    }
    finish(run_flags(&registry, &invocation), &registry, debug)
}

/// Runs the parser selected by a flag against standard input.
fn run_flags(registry: &ParserRegistry, invocation: &Invocation<'_>) -> Result<()> {
    let options = &invocation.options;

    if options.about {
        return output::write_json(&output::about(registry), options.pretty);
    }

    if atty::is(atty::Stream::Stdin) {
        return Err(CmdJsonError::usage("missing piped data"));
    }

    let mut data = String::new();
    io::stdin().read_to_string(&mut data)?;

    let descriptor = invocation
        .parser
        .ok_or_else(|| CmdJsonError::usage("missing or incorrect arguments"))?;
    let records = dispatch(
        descriptor,
        &data,
        ParseOptions::new(options.raw, options.quiet),
    )?;
    output::write_json(&records, options.pretty)
}

/// Resolves magic syntax, runs the original command, and parses its output.
fn run_magic(registry: &ParserRegistry, args: &[String]) -> Result<()> {
    let descriptor = MagicResolver::new(registry).resolve(args)?;
    let data = magic::run_command(args)?;
    let records = dispatch(descriptor, &data, ParseOptions::default())?;
    output::write_json(&records, true)
}

// ============================================================================
// DISPATCH
// ============================================================================

/// Calls `descriptor`'s parser on `data`, naming the parser in any failure.
pub fn dispatch(
    descriptor: &ParserDescriptor,
    data: &str,
    options: ParseOptions,
) -> Result<Vec<Record>> {
    let parser = descriptor.parser;
    check_compatibility(descriptor.short_name, parser.info(), options.quiet);
    debug!(
        "dispatching {} bytes to {} (raw={}, quiet={})",
        data.len(),
        descriptor.invocation_flag(),
        options.raw,
        options.quiet
    );

    parser
        .parse(data, options)
        .map_err(|source| CmdJsonError::Parse {
            parser: descriptor.short_name.to_string(),
            source,
        })
}

// ============================================================================
// ERROR REPORTING
// ============================================================================

fn finish(result: Result<()>, registry: &ParserRegistry, debug: bool) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report_error(e, registry, debug);
            ExitCode::FAILURE
        }
    }
}

/// Prints `error` to standard error. Parse failures are summarised unless
/// `debug` is set, in which case the parser's own diagnostic is shown as is.
pub fn report_error(error: CmdJsonError, registry: &ParserRegistry, debug: bool) {
    match error {
        CmdJsonError::Resolution { .. } | CmdJsonError::Usage(_) => {
            eprintln!("{}", output::help_text(&error.to_string(), registry));
        }
        CmdJsonError::Parse { source, .. } if debug => {
            eprintln!("{:?}", Report::new(source));
        }
        CmdJsonError::Parse { .. } => {
            output::print_error_line(&format!(
                "{}\n         For details use the -d option.",
                error
            ));
        }
        other if debug => eprintln!("{:?}", Report::new(other)),
        other => output::print_error_line(&other.to_string()),
    }
}
