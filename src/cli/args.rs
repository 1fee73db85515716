//! Defines the command-line options for cmdjson.
//!
//! The option toggles are declared with the `clap` derive API. Parser flags
//! are not declared here: [`command`] adds one `--<name>` flag per registry
//! descriptor, so the accepted flags always match the registry.
//!
//! Arguments that are neither an option nor a parser flag are set aside
//! before `clap` sees them and reported in [`Invocation::ignored`].

use clap::{Arg, ArgAction, ArgMatches, CommandFactory, FromArgMatches, Parser};

use crate::registry::{ParserDescriptor, ParserRegistry};

/// Output and diagnostic toggles.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "cmdjson",
    version,
    about = "Converts the text output of common commands into JSON.",
    override_usage = "cmdjson PARSER [OPTIONS]\n       cmdjson COMMAND [ARGS...]"
)]
pub struct Options {
    /// About cmdjson: print metadata for every parser as JSON
    #[arg(short = 'a')]
    pub about: bool,
    /// Debug: show full diagnostics when a parser fails
    #[arg(short = 'd')]
    pub debug: bool,
    /// Pretty print the JSON output
    #[arg(short = 'p')]
    pub pretty: bool,
    /// Quiet: suppress warnings
    #[arg(short = 'q')]
    pub quiet: bool,
    /// Raw JSON output, without type conversion
    #[arg(short = 'r')]
    pub raw: bool,
}

/// Parsed command line: the toggles plus the selected parser, if any.
#[derive(Debug)]
pub struct Invocation<'r> {
    pub options: Options,
    pub parser: Option<&'r ParserDescriptor>,
    /// Unrecognised arguments, in command-line order.
    pub ignored: Vec<String>,
}

const OPTION_SHORTS: &str = "adpqrhV";

/// The full `clap` command: derived options plus one flag per parser.
pub fn command(registry: &ParserRegistry) -> clap::Command {
    let mut cmd = Options::command().next_help_heading("Parsers");
    for descriptor in registry.iter() {
        cmd = cmd.arg(
            Arg::new(descriptor.short_name)
                .long(descriptor.short_name)
                .help(descriptor.parser.info().description)
                .action(ArgAction::SetTrue),
        );
    }
    cmd.args_override_self(true)
}

/// Whether `arg` is an option or parser flag that `clap` should see.
fn is_known_arg(registry: &ParserRegistry, arg: &str) -> bool {
    if let Some(long) = arg.strip_prefix("--") {
        return matches!(long, "help" | "version") || registry.lookup_by_name(long).is_some();
    }
    match arg.strip_prefix('-') {
        Some(shorts) if !shorts.is_empty() => shorts.chars().all(|c| OPTION_SHORTS.contains(c)),
        _ => false,
    }
}

/// Parses `args` (without the program name).
pub fn parse_args<'r>(
    registry: &'r ParserRegistry,
    args: &[String],
) -> Result<Invocation<'r>, clap::Error> {
    let (known, ignored): (Vec<String>, Vec<String>) = args
        .iter()
        .cloned()
        .partition(|arg| is_known_arg(registry, arg));
    let argv = std::iter::once("cmdjson".to_string()).chain(known);
    let matches = command(registry).try_get_matches_from(argv)?;
    let options = Options::from_arg_matches(&matches)?;
    Ok(Invocation {
        options,
        parser: selected_parser(registry, &matches),
        ignored,
    })
}

/// The parser whose flag appears first on the command line.
fn selected_parser<'r>(
    registry: &'r ParserRegistry,
    matches: &ArgMatches,
) -> Option<&'r ParserDescriptor> {
    registry
        .iter()
        .filter(|d| matches.get_flag(d.short_name))
        .filter_map(|d| matches.index_of(d.short_name).map(|index| (index, d)))
        .min_by_key(|(index, _)| *index)
        .map(|(_, d)| d)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::build_default_registry;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_options_and_parser_flag() {
        let registry = build_default_registry().unwrap();
        let invocation = parse_args(&registry, &args(&["--jobs", "-p", "-q"])).unwrap();
        assert!(invocation.options.pretty);
        assert!(invocation.options.quiet);
        assert!(!invocation.options.raw);
        assert_eq!(invocation.parser.unwrap().short_name, "jobs");
    }

    #[test]
    fn test_first_parser_flag_wins() {
        let registry = build_default_registry().unwrap();
        let invocation =
            parse_args(&registry, &args(&["-r", "--pip-show", "--jobs"])).unwrap();
        assert_eq!(invocation.parser.unwrap().short_name, "pip-show");
        assert!(invocation.options.raw);
    }

    #[test]
    fn test_no_parser_flag() {
        let registry = build_default_registry().unwrap();
        let invocation = parse_args(&registry, &args(&["-p"])).unwrap();
        assert!(invocation.parser.is_none());
    }

    #[test]
    fn test_unknown_arguments_ignored() {
        let registry = build_default_registry().unwrap();
        let invocation =
            parse_args(&registry, &args(&["--frobnicate", "--jobs", "-x", "extra", "-p"]))
                .unwrap();
        assert_eq!(invocation.parser.unwrap().short_name, "jobs");
        assert!(invocation.options.pretty);
        assert_eq!(invocation.ignored, args(&["--frobnicate", "-x", "extra"]));
    }

    #[test]
    fn test_repeated_flags_accepted() {
        let registry = build_default_registry().unwrap();
        let invocation = parse_args(&registry, &args(&["--jobs", "--jobs", "-p", "-p"])).unwrap();
        assert_eq!(invocation.parser.unwrap().short_name, "jobs");
        assert!(invocation.options.pretty);
        assert!(invocation.ignored.is_empty());
    }

    #[test]
    fn test_combined_short_options() {
        let registry = build_default_registry().unwrap();
        let invocation = parse_args(&registry, &args(&["-pq", "--pip-list"])).unwrap();
        assert!(invocation.options.pretty);
        assert!(invocation.options.quiet);
        assert_eq!(invocation.parser.unwrap().short_name, "pip-list");
    }

    #[test]
    fn test_command_is_well_formed() {
        let registry = build_default_registry().unwrap();
        command(&registry).debug_assert();
    }
}
