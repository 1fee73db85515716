//! # cmdjson: Parser Registry
//!
//! The registry is the static table of every parser the tool knows about.
//! Each [`ParserDescriptor`] names a parser, the `--flag` that selects it, and
//! optionally the command line that magic syntax recognises for it.
//!
//! Registry Invariant: the registry is constructed once at the entrypoint and
//! passed by reference to the resolver and the dispatch glue. It is never
//! mutated after construction and never read from global state.

use std::collections::HashSet;

use crate::errors::{CmdJsonError, Result};
use crate::parsers::{JobsParser, Parser, PipListParser, PipShowParser};

static JOBS: JobsParser = JobsParser;
static PIP_LIST: PipListParser = PipListParser;
static PIP_SHOW: PipShowParser = PipShowParser;

/// Static description of one parser.
#[derive(Clone, Copy)]
pub struct ParserDescriptor {
    /// Unique name, e.g. `pip-list`.
    pub short_name: &'static str,
    /// Command line that magic syntax maps to this parser, e.g. `pip3 list`.
    /// `None` means the parser is reachable only through its flag.
    pub magic_command: Option<&'static str>,
    /// The implementation invoked through the parser contract.
    pub parser: &'static dyn Parser,
}

impl ParserDescriptor {
    pub const fn new(
        short_name: &'static str,
        magic_command: Option<&'static str>,
        parser: &'static dyn Parser,
    ) -> Self {
        Self {
            short_name,
            magic_command,
            parser,
        }
    }

    /// `--` followed by the short name.
    pub fn invocation_flag(&self) -> String {
        format!("--{}", self.short_name)
    }

    /// The whitespace-delimited tokens of the magic command, if any.
    pub fn magic_tokens(&self) -> Option<Vec<&'static str>> {
        self.magic_command
            .map(|command| command.split_whitespace().collect())
    }
}

impl std::fmt::Debug for ParserDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParserDescriptor")
            .field("short_name", &self.short_name)
            .field("magic_command", &self.magic_command)
            .finish()
    }
}

/// The built-in parser table, in help-text order.
pub static DEFAULT_PARSERS: &[ParserDescriptor] = &[
    ParserDescriptor::new("jobs", Some("jobs"), &JOBS),
    ParserDescriptor::new("pip-list", Some("pip3 list"), &PIP_LIST),
    ParserDescriptor::new("pip-show", Some("pip3 show"), &PIP_SHOW),
];

/// Immutable, validated set of parser descriptors.
#[derive(Debug, Clone)]
pub struct ParserRegistry {
    descriptors: Vec<ParserDescriptor>,
}

impl ParserRegistry {
    /// Builds a registry, rejecting duplicate short names and duplicate
    /// magic commands. Magic commands may share their leading token.
    pub fn new(descriptors: impl IntoIterator<Item = ParserDescriptor>) -> Result<Self> {
        let descriptors: Vec<ParserDescriptor> = descriptors.into_iter().collect();
        let mut names = HashSet::new();
        let mut commands = HashSet::new();

        for descriptor in &descriptors {
            if !names.insert(descriptor.short_name) {
                return Err(CmdJsonError::Registry {
                    kind: "parser name",
                    name: descriptor.short_name.to_string(),
                });
            }
            if let Some(tokens) = descriptor.magic_tokens() {
                if tokens.is_empty() || !commands.insert(tokens.join(" ")) {
                    return Err(CmdJsonError::Registry {
                        kind: "magic command",
                        name: descriptor.magic_command.unwrap_or_default().to_string(),
                    });
                }
            }
        }

        Ok(Self { descriptors })
    }

    /// Finds the descriptor selected by `flag` (`--name`).
    pub fn lookup_by_flag(&self, flag: &str) -> Option<&ParserDescriptor> {
        let name = flag.strip_prefix("--")?;
        self.lookup_by_name(name)
    }

    pub fn lookup_by_name(&self, name: &str) -> Option<&ParserDescriptor> {
        self.descriptors.iter().find(|d| d.short_name == name)
    }

    /// All descriptors with a magic command whose first token is `token`,
    /// in registry order.
    pub fn candidates_by_leading_token(&self, token: &str) -> Vec<&ParserDescriptor> {
        self.descriptors
            .iter()
            .filter(|d| {
                d.magic_command
                    .and_then(|command| command.split_whitespace().next())
                    == Some(token)
            })
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ParserDescriptor> {
        self.descriptors.iter()
    }
}

/// Builds the registry of built-in parsers.
///
/// # Example
/// ```
/// use cmdjson::registry::build_default_registry;
/// let registry = build_default_registry().unwrap();
/// assert!(registry.lookup_by_flag("--jobs").is_some());
/// ```
pub fn build_default_registry() -> Result<ParserRegistry> {
    ParserRegistry::new(DEFAULT_PARSERS.iter().copied())
}
