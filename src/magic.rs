//! # Magic Syntax
//!
//! Lets users write `cmdjson pip3 list` instead of `pip3 list | cmdjson --pip-list`.
//! The [`MagicResolver`] maps the invocation tokens onto exactly one registry
//! descriptor or fails; it never guesses between candidates.
//!
//! Once resolved, [`run_command`] executes the original command through
//! `sh` so shell builtins such as `jobs` work. The tokens are handed over as
//! positional parameters and expanded with `"$@"`, so the user's text is
//! never re-parsed by the shell.

use std::process::{Command, Stdio};

use tracing::debug;

use crate::errors::{CmdJsonError, Result};
use crate::registry::{ParserDescriptor, ParserRegistry};

/// True when `args` (everything after the program name) uses magic syntax:
/// there is a first argument and it is not an option.
pub fn is_magic_invocation(args: &[String]) -> bool {
    args.first().is_some_and(|first| !first.starts_with('-'))
}

/// Resolves magic invocations against a registry.
pub struct MagicResolver<'r> {
    registry: &'r ParserRegistry,
}

impl<'r> MagicResolver<'r> {
    pub fn new(registry: &'r ParserRegistry) -> Self {
        Self { registry }
    }

    /// Picks the single descriptor matching `tokens`.
    ///
    /// One candidate for the leading token is selected outright. Several
    /// candidates are narrowed by comparing the second token with each
    /// candidate's second magic token; anything other than exactly one match
    /// is a resolution failure.
    pub fn resolve(&self, tokens: &[String]) -> Result<&'r ParserDescriptor> {
        let first = tokens
            .first()
            .ok_or_else(|| CmdJsonError::resolution(tokens))?;

        let candidates = self.registry.candidates_by_leading_token(first);
        debug!(
            "magic candidates for {:?}: {:?}",
            first,
            candidates.iter().map(|d| d.short_name).collect::<Vec<_>>()
        );

        let found = match candidates.as_slice() {
            [] => None,
            [only] => Some(*only),
            _ => match tokens.get(1) {
                Some(second) => {
                    let mut matches = candidates.iter().filter(|d| {
                        d.magic_tokens()
                            .and_then(|t| t.get(1).copied())
                            .is_some_and(|t| t == second.as_str())
                    });
                    match (matches.next(), matches.next()) {
                        (Some(one), None) => Some(*one),
                        _ => None,
                    }
                }
                None => None,
            },
        };

        let descriptor = found.ok_or_else(|| CmdJsonError::resolution(tokens))?;
        debug!("magic syntax resolved to {}", descriptor.invocation_flag());
        Ok(descriptor)
    }
}

const SHELL: &str = "sh";

/// Runs `tokens` as a command and returns everything it wrote to standard
/// output. Standard input and standard error are inherited.
pub fn run_command(tokens: &[String]) -> Result<String> {
    if tokens.is_empty() {
        return Err(CmdJsonError::usage("missing command"));
    }

    // `$0` is the placeholder name; the tokens become `$1..`.
    let output = Command::new(SHELL)
        .args(["-c", "\"$@\"", "cmdjson"])
        .args(tokens)
        .stdin(Stdio::inherit())
        .stderr(Stdio::inherit())
        .output()
        .map_err(|source| CmdJsonError::Command {
            command: tokens.join(" "),
            source,
        })?;

    if !output.status.success() {
        debug!("`{}` exited with {}", tokens.join(" "), output.status);
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::JobsParser;
    use crate::registry::build_default_registry;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_is_magic_invocation() {
        assert!(is_magic_invocation(&args(&["jobs", "-l"])));
        assert!(!is_magic_invocation(&args(&["--jobs", "-p"])));
        assert!(!is_magic_invocation(&args(&[])));
    }

    #[test]
    fn test_single_candidate() {
        let registry = build_default_registry().unwrap();
        let resolver = MagicResolver::new(&registry);
        let descriptor = resolver.resolve(&args(&["jobs", "-l"])).unwrap();
        assert_eq!(descriptor.short_name, "jobs");
    }

    #[test]
    fn test_tie_broken_by_second_token() {
        let registry = build_default_registry().unwrap();
        let resolver = MagicResolver::new(&registry);
        let descriptor = resolver.resolve(&args(&["pip3", "show", "requests"])).unwrap();
        assert_eq!(descriptor.short_name, "pip-show");
    }

    #[test]
    fn test_tie_without_second_token_fails() {
        let registry = build_default_registry().unwrap();
        let resolver = MagicResolver::new(&registry);
        let err = resolver.resolve(&args(&["pip3"])).unwrap_err();
        assert!(matches!(err, CmdJsonError::Resolution { .. }));
    }

    #[test]
    fn test_tie_with_unknown_second_token_fails() {
        let registry = build_default_registry().unwrap();
        let resolver = MagicResolver::new(&registry);
        assert!(resolver.resolve(&args(&["pip3", "install", "x"])).is_err());
    }

    #[test]
    fn test_bare_command_never_wins_a_tie() {
        let registry = ParserRegistry::new([
            ParserDescriptor::new("svc", Some("svc"), &JobsParser),
            ParserDescriptor::new("svc-lj", Some("svc list-jobs"), &JobsParser),
        ])
        .unwrap();
        let resolver = MagicResolver::new(&registry);
        assert!(resolver.resolve(&args(&["svc"])).is_err());
        assert!(resolver.resolve(&args(&["svc", "status"])).is_err());
        assert_eq!(
            resolver.resolve(&args(&["svc", "list-jobs"])).unwrap().short_name,
            "svc-lj"
        );
    }

    #[test]
    fn test_run_command_captures_stdout() {
        let out = run_command(&args(&["printf", "%s|", "a b", "c"])).unwrap();
        assert_eq!(out, "a b|c|");
    }

    #[test]
    fn test_run_command_does_not_reinterpret_tokens() {
        let out = run_command(&args(&["echo", "$HOME;", "`id`", "*"])).unwrap();
        assert_eq!(out, "$HOME; `id` *\n");
    }

    #[test]
    fn test_run_command_shell_builtin() {
        let out = run_command(&args(&["jobs", "-l"])).unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn test_run_command_missing_program_yields_no_output() {
        let out = run_command(&args(&["cmdjson-test-no-such-program"])).unwrap();
        assert_eq!(out, "");
    }

    #[test]
    fn test_run_command_requires_tokens() {
        assert!(matches!(run_command(&[]), Err(CmdJsonError::Usage(_))));
    }
}
