pub use crate::errors::{CmdJsonError, ParseError};
pub use crate::parsers::{ParseOptions, Parser, ParserInfo, Record};
pub use crate::registry::{build_default_registry, ParserDescriptor, ParserRegistry};

pub mod cli;
pub mod errors;
pub mod logging;
pub mod magic;
pub mod parsers;
pub mod registry;

pub use cli::dispatch;
pub use magic::MagicResolver;
