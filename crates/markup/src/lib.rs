#![deny(missing_docs)]
//! propkit markup: forgiving parser for playground children content.

/// Parse error type.
pub mod error;
/// Text rewrites applied before parsing.
pub mod normalize;
/// Content parsing entry points.
pub mod parse;
/// Renderable content nodes.
pub mod types;

pub use error::ContentParseError;
pub use parse::{ParseOptions, parse, parse_with_options, plain_text, try_parse, try_parse_with_options};
pub use types::ContentNode;
