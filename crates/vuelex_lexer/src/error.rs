//! Errors raised around the tokenizer.
//!
//! Tokenizing itself never fails; these cover loading options and compiling
//! the rule tables and filename globs.

use crate::grammar::StateId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid lexer options: {0}")]
    Options(#[from] serde_json::Error),

    #[error("invalid pattern `{pattern}` in state {state}: {source}")]
    Pattern {
        state: StateId,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid filename pattern `{glob}`: {source}")]
    Glob {
        glob: String,
        #[source]
        source: globset::Error,
    },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
