//! Lexer options.
//!
//! Options are plain data; hosts usually build them in code, but they can
//! also be read from a JSON object such as `{"expressionAwareAttributes": false}`.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Options that select between tokenizer variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct LexerOptions {
    /// Lex double-quoted attribute values as script expressions, exposing
    /// member access, call shorthand and `in` clauses as separate tokens.
    /// When off, a double-quoted value is a single string token.
    pub expression_aware_attributes: bool,
}

impl Default for LexerOptions {
    fn default() -> Self {
        Self {
            expression_aware_attributes: true,
        }
    }
}

impl LexerOptions {
    /// Options for the variant that keeps double-quoted attribute values opaque.
    pub fn opaque_attributes() -> Self {
        Self {
            expression_aware_attributes: false,
        }
    }

    /// Parse options from a JSON object. Missing fields keep their defaults.
    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}
