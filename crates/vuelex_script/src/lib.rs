//! vuelex_script: Lexer for the JavaScript expressions embedded in templates.
//!
//! The scanner classifies one token at a time and tells the caller which
//! scan mode the following token should be read in:
//! - Code (identifiers, keywords, numbers, strings, operators, punctuation)
//! - Regex literals where an operand is expected
//! - Template literal text and `${ ... }` holes

mod char_codes;
mod scanner;
mod token;

pub use scanner::{ScriptScanner, ScriptTokens};
pub use token::{ScriptMode, ScriptToken, Transition};
