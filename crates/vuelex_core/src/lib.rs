//! vuelex_core: Core types shared by the vuelex tokenizer crates.
//!
//! Provides the token kind hierarchy that highlighting hosts map to colors,
//! the borrowed `Token` record, and text spans.

pub mod text;
pub mod token;

// Re-export commonly used types
pub use text::{TextPos, TextSpan};
pub use token::{Token, TokenKind};
