//! vuelex_lexer: Syntax-highlighting tokenizer for Vue single file components.
//!
//! Template markup is lexed by a stack of regex rule tables. Directive values,
//! `{{ }}` interpolations and `<script>` bodies are handed to the JavaScript
//! scanner from `vuelex_script` one token at a time, so markup delimiters
//! keep priority over script tokens inside embedded expressions.
//!
//! ```
//! use vuelex_lexer::{tokenize, TokenKind};
//!
//! let tokens: Vec<_> = tokenize("<p>{{ msg }}</p>").collect();
//! assert_eq!(tokens[1].kind, TokenKind::NameTag);
//! assert_eq!(tokens.iter().map(|t| t.text).collect::<String>(), "<p>{{ msg }}</p>");
//! ```

pub mod error;
pub mod grammar;
pub mod lexer;
pub mod options;
pub mod rules;
pub mod tokenizer;

pub use error::{Error, Result};
pub use grammar::{Grammar, StateId};
pub use lexer::VueLexer;
pub use options::LexerOptions;
pub use rules::{Emit, Rule, StackAction};
pub use tokenizer::Tokens;
pub use vuelex_core::{TextSpan, Token, TokenKind};

/// Tokenize `text` with the default options.
pub fn tokenize(text: &str) -> Tokens<'static, '_> {
    VueLexer::new().tokenize(text)
}
