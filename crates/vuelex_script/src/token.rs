//! Tokens and scan modes of the script scanner.

use vuelex_core::TokenKind;

/// The grammar the scanner reads the next token with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptMode {
    /// Ordinary expression and statement code.
    Code,
    /// Directly after an operator, keyword or opening punctuation, where a
    /// `/` starts a regular expression literal instead of a division.
    RegexAllowed,
    /// Inside a backtick template literal.
    Template,
    /// Inside a `${ ... }` hole of a template literal.
    TemplateHole,
}

/// What the caller's mode stack should do after a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Keep scanning in the current mode.
    Stay,
    /// Enter a nested mode; it stays active until it signals `Leave`.
    Enter(ScriptMode),
    /// The current mode is complete.
    Leave,
}

/// A single token produced by the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptToken {
    /// The kind of token.
    pub kind: TokenKind,
    /// Length of the token in bytes, always non-zero.
    pub len: usize,
    /// The mode change that follows this token.
    pub transition: Transition,
}

impl ScriptToken {
    pub fn new(kind: TokenKind, len: usize) -> Self {
        Self {
            kind,
            len,
            transition: Transition::Stay,
        }
    }

    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.transition = transition;
        self
    }

    /// Whether this token hands control to a nested mode.
    pub fn enters(&self) -> Option<ScriptMode> {
        match self.transition {
            Transition::Enter(mode) => Some(mode),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enters_only_on_enter() {
        let token = ScriptToken::new(TokenKind::StringBacktick, 1);
        assert_eq!(token.enters(), None);
        let opened = token.with_transition(Transition::Enter(ScriptMode::Template));
        assert_eq!(opened.enters(), Some(ScriptMode::Template));
        assert_eq!(token.with_transition(Transition::Leave).enters(), None);
    }
}
