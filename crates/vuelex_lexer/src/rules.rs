//! Rules of the tokenizer's state tables.
//!
//! A state is an ordered list of rules. The driver tries them in order at the
//! current offset and the first one that applies wins, so the order within a
//! state is part of the grammar.

use crate::grammar::StateId;
use regex::Regex;
use vuelex_core::TokenKind;
use vuelex_script::ScriptMode;

/// What happens to the state stack after a rule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackAction {
    Stay,
    Push(StateId),
    /// Pop the top state. The bottom state is never popped.
    Pop,
    /// Replace the top state.
    PopPush(StateId),
}

/// How a matched pattern turns into tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emit {
    /// One token for the whole match.
    Token(TokenKind),
    /// One token per capture group, in group order. Empty groups emit nothing.
    Groups(&'static [TokenKind]),
}

#[derive(Debug, Clone)]
pub enum Rule {
    /// A pattern anchored at the current offset.
    Match {
        pattern: Regex,
        emit: Emit,
        action: StackAction,
    },
    /// Scan one token with the script scanner. Its mode transition becomes
    /// a push or pop of the matching script state.
    Delegate(ScriptMode),
    /// Applies without consuming input. Only used with `Pop`, so every
    /// zero-width step shrinks the stack.
    Default(StackAction),
}

impl Rule {
    /// Compile `pattern` so it only matches at the start of the haystack.
    pub fn compile(pattern: &str) -> Result<Regex, regex::Error> {
        Regex::new(&format!("^(?:{pattern})"))
    }

    /// The stack action of a pattern or default rule.
    pub fn action(&self) -> Option<StackAction> {
        match self {
            Rule::Match { action, .. } | Rule::Default(action) => Some(*action),
            Rule::Delegate(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compiled_patterns_are_anchored() {
        let regex = Rule::compile(r"[\w-]+").unwrap();
        assert_eq!(regex.find("v-if=").map(|m| m.as_str()), Some("v-if"));
        assert!(regex.find(" v-if").is_none());
    }

    #[test]
    fn test_alternation_stays_anchored() {
        let regex = Rule::compile("a|b").unwrap();
        assert!(regex.find("xb").is_none());
        assert!(regex.is_match("b"));
    }
}
