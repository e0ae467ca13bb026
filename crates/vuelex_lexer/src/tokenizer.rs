//! The stack-driven tokenizer.
//!
//! Each step tries the rules of the state on top of the stack at the current
//! offset. The first rule that applies emits its tokens, advances the offset
//! and adjusts the stack. When nothing applies, one character is emitted as
//! an `Error` token, so every input is consumed and the lexemes always
//! concatenate back to the input.

use crate::grammar::{Grammar, StateId};
use crate::rules::{Emit, Rule, StackAction};
use regex::Captures;
use std::collections::VecDeque;
use std::iter::FusedIterator;
use tracing::trace;
use vuelex_core::{TextPos, Token, TokenKind};
use vuelex_script::{ScriptScanner, Transition};

/// Lazy token stream over one input.
///
/// Created by [`VueLexer::tokenize`](crate::VueLexer::tokenize). The stack and
/// offset belong to this iterator alone; the grammar is shared.
#[derive(Debug)]
pub struct Tokens<'g, 'src> {
    grammar: &'g Grammar,
    scanner: ScriptScanner,
    text: &'src str,
    pos: TextPos,
    stack: Vec<StateId>,
    /// Tokens of the last step not yet handed out.
    pending: VecDeque<Token<'src>>,
}

impl<'g, 'src> Tokens<'g, 'src> {
    pub fn new(grammar: &'g Grammar, text: &'src str) -> Self {
        Self {
            grammar,
            scanner: ScriptScanner::new(),
            text,
            pos: 0,
            stack: vec![StateId::ROOT],
            pending: VecDeque::new(),
        }
    }

    /// The active state.
    pub fn state(&self) -> StateId {
        self.stack.last().copied().unwrap_or(StateId::ROOT)
    }

    /// Number of frames on the stack, at least one.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Offset of the first byte not yet tokenized.
    pub fn offset(&self) -> TextPos {
        self.pos
    }

    /// Run rules until at least one token is pending.
    ///
    /// Zero-width rules only pop, so the loop ends after at most `depth`
    /// iterations without consuming input.
    fn step(&mut self) {
        while self.pending.is_empty() && self.pos < self.text.len() {
            if !self.apply_rules() {
                self.fallback();
            }
        }
    }

    /// Apply the first rule of the active state that matches. Returns false
    /// when none does.
    fn apply_rules(&mut self) -> bool {
        let grammar = self.grammar;
        let text = self.text;
        let start = self.pos;
        let rest = &text[start..];

        for rule in grammar.rules(self.state()) {
            match rule {
                Rule::Match {
                    pattern,
                    emit,
                    action,
                } => {
                    let end = match emit {
                        Emit::Token(kind) => match pattern.find(rest) {
                            Some(m) if !m.is_empty() => {
                                self.push_token(*kind, start, start + m.end());
                                start + m.end()
                            }
                            _ => continue,
                        },
                        Emit::Groups(kinds) => match pattern.captures(rest) {
                            Some(caps) if !caps[0].is_empty() => {
                                self.emit_groups(&caps, kinds, start)
                            }
                            _ => continue,
                        },
                    };
                    self.pos = end;
                    self.apply(*action);
                    return true;
                }
                Rule::Delegate(mode) => {
                    let Some(token) = self.scanner.scan(*mode, text, start) else {
                        continue;
                    };
                    self.pos = start + token.len;
                    self.push_token(token.kind, start, self.pos);
                    if let Some(mode) = token.enters() {
                        self.apply(StackAction::Push(StateId::for_script(mode)));
                    } else if token.transition == Transition::Leave {
                        self.apply(StackAction::Pop);
                    }
                    return true;
                }
                Rule::Default(action) => {
                    if self.apply(*action) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Emit one token per capture group and return the end of the match.
    /// Text between groups is emitted as `Text`.
    fn emit_groups(
        &mut self,
        caps: &Captures<'src>,
        kinds: &[TokenKind],
        base: TextPos,
    ) -> TextPos {
        let mut cursor = base;
        for (index, kind) in kinds.iter().enumerate() {
            let Some(group) = caps.get(index + 1) else {
                continue;
            };
            let (start, end) = (base + group.start(), base + group.end());
            if start < cursor {
                continue;
            }
            self.push_token(TokenKind::Text, cursor, start);
            self.push_token(*kind, start, end);
            cursor = end;
        }
        let end = base + caps[0].len();
        self.push_token(TokenKind::Text, cursor, end);
        end
    }

    /// Consume one character that no rule accepts.
    fn fallback(&mut self) {
        let start = self.pos;
        let len = self.text[start..].chars().next().map_or(1, char::len_utf8);
        self.pos += len;
        trace!(state = %self.state(), offset = start, "no rule matched");
        self.push_token(TokenKind::Error, start, self.pos);
    }

    /// Queue the token for `start..end`. Empty ranges emit nothing.
    fn push_token(&mut self, kind: TokenKind, start: TextPos, end: TextPos) {
        if start < end {
            self.pending.push_back(Token::new(kind, &self.text[start..end], start));
        }
    }

    /// Apply a stack action. Returns false when it changes nothing, which is
    /// only the case for a pop of the bottom frame.
    fn apply(&mut self, action: StackAction) -> bool {
        match action {
            StackAction::Stay => {}
            StackAction::Push(state) => {
                trace!(%state, depth = self.stack.len(), "push");
                self.stack.push(state);
            }
            StackAction::Pop => {
                if self.stack.len() <= 1 {
                    return false;
                }
                if let Some(state) = self.stack.pop() {
                    trace!(%state, depth = self.stack.len(), "pop");
                }
            }
            StackAction::PopPush(state) => {
                if self.stack.len() > 1 {
                    self.stack.pop();
                }
                trace!(%state, depth = self.stack.len(), "replace");
                self.stack.push(state);
            }
        }
        true
    }
}

impl<'g, 'src> Iterator for Tokens<'g, 'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Token<'src>> {
        if self.pending.is_empty() {
            self.step();
        }
        self.pending.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.text.len() - self.pos;
        // Tokens are never empty.
        (
            self.pending.len() + usize::from(remaining > 0),
            Some(self.pending.len() + remaining),
        )
    }
}

impl FusedIterator for Tokens<'_, '_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::LexerOptions;

    fn tokens(text: &str) -> Tokens<'static, '_> {
        Tokens::new(Grammar::shared(&LexerOptions::default()), text)
    }

    #[test]
    fn test_starts_at_root() {
        let tokens = tokens("<p>");
        assert_eq!(tokens.state(), StateId::Markup);
        assert_eq!(tokens.depth(), 1);
        assert_eq!(tokens.offset(), 0);
    }

    #[test]
    fn test_tag_pushes_and_pops() {
        let mut iter = tokens("<p class>x");
        iter.next();
        assert_eq!(iter.state(), StateId::Tag);
        let rest: Vec<_> = iter.by_ref().take(4).collect();
        assert_eq!(rest[3].text, ">");
        assert_eq!(iter.state(), StateId::Markup);
    }

    #[test]
    fn test_groups_skip_empty_captures() {
        let kinds: Vec<_> = tokens("<br>").map(|t| (t.kind, t.text)).collect();
        assert_eq!(
            kinds,
            vec![
                (TokenKind::Punctuation, "<"),
                (TokenKind::NameTag, "br"),
                (TokenKind::Punctuation, ">"),
            ]
        );
    }

    #[test]
    fn test_unmatched_character_is_error() {
        let all: Vec<_> = tokens("<a \"b>").map(|t| (t.kind, t.text)).collect();
        assert!(all.contains(&(TokenKind::Error, "\"")));
    }

    #[test]
    fn test_fallback_consumes_whole_char() {
        let all: Vec<_> = tokens("<a ¿>").collect();
        let err = all.iter().find(|t| t.kind == TokenKind::Error).unwrap();
        assert_eq!(err.text, "¿");
        assert_eq!(err.len(), 2);
    }

    #[test]
    fn test_bottom_frame_survives_stray_closers() {
        let mut iter = tokens("}}}) ]");
        while iter.next().is_some() {
            assert_eq!(iter.depth(), 1);
        }
    }

    #[test]
    fn test_fused_after_end() {
        let mut iter = tokens("a");
        assert!(iter.next().is_some());
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }
}
