//! Token kinds and the token record produced by the tokenizer.
//!
//! Kinds form a closed hierarchy (`Name.Tag` is a `Name`, `Literal.String.Double`
//! is a `Literal.String`). The dotted names are an output contract: highlighting
//! hosts key their color themes on them.

use crate::text::{TextPos, TextSpan};
use std::fmt;

/// The classification of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TokenKind {
    // Neutral text
    Text,
    Whitespace,
    Error,

    // Punctuation and operators
    Punctuation,
    Operator,
    OperatorWord,

    // Keywords
    Keyword,
    KeywordDeclaration,
    KeywordReserved,
    KeywordConstant,

    // Names
    Name,
    NameTag,
    NameAttribute,
    NameVariable,
    NameFunction,
    NameBuiltin,
    NameException,
    NameOther,

    // Literals
    Literal,
    String,
    StringDouble,
    StringSingle,
    StringBacktick,
    StringInterpol,
    StringRegex,
    StringEscape,
    Number,
    NumberInteger,
    NumberFloat,
    NumberHex,
    NumberOct,
    NumberBin,

    // Comments
    Comment,
    CommentSingle,
    CommentMultiline,
    CommentHashbang,
}

impl TokenKind {
    /// Every kind, in declaration order.
    pub const ALL: [TokenKind; 36] = [
        TokenKind::Text,
        TokenKind::Whitespace,
        TokenKind::Error,
        TokenKind::Punctuation,
        TokenKind::Operator,
        TokenKind::OperatorWord,
        TokenKind::Keyword,
        TokenKind::KeywordDeclaration,
        TokenKind::KeywordReserved,
        TokenKind::KeywordConstant,
        TokenKind::Name,
        TokenKind::NameTag,
        TokenKind::NameAttribute,
        TokenKind::NameVariable,
        TokenKind::NameFunction,
        TokenKind::NameBuiltin,
        TokenKind::NameException,
        TokenKind::NameOther,
        TokenKind::Literal,
        TokenKind::String,
        TokenKind::StringDouble,
        TokenKind::StringSingle,
        TokenKind::StringBacktick,
        TokenKind::StringInterpol,
        TokenKind::StringRegex,
        TokenKind::StringEscape,
        TokenKind::Number,
        TokenKind::NumberInteger,
        TokenKind::NumberFloat,
        TokenKind::NumberHex,
        TokenKind::NumberOct,
        TokenKind::NumberBin,
        TokenKind::Comment,
        TokenKind::CommentSingle,
        TokenKind::CommentMultiline,
        TokenKind::CommentHashbang,
    ];

    /// The immediate parent of this kind, or `None` for a root kind.
    pub fn parent(self) -> Option<TokenKind> {
        use TokenKind::*;
        match self {
            Text | Error | Punctuation | Operator | Keyword | Name | Literal | Comment => None,
            Whitespace => Some(Text),
            OperatorWord => Some(Operator),
            KeywordDeclaration | KeywordReserved | KeywordConstant => Some(Keyword),
            NameTag | NameAttribute | NameVariable | NameFunction | NameBuiltin
            | NameException | NameOther => Some(Name),
            String | Number => Some(Literal),
            StringDouble | StringSingle | StringBacktick | StringInterpol | StringRegex
            | StringEscape => Some(String),
            NumberInteger | NumberFloat | NumberHex | NumberOct | NumberBin => Some(Number),
            CommentSingle | CommentMultiline | CommentHashbang => Some(Comment),
        }
    }

    /// Whether this kind is `ancestor` or one of its descendants.
    pub fn is_a(self, ancestor: TokenKind) -> bool {
        let mut kind = Some(self);
        while let Some(k) = kind {
            if k == ancestor {
                return true;
            }
            kind = k.parent();
        }
        false
    }

    /// The dotted hierarchical name of this kind, e.g. `Name.Tag`.
    pub fn name(self) -> &'static str {
        use TokenKind::*;
        match self {
            Text => "Text",
            Whitespace => "Text.Whitespace",
            Error => "Error",
            Punctuation => "Punctuation",
            Operator => "Operator",
            OperatorWord => "Operator.Word",
            Keyword => "Keyword",
            KeywordDeclaration => "Keyword.Declaration",
            KeywordReserved => "Keyword.Reserved",
            KeywordConstant => "Keyword.Constant",
            Name => "Name",
            NameTag => "Name.Tag",
            NameAttribute => "Name.Attribute",
            NameVariable => "Name.Variable",
            NameFunction => "Name.Function",
            NameBuiltin => "Name.Builtin",
            NameException => "Name.Exception",
            NameOther => "Name.Other",
            Literal => "Literal",
            String => "Literal.String",
            StringDouble => "Literal.String.Double",
            StringSingle => "Literal.String.Single",
            StringBacktick => "Literal.String.Backtick",
            StringInterpol => "Literal.String.Interpol",
            StringRegex => "Literal.String.Regex",
            StringEscape => "Literal.String.Escape",
            Number => "Literal.Number",
            NumberInteger => "Literal.Number.Integer",
            NumberFloat => "Literal.Number.Float",
            NumberHex => "Literal.Number.Hex",
            NumberOct => "Literal.Number.Oct",
            NumberBin => "Literal.Number.Bin",
            Comment => "Comment",
            CommentSingle => "Comment.Single",
            CommentMultiline => "Comment.Multiline",
            CommentHashbang => "Comment.Hashbang",
        }
    }

    /// Look a kind up by its dotted name.
    pub fn from_name(name: &str) -> Option<TokenKind> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// Whether this kind is neutral text (plain text or whitespace).
    #[inline]
    pub fn is_text(self) -> bool {
        self.is_a(TokenKind::Text)
    }

    /// Whether this kind is a string literal variant.
    #[inline]
    pub fn is_string(self) -> bool {
        self.is_a(TokenKind::String)
    }

    /// Whether this kind is a comment variant.
    #[inline]
    pub fn is_comment(self) -> bool {
        self.is_a(TokenKind::Comment)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A classified slice of the input.
///
/// The lexeme is borrowed from the tokenized text, so concatenating the
/// `text` of every token of a run reproduces the input exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'src> {
    /// The kind of token.
    pub kind: TokenKind,
    /// The exact matched text.
    pub text: &'src str,
    /// Start position in the source text.
    pub pos: TextPos,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, text: &'src str, pos: TextPos) -> Self {
        Self { kind, text, pos }
    }

    /// End position in the source text (exclusive).
    #[inline]
    pub fn end(&self) -> TextPos {
        self.pos + self.text.len()
    }

    /// The length of this token in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether this token has zero length.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The source span covered by this token.
    #[inline]
    pub fn span(&self) -> TextSpan {
        TextSpan::new(self.pos, self.text.len())
    }

    /// Whether the lexeme consists only of whitespace.
    pub fn is_blank(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hierarchy() {
        assert!(TokenKind::NameTag.is_a(TokenKind::Name));
        assert!(TokenKind::StringDouble.is_a(TokenKind::String));
        assert!(TokenKind::StringDouble.is_a(TokenKind::Literal));
        assert!(TokenKind::Whitespace.is_text());
        assert!(!TokenKind::NameTag.is_a(TokenKind::NameAttribute));
        assert!(!TokenKind::Punctuation.is_a(TokenKind::Operator));
        assert_eq!(TokenKind::Literal.parent(), None);
    }

    #[test]
    fn test_names_round_trip() {
        for kind in TokenKind::ALL {
            assert_eq!(TokenKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(TokenKind::NameAttribute.to_string(), "Name.Attribute");
        assert_eq!(TokenKind::from_name("Name.Nope"), None);
    }

    #[test]
    fn test_token_span() {
        let source = "<div>";
        let token = Token::new(TokenKind::NameTag, &source[1..4], 1);
        assert_eq!(token.span(), TextSpan::new(1, 3));
        assert_eq!(token.end(), 4);
        assert!(!token.is_blank());
        assert!(Token::new(TokenKind::Whitespace, " \n", 0).is_blank());
    }
}
