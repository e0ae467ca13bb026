//! The script scanner.
//!
//! Converts JavaScript source into classified tokens one at a time. The
//! scanner itself holds no state: the caller keeps the mode stack and feeds
//! the mode of its innermost frame to every `scan` call, which is what lets
//! the template tokenizer interleave its own rules with script tokens.

use crate::char_codes::*;
use crate::token::{ScriptMode, ScriptToken, Transition};
use memchr::{memchr2, memchr3, memmem};
use vuelex_core::{Token, TokenKind};

/// Scans JavaScript tokens out of arbitrary text.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptScanner;

impl ScriptScanner {
    /// Create a new scanner.
    pub const fn new() -> Self {
        Self
    }

    /// Scan a single token starting at byte offset `pos` of `text`.
    ///
    /// Returns `None` at the end of the text, when `pos` is not on a char
    /// boundary, or when nothing in `mode` matches at `pos`. A returned
    /// token is never empty.
    pub fn scan(&self, mode: ScriptMode, text: &str, pos: usize) -> Option<ScriptToken> {
        if pos >= text.len() || !text.is_char_boundary(pos) {
            return None;
        }
        let mut cursor = Cursor::new(text, pos);
        let token = match mode {
            ScriptMode::Code => cursor.scan_code(),
            ScriptMode::RegexAllowed => cursor.scan_regex_allowed(),
            ScriptMode::Template => cursor.scan_template(),
            ScriptMode::TemplateHole => cursor.scan_template_hole(),
        }?;
        debug_assert!(token.len > 0, "scanner produced an empty token");
        Some(token)
    }

    /// Tokenize a whole script, following mode transitions with a stack.
    ///
    /// Characters no mode accepts become one-character `Error` tokens, so the
    /// concatenated lexemes always reproduce `text`.
    pub fn tokens<'src>(&self, text: &'src str) -> ScriptTokens<'src> {
        ScriptTokens {
            scanner: *self,
            text,
            pos: 0,
            modes: vec![ScriptMode::Code],
        }
    }
}

/// Iterator over the tokens of a standalone script.
pub struct ScriptTokens<'src> {
    scanner: ScriptScanner,
    text: &'src str,
    pos: usize,
    modes: Vec<ScriptMode>,
}

impl<'src> ScriptTokens<'src> {
    fn mode(&self) -> ScriptMode {
        self.modes.last().copied().unwrap_or(ScriptMode::Code)
    }
}

impl<'src> Iterator for ScriptTokens<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Token<'src>> {
        loop {
            if self.pos >= self.text.len() {
                return None;
            }
            let start = self.pos;
            match self.scanner.scan(self.mode(), self.text, start) {
                Some(token) => {
                    self.pos += token.len;
                    match token.transition {
                        Transition::Stay => {}
                        Transition::Enter(mode) => self.modes.push(mode),
                        Transition::Leave => {
                            if self.modes.len() > 1 {
                                self.modes.pop();
                            }
                        }
                    }
                    return Some(Token::new(token.kind, &self.text[start..self.pos], start));
                }
                // Regex position without a regex: read the operand as code.
                None if self.mode() == ScriptMode::RegexAllowed => {
                    self.modes.pop();
                }
                None => {
                    let len = self.text[start..].chars().next().map_or(1, char::len_utf8);
                    self.pos += len;
                    return Some(Token::new(TokenKind::Error, &self.text[start..self.pos], start));
                }
            }
        }
    }
}

/// Scanning position within one `scan` call.
struct Cursor<'a> {
    /// The full source text.
    text: &'a str,
    /// Start of the token being scanned.
    start: usize,
    /// Current position.
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str, pos: usize) -> Self {
        Self {
            text,
            start: pos,
            pos,
        }
    }

    // ========================================================================
    // Character access
    // ========================================================================

    /// Look at the character at the current position without advancing.
    #[inline]
    fn current_char(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    /// Look at the byte at position pos + offset.
    #[inline]
    fn byte_at(&self, offset: usize) -> Option<u8> {
        self.text.as_bytes().get(self.pos + offset).copied()
    }

    /// Advance past the current character.
    #[inline]
    fn bump(&mut self) {
        if let Some(ch) = self.current_char() {
            self.pos += ch.len_utf8();
        }
    }

    /// Advance while `pred` holds for the current character.
    #[inline]
    fn bump_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(ch) = self.current_char() {
            if !pred(ch) {
                break;
            }
            self.pos += ch.len_utf8();
        }
    }

    /// Whether the character `offset` bytes ahead satisfies `pred`.
    #[inline]
    fn peek_is(&self, offset: usize, pred: impl Fn(char) -> bool) -> bool {
        self.text
            .get(self.pos + offset..)
            .and_then(|rest| rest.chars().next())
            .map_or(false, pred)
    }

    /// Finish the token scanned so far.
    #[inline]
    fn finish(&self, kind: TokenKind) -> ScriptToken {
        ScriptToken::new(kind, self.pos - self.start)
    }

    // ========================================================================
    // Modes
    // ========================================================================

    fn scan_code(&mut self) -> Option<ScriptToken> {
        let ch = self.current_char()?;
        let token = match ch {
            c if is_white_space(c) => self.scan_white_space(),
            '#' if self.pos == 0 && self.byte_at(1) == Some(b'!') => self.scan_hashbang(),
            '/' if matches!(self.byte_at(1), Some(b'/') | Some(b'*')) => self.scan_comment(),

            '{' | '(' | '[' | ';' | ',' => {
                self.pos += 1;
                self.finish(TokenKind::Punctuation)
                    .with_transition(Transition::Enter(ScriptMode::RegexAllowed))
            }
            '}' | ')' | ']' | '@' | '#' => {
                self.pos += 1;
                self.finish(TokenKind::Punctuation)
            }
            '=' if self.byte_at(1) == Some(b'>') => {
                self.pos += 2;
                self.finish(TokenKind::Punctuation)
            }
            '.' => self.scan_dot(),

            '\'' | '"' => self.scan_string_literal(ch)?,
            '`' => {
                self.pos += 1;
                self.finish(TokenKind::StringBacktick)
                    .with_transition(Transition::Enter(ScriptMode::Template))
            }

            '0'..='9' => self.scan_number(),
            c if is_identifier_start(c) => self.scan_identifier(),

            '=' | '!' | '+' | '-' | '*' | '/' | '%' | '&' | '|' | '^' | '<' | '>' | '?' | '~'
            | ':' => {
                self.scan_operator(ch);
                self.finish(TokenKind::Operator)
                    .with_transition(Transition::Enter(ScriptMode::RegexAllowed))
            }

            _ => return None,
        };
        Some(token)
    }

    fn scan_regex_allowed(&mut self) -> Option<ScriptToken> {
        match self.current_char()? {
            c if is_white_space(c) => Some(self.scan_white_space()),
            '/' if matches!(self.byte_at(1), Some(b'/') | Some(b'*')) => Some(self.scan_comment()),
            '/' => self.scan_regex_literal(),
            _ => None,
        }
    }

    fn scan_template(&mut self) -> Option<ScriptToken> {
        let token = match self.current_char()? {
            '`' => {
                self.pos += 1;
                self.finish(TokenKind::StringBacktick)
                    .with_transition(Transition::Leave)
            }
            '\\' => {
                self.pos += 1;
                self.current_char()?;
                self.bump();
                self.finish(TokenKind::StringEscape)
            }
            '$' if self.byte_at(1) == Some(b'{') => {
                self.pos += 2;
                self.finish(TokenKind::StringInterpol)
                    .with_transition(Transition::Enter(ScriptMode::TemplateHole))
            }
            '$' => {
                self.pos += 1;
                self.finish(TokenKind::StringBacktick)
            }
            _ => {
                let rest = &self.text.as_bytes()[self.pos..];
                self.pos += memchr3(b'`', b'\\', b'$', rest).unwrap_or(rest.len());
                self.finish(TokenKind::StringBacktick)
            }
        };
        Some(token)
    }

    fn scan_template_hole(&mut self) -> Option<ScriptToken> {
        if self.current_char()? == '}' {
            self.pos += 1;
            return Some(
                self.finish(TokenKind::StringInterpol)
                    .with_transition(Transition::Leave),
            );
        }
        self.scan_code()
    }

    // ========================================================================
    // Trivia
    // ========================================================================

    fn scan_white_space(&mut self) -> ScriptToken {
        self.bump_while(is_white_space);
        self.finish(TokenKind::Whitespace)
    }

    /// Skip a shebang line at the very beginning of the file (e.g., `#!/usr/bin/env node`).
    fn scan_hashbang(&mut self) -> ScriptToken {
        self.pos = self.line_end();
        self.finish(TokenKind::CommentHashbang)
    }

    fn scan_comment(&mut self) -> ScriptToken {
        if self.byte_at(1) == Some(b'/') {
            self.pos = self.line_end();
            return self.finish(TokenKind::CommentSingle);
        }
        // Multi-line comment; unterminated runs to the end of the text
        let body = &self.text.as_bytes()[self.pos + 2..];
        self.pos = match memmem::find(body, b"*/") {
            Some(offset) => self.pos + 2 + offset + 2,
            None => self.text.len(),
        };
        self.finish(TokenKind::CommentMultiline)
    }

    /// Position of the next `\n` or `\r`, or the end of the text.
    fn line_end(&self) -> usize {
        let rest = &self.text.as_bytes()[self.pos..];
        self.pos + memchr2(b'\n', b'\r', rest).unwrap_or(rest.len())
    }

    // ========================================================================
    // Token-specific scanning methods
    // ========================================================================

    fn scan_dot(&mut self) -> ScriptToken {
        if self.byte_at(1) == Some(b'.') && self.byte_at(2) == Some(b'.') {
            self.pos += 3;
            self.finish(TokenKind::Punctuation)
        } else if self.peek_is(1, is_digit) {
            self.pos += 1;
            self.scan_digits();
            self.scan_exponent();
            self.finish(TokenKind::NumberFloat)
        } else {
            self.pos += 1;
            self.finish(TokenKind::Punctuation)
        }
    }

    /// Advance past one operator starting with `ch`, longest form first.
    fn scan_operator(&mut self, ch: char) {
        let next = self.byte_at(1);
        let after = self.byte_at(2);
        let len = match ch {
            // = == === and ! != !==
            '=' | '!' => match (next, after) {
                (Some(b'='), Some(b'=')) => 3,
                (Some(b'='), _) => 2,
                _ => 1,
            },
            // ++ += / -- -=
            '+' | '-' => match next {
                Some(n) if n == ch as u8 || n == b'=' => 2,
                _ => 1,
            },
            // * ** *= **= / & && &= &&= / | || |= ||=
            '*' | '&' | '|' => match (next, after) {
                (Some(n), Some(b'=')) if n == ch as u8 => 3,
                (Some(n), _) if n == ch as u8 || n == b'=' => 2,
                _ => 1,
            },
            '/' | '%' | '^' => match next {
                Some(b'=') => 2,
                _ => 1,
            },
            '<' => match (next, after) {
                (Some(b'<'), Some(b'=')) => 3,
                (Some(b'<'), _) | (Some(b'='), _) => 2,
                _ => 1,
            },
            '>' => self.greater_than_len(),
            '?' => match (next, after) {
                (Some(b'?'), Some(b'=')) => 3,
                (Some(b'?'), _) => 2,
                (Some(b'.'), _) if !self.peek_is(2, is_digit) => 2,
                _ => 1,
            },
            _ => 1,
        };
        self.pos += len;
    }

    /// Length of `>`, `>=`, `>>`, `>>=`, `>>>` or `>>>=` at the current position.
    fn greater_than_len(&self) -> usize {
        match (self.byte_at(1), self.byte_at(2), self.byte_at(3)) {
            (Some(b'>'), Some(b'>'), Some(b'=')) => 4,
            (Some(b'>'), Some(b'>'), _) => 3,
            (Some(b'>'), Some(b'='), _) => 3,
            (Some(b'>'), _, _) | (Some(b'='), _, _) => 2,
            _ => 1,
        }
    }

    fn scan_string_literal(&mut self, quote: char) -> Option<ScriptToken> {
        self.pos += 1; // skip opening quote
        loop {
            // Unterminated strings are not tokens; the caller falls back.
            let ch = self.current_char()?;
            if ch == quote {
                self.pos += 1;
                break;
            }
            if ch == '\\' {
                self.pos += 1;
                let escaped = self.current_char()?;
                self.pos += escaped.len_utf8();
                if escaped == CARRIAGE_RETURN && self.byte_at(0) == Some(b'\n') {
                    self.pos += 1;
                }
                continue;
            }
            if is_line_break(ch) {
                return None;
            }
            self.pos += ch.len_utf8();
        }
        let kind = if quote == '"' {
            TokenKind::StringDouble
        } else {
            TokenKind::StringSingle
        };
        Some(self.finish(kind))
    }

    fn scan_regex_literal(&mut self) -> Option<ScriptToken> {
        self.pos += 1; // after the /
        let body_start = self.pos;
        let mut in_character_class = false;

        loop {
            let ch = self.current_char()?;
            if is_line_break(ch) {
                return None;
            }
            match ch {
                '\\' => {
                    self.pos += 1;
                    let escaped = self.current_char()?;
                    if is_line_break(escaped) {
                        return None;
                    }
                    self.pos += escaped.len_utf8();
                }
                '[' => {
                    in_character_class = true;
                    self.pos += 1;
                }
                ']' => {
                    in_character_class = false;
                    self.pos += 1;
                }
                '/' if !in_character_class => {
                    if self.pos == body_start {
                        return None;
                    }
                    self.pos += 1;
                    break;
                }
                _ => self.pos += ch.len_utf8(),
            }
        }

        // Flags
        self.bump_while(is_identifier_part);
        Some(
            self.finish(TokenKind::StringRegex)
                .with_transition(Transition::Leave),
        )
    }

    fn scan_number(&mut self) -> ScriptToken {
        if self.byte_at(0) == Some(b'0') {
            match self.byte_at(1) {
                Some(b'x') | Some(b'X') if self.peek_is(2, is_hex_digit) => {
                    return self.scan_radix_number(is_hex_digit, TokenKind::NumberHex);
                }
                Some(b'b') | Some(b'B') if self.peek_is(2, is_binary_digit) => {
                    return self.scan_radix_number(is_binary_digit, TokenKind::NumberBin);
                }
                Some(b'o') | Some(b'O') if self.peek_is(2, is_octal_digit) => {
                    return self.scan_radix_number(is_octal_digit, TokenKind::NumberOct);
                }
                Some(b'0'..=b'7') => {
                    // Legacy octal such as 0755, unless a later digit is 8 or 9
                    let digits = &self.text[self.pos + 1..];
                    let run = digits
                        .bytes()
                        .take_while(|b| b.is_ascii_digit() || *b == b'_')
                        .count();
                    if digits[..run].bytes().all(|b| b != b'8' && b != b'9') {
                        self.pos += 1 + run;
                        return self.finish(TokenKind::NumberOct);
                    }
                }
                _ => {}
            }
        }

        // Decimal number
        let mut is_float = false;
        self.scan_digits();

        if self.byte_at(0) == Some(b'.') && !self.peek_is(1, is_identifier_start) {
            self.pos += 1;
            self.scan_digits();
            is_float = true;
        }
        is_float |= self.scan_exponent();

        // BigInt suffix
        if !is_float && self.byte_at(0) == Some(b'n') {
            self.pos += 1;
        }

        if is_float {
            self.finish(TokenKind::NumberFloat)
        } else {
            self.finish(TokenKind::NumberInteger)
        }
    }

    fn scan_radix_number(&mut self, is_radix_digit: fn(char) -> bool, kind: TokenKind) -> ScriptToken {
        self.pos += 2; // skip 0x / 0b / 0o
        self.bump_while(|ch| ch == '_' || is_radix_digit(ch));
        if self.byte_at(0) == Some(b'n') {
            self.pos += 1;
        }
        self.finish(kind)
    }

    fn scan_digits(&mut self) {
        self.bump_while(|ch| ch == '_' || is_digit(ch));
    }

    /// Scan an exponent part, if one follows. Returns whether one was found.
    fn scan_exponent(&mut self) -> bool {
        if !matches!(self.byte_at(0), Some(b'e') | Some(b'E')) {
            return false;
        }
        let sign = usize::from(matches!(self.byte_at(1), Some(b'+') | Some(b'-')));
        if !self.peek_is(1 + sign, is_digit) {
            return false;
        }
        self.pos += 1 + sign;
        self.scan_digits();
        true
    }

    fn scan_identifier(&mut self) -> ScriptToken {
        self.bump();
        self.bump_while(is_identifier_part);
        let word = &self.text[self.start..self.pos];
        let (kind, transition) = classify_word(word);
        self.finish(kind).with_transition(transition)
    }
}

/// Classify an identifier-shaped word: keyword, builtin or plain name.
///
/// Words after which an operand is expected enter `RegexAllowed`.
fn classify_word(word: &str) -> (TokenKind, Transition) {
    let operand_follows = Transition::Enter(ScriptMode::RegexAllowed);
    match word {
        "typeof" | "instanceof" | "in" | "void" | "delete" | "new" => {
            (TokenKind::OperatorWord, operand_follows)
        }
        "for" | "while" | "do" | "break" | "return" | "continue" | "switch" | "case"
        | "default" | "if" | "else" | "throw" | "try" | "catch" | "finally" | "yield"
        | "await" | "async" | "this" | "of" | "static" | "export" | "import" | "debugger"
        | "extends" | "super" => (TokenKind::Keyword, operand_follows),
        "var" | "let" | "const" | "with" | "function" | "class" => {
            (TokenKind::KeywordDeclaration, operand_follows)
        }
        "abstract" | "boolean" | "byte" | "char" | "double" | "enum" | "final" | "float"
        | "goto" | "implements" | "int" | "interface" | "long" | "native" | "package"
        | "private" | "protected" | "public" | "short" | "synchronized" | "throws"
        | "transient" | "volatile" => (TokenKind::KeywordReserved, Transition::Stay),
        "true" | "false" | "null" | "NaN" | "Infinity" | "undefined" => {
            (TokenKind::KeywordConstant, Transition::Stay)
        }
        _ if is_builtin(word) => (TokenKind::NameBuiltin, Transition::Stay),
        _ if is_exception(word) => (TokenKind::NameException, Transition::Stay),
        _ => (TokenKind::NameOther, Transition::Stay),
    }
}

fn is_builtin(word: &str) -> bool {
    matches!(
        word,
        "Array"
            | "Boolean"
            | "Date"
            | "BigInt"
            | "Function"
            | "Math"
            | "ArrayBuffer"
            | "Number"
            | "Object"
            | "RegExp"
            | "String"
            | "Promise"
            | "Proxy"
            | "decodeURI"
            | "decodeURIComponent"
            | "encodeURI"
            | "encodeURIComponent"
            | "eval"
            | "isFinite"
            | "isNaN"
            | "parseFloat"
            | "parseInt"
            | "DataView"
            | "document"
            | "window"
            | "globalThis"
            | "global"
            | "Symbol"
            | "Intl"
            | "WeakSet"
            | "WeakMap"
            | "Set"
            | "Map"
            | "Reflect"
            | "JSON"
            | "Atomics"
            | "Int8Array"
            | "Int16Array"
            | "Int32Array"
            | "BigInt64Array"
            | "Float32Array"
            | "Float64Array"
            | "Uint8ClampedArray"
            | "Uint8Array"
            | "Uint16Array"
            | "Uint32Array"
            | "BigUint64Array"
    )
}

fn is_exception(word: &str) -> bool {
    matches!(
        word,
        "Error"
            | "EvalError"
            | "InternalError"
            | "RangeError"
            | "ReferenceError"
            | "SyntaxError"
            | "TypeError"
            | "URIError"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scan_one(mode: ScriptMode, text: &str) -> Option<(TokenKind, &str, Transition)> {
        ScriptScanner::new()
            .scan(mode, text, 0)
            .map(|t| (t.kind, &text[..t.len], t.transition))
    }

    #[test]
    fn test_scan_simple_punctuation() {
        let enter = Transition::Enter(ScriptMode::RegexAllowed);
        assert_eq!(scan_one(ScriptMode::Code, "(x"), Some((TokenKind::Punctuation, "(", enter)));
        assert_eq!(scan_one(ScriptMode::Code, "{"), Some((TokenKind::Punctuation, "{", enter)));
        assert_eq!(
            scan_one(ScriptMode::Code, "}"),
            Some((TokenKind::Punctuation, "}", Transition::Stay))
        );
        assert_eq!(
            scan_one(ScriptMode::Code, "=> x"),
            Some((TokenKind::Punctuation, "=>", Transition::Stay))
        );
    }

    #[test]
    fn test_scan_longest_operator() {
        for op in ["===", "!==", "**=", "&&=", "||=", "??=", ">>>=", "<<=", "++", "?.", ":"] {
            let (kind, text, _) = scan_one(ScriptMode::Code, op).unwrap();
            assert_eq!(kind, TokenKind::Operator);
            assert_eq!(text, op);
        }
        assert_eq!(scan_one(ScriptMode::Code, "?.5").unwrap().1, "?");
    }

    #[test]
    fn test_scan_identifier_and_keyword() {
        assert_eq!(scan_one(ScriptMode::Code, "book ").unwrap().0, TokenKind::NameOther);
        assert_eq!(scan_one(ScriptMode::Code, "return").unwrap().0, TokenKind::Keyword);
        assert_eq!(scan_one(ScriptMode::Code, "const").unwrap().0, TokenKind::KeywordDeclaration);
        assert_eq!(scan_one(ScriptMode::Code, "in").unwrap().0, TokenKind::OperatorWord);
        assert_eq!(scan_one(ScriptMode::Code, "null").unwrap().0, TokenKind::KeywordConstant);
        assert_eq!(scan_one(ScriptMode::Code, "JSON").unwrap().0, TokenKind::NameBuiltin);
        assert_eq!(scan_one(ScriptMode::Code, "TypeError").unwrap().0, TokenKind::NameException);
        assert_eq!(scan_one(ScriptMode::Code, "$refs").unwrap().1, "$refs");
    }

    #[test]
    fn test_unterminated_string_is_not_a_token() {
        assert_eq!(scan_one(ScriptMode::Code, "'don"), None);
        assert_eq!(scan_one(ScriptMode::Code, "\"a\nb\""), None);
        assert_eq!(
            scan_one(ScriptMode::Code, r#""a\"b" x"#).map(|t| t.1),
            Some(r#""a\"b""#)
        );
    }

    #[test]
    fn test_regex_mode() {
        assert_eq!(
            scan_one(ScriptMode::RegexAllowed, "/a[/]b/gi.test"),
            Some((TokenKind::StringRegex, "/a[/]b/gi", Transition::Leave))
        );
        assert_eq!(scan_one(ScriptMode::RegexAllowed, "x"), None);
        assert_eq!(scan_one(ScriptMode::RegexAllowed, "/ab"), None);
    }

    #[test]
    fn test_template_hole_closes_on_brace() {
        assert_eq!(
            scan_one(ScriptMode::TemplateHole, "}`"),
            Some((TokenKind::StringInterpol, "}", Transition::Leave))
        );
        assert_eq!(scan_one(ScriptMode::TemplateHole, "a}").unwrap().0, TokenKind::NameOther);
    }

    #[test]
    fn test_scan_rejects_non_boundary() {
        let text = "é";
        assert_eq!(ScriptScanner::new().scan(ScriptMode::Code, text, 1), None);
        assert_eq!(ScriptScanner::new().scan(ScriptMode::Code, text, 2), None);
    }
}
