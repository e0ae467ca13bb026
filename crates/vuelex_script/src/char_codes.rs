//! Character classes of the script grammar.

use unicode_xid::UnicodeXID;

pub const CARRIAGE_RETURN: char = '\r';

/// `\n`, `\r`, U+2028 and U+2029.
#[inline]
pub fn is_line_break(ch: char) -> bool {
    matches!(ch, '\n' | CARRIAGE_RETURN | '\u{2028}' | '\u{2029}')
}

/// Any JavaScript whitespace, line terminators included.
#[inline]
pub fn is_white_space(ch: char) -> bool {
    match ch {
        ' ' | '\t' | '\u{000B}' | '\u{000C}' => true,
        // no-break, ogham, en quad..hair, narrow no-break, math, ideographic, BOM
        '\u{00A0}' | '\u{1680}' | '\u{2000}'..='\u{200A}' | '\u{202F}' | '\u{205F}'
        | '\u{3000}' | '\u{FEFF}' => true,
        _ => is_line_break(ch),
    }
}

#[inline]
pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

#[inline]
pub fn is_octal_digit(ch: char) -> bool {
    matches!(ch, '0'..='7')
}

#[inline]
pub fn is_binary_digit(ch: char) -> bool {
    matches!(ch, '0' | '1')
}

#[inline]
pub fn is_hex_digit(ch: char) -> bool {
    ch.is_ascii_hexdigit()
}

/// `$`, `_`, or a character with the XID_Start property.
#[inline]
pub fn is_identifier_start(ch: char) -> bool {
    if ch.is_ascii() {
        ch.is_ascii_alphabetic() || ch == '$' || ch == '_'
    } else {
        ch.is_xid_start()
    }
}

/// `$`, `_`, or a character with the XID_Continue property.
#[inline]
pub fn is_identifier_part(ch: char) -> bool {
    if ch.is_ascii() {
        ch.is_ascii_alphanumeric() || ch == '$' || ch == '_'
    } else {
        ch.is_xid_continue()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_chars() {
        assert!(is_identifier_start('$'));
        assert!(is_identifier_start('é'));
        assert!(!is_identifier_start('1'));
        assert!(is_identifier_part('1'));
        assert!(!is_identifier_part('-'));
    }

    #[test]
    fn test_white_space_includes_line_breaks() {
        assert!(is_white_space('\u{2028}'));
        assert!(is_white_space('\u{3000}'));
        assert!(!is_white_space('\u{200B}'));
    }
}
