//! Whole-component tests over the files in `tests/fixtures`.

use vuelex_lexer::{LexerOptions, Token, TokenKind, VueLexer};

const BOOKS: &str = include_str!("fixtures/books.vue");

fn tokens(options: LexerOptions) -> Vec<Token<'static>> {
    VueLexer::with_options(options).tokenize(BOOKS).collect()
}

fn contains(tokens: &[Token<'_>], kind: TokenKind, text: &str) -> bool {
    tokens.iter().any(|t| t.kind == kind && t.text == text)
}

#[test]
fn test_fixture_is_covered_without_errors() {
    for options in [LexerOptions::default(), LexerOptions::opaque_attributes()] {
        let tokens = tokens(options);
        assert_eq!(tokens.iter().map(|t| t.text).collect::<String>(), BOOKS);
        let errors: Vec<_> = tokens.iter().filter(|t| t.kind == TokenKind::Error).collect();
        assert!(errors.is_empty(), "unexpected errors: {errors:?}");
    }
}

#[test]
fn test_fixture_tags() {
    let tokens = tokens(LexerOptions::default());
    let tags: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::NameTag)
        .map(|t| t.text)
        .collect();
    assert_eq!(&tags[..6], &["template", "div", "h1", "h1", "b-alert", "b-alert"]);
    assert_eq!(tags.iter().filter(|&&tag| tag == "td").count(), 8);
    assert_eq!(tags.last(), Some(&"style"));
    assert!(contains(&tokens, TokenKind::CommentMultiline, "<!-- book list -->"));
}

#[test]
fn test_fixture_directives() {
    let tokens = tokens(LexerOptions::default());
    let names = [
        ":show",
        "v-for",
        ":key",
        "v-if",
        "v-else",
        "v-b-modal.book-update-modal",
        "@click",
        "@click.prevent",
        ":title",
        "scoped",
    ];
    for name in names {
        assert!(contains(&tokens, TokenKind::NameAttribute, name), "missing {name}");
    }
}

#[test]
fn test_fixture_expressions() {
    let aware = tokens(LexerOptions::default());
    assert!(contains(&aware, TokenKind::NameFunction, "editBook"));
    assert!(contains(&aware, TokenKind::NameFunction, "onDeleteBook"));
    assert!(contains(&aware, TokenKind::NameVariable, "author"));
    assert!(contains(&aware, TokenKind::StringInterpol, "${"));

    let opaque = tokens(LexerOptions::opaque_attributes());
    assert!(contains(&opaque, TokenKind::StringDouble, "\"editBook(book)\""));
    assert!(!contains(&opaque, TokenKind::NameFunction, "editBook"));
    // Interpolations do not depend on the attribute variant.
    assert!(contains(&opaque, TokenKind::NameFunction, "formatDate"));
}

#[test]
fn test_fixture_script() {
    let tokens = tokens(LexerOptions::default());
    assert!(contains(&tokens, TokenKind::StringSingle, "'axios'"));
    assert!(contains(&tokens, TokenKind::StringBacktick, "http://localhost:5000/books"));
    assert!(contains(&tokens, TokenKind::KeywordConstant, "false"));
    assert!(contains(&tokens, TokenKind::KeywordDeclaration, "const"));
}
