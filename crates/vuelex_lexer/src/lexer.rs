//! The lexer entry point and the metadata hosts use to find it.

use crate::error::{Error, Result};
use crate::grammar::Grammar;
use crate::options::LexerOptions;
use crate::tokenizer::Tokens;
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use lazy_static::lazy_static;
use std::path::Path;

lazy_static! {
    static ref FILENAME_GLOBS: GlobSet =
        VueLexer::filename_globs().expect("built-in filename globs compile");
}

/// Tokenizer for Vue single file components.
///
/// Cheap to construct: the rule tables are compiled once per process and
/// shared by every lexer with the same options.
#[derive(Debug, Clone, Copy)]
pub struct VueLexer {
    grammar: &'static Grammar,
    options: LexerOptions,
}

impl VueLexer {
    /// Canonical short name.
    pub const NAME: &'static str = "vue";
    pub const ALIASES: &'static [&'static str] = &["vue", "vuejs"];
    /// Globs matched against a file's name.
    pub const FILENAMES: &'static [&'static str] = &["*.vue"];
    pub const MIMETYPES: &'static [&'static str] = &["text/x-vue", "application/x-vue"];

    pub fn new() -> Self {
        Self::with_options(LexerOptions::default())
    }

    pub fn with_options(options: LexerOptions) -> Self {
        Self {
            grammar: Grammar::shared(&options),
            options,
        }
    }

    pub fn options(&self) -> &LexerOptions {
        &self.options
    }

    /// Lazily tokenize `text`. Never fails; the lexemes of the returned
    /// tokens concatenate to `text`.
    pub fn tokenize<'src>(&self, text: &'src str) -> Tokens<'static, 'src> {
        Tokens::new(self.grammar, text)
    }

    /// Whether `name` is the lexer's name or one of its aliases, ignoring case.
    pub fn matches_name(name: &str) -> bool {
        let name = name.trim();
        name.eq_ignore_ascii_case(Self::NAME)
            || Self::ALIASES
                .iter()
                .any(|alias| name.eq_ignore_ascii_case(alias))
    }

    /// Whether the file name of `path` matches one of [`Self::FILENAMES`].
    pub fn matches_filename(path: impl AsRef<Path>) -> bool {
        path.as_ref()
            .file_name()
            .is_some_and(|name| FILENAME_GLOBS.is_match(Path::new(name)))
    }

    /// Compile [`Self::FILENAMES`] into a glob set.
    pub fn filename_globs() -> Result<GlobSet> {
        let mut builder = GlobSetBuilder::new();
        for glob in Self::FILENAMES {
            let compiled = GlobBuilder::new(glob)
                .literal_separator(true)
                .build()
                .map_err(|source| Error::Glob {
                    glob: glob.to_string(),
                    source,
                })?;
            builder.add(compiled);
        }
        builder.build().map_err(|source| Error::Glob {
            glob: Self::FILENAMES.join(","),
            source,
        })
    }
}

impl Default for VueLexer {
    fn default() -> Self {
        Self::new()
    }
}
