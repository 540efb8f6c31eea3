//! Core trait for import-header parsing.

/// An import as written in the source, before literal decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImport {
    /// The path token exactly as written, quotes included (e.g. `"os/exec"`).
    pub literal: String,
    /// Import name, if any (`_`, `.`, or a package identifier).
    pub alias: Option<String>,
    /// 1-indexed line of the path token.
    pub line: usize,
}

/// Failure to parse a file's import header.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("{line}:{column}: {message}")]
    Syntax {
        /// 1-indexed.
        line: usize,
        /// 1-indexed, in bytes.
        column: usize,
        message: String,
    },

    #[error("{language} grammar unavailable: {reason}")]
    Grammar {
        language: &'static str,
        reason: String,
    },
}

/// Failure to decode a quoted import literal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("not a quoted string literal")]
    NotQuoted,

    #[error("invalid escape sequence `{0}`")]
    InvalidEscape(String),

    #[error("unescaped {0:?} in string literal")]
    UnescapedChar(char),

    #[error("escape `{0}` is not a valid Unicode code point")]
    InvalidCodePoint(String),

    #[error("decoded literal is not valid UTF-8")]
    InvalidUtf8,
}

/// Import-header parsing for one language.
///
/// Implementations only look at the header of a file (package clause and the
/// import declarations that follow it); the rest of the file may be
/// incomplete or invalid.
pub trait ImportParser: Send + Sync {
    /// Display name (e.g., "Go").
    fn name(&self) -> &'static str;

    /// Source file extensions, without the dot (e.g., `&["go"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// Parse the header of `source` and return its import literals in the
    /// order they appear. Duplicates are kept.
    fn parse_imports(&self, source: &[u8]) -> Result<Vec<RawImport>, ParseError>;

    /// Decode a literal returned by [`ImportParser::parse_imports`] into the
    /// import identifier it denotes.
    fn decode_literal(&self, literal: &str) -> Result<String, DecodeError>;
}
