//! Error type for import collection.

use pkgdeps_languages::{DecodeError, ParseError};
use pkgdeps_local_deps::ResolveError;
use std::path::{Path, PathBuf};

/// Broad category of an [`Error`], for callers that branch on kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    NotFound,
    Io,
    Syntax,
    Decode,
    Grammar,
}

/// Failure while collecting imports. Every variant carries the package or
/// file it concerns.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Search roots are unset or empty.
    #[error("{var} not set")]
    Configuration { var: &'static str },

    /// No search root contains the package.
    #[error("package not found: {package}")]
    NotFound {
        package: String,
        searched: Vec<PathBuf>,
    },

    /// A source file could not be read.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A source file's import header is not valid.
    #[error("{}:{line}:{column}: {message}", path.display())]
    Syntax {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// An import literal could not be unescaped.
    #[error("{}: cannot decode import {literal}: {reason}", path.display())]
    Decode {
        path: PathBuf,
        literal: String,
        #[source]
        reason: DecodeError,
    },

    /// The grammar backing the parser could not be used.
    #[error("{}: {language} grammar unavailable: {reason}", path.display())]
    Grammar {
        path: PathBuf,
        language: &'static str,
        reason: String,
    },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Configuration { .. } => ErrorKind::Configuration,
            Error::NotFound { .. } => ErrorKind::NotFound,
            Error::Io { .. } => ErrorKind::Io,
            Error::Syntax { .. } => ErrorKind::Syntax,
            Error::Decode { .. } => ErrorKind::Decode,
            Error::Grammar { .. } => ErrorKind::Grammar,
        }
    }

    /// The file the error concerns, if it is a per-file error.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Error::Io { path, .. }
            | Error::Syntax { path, .. }
            | Error::Decode { path, .. }
            | Error::Grammar { path, .. } => Some(path),
            Error::Configuration { .. } | Error::NotFound { .. } => None,
        }
    }

    pub(crate) fn parse(path: &Path, err: ParseError) -> Self {
        match err {
            ParseError::Syntax {
                line,
                column,
                message,
            } => Error::Syntax {
                path: path.to_path_buf(),
                line,
                column,
                message,
            },
            ParseError::Grammar { language, reason } => Error::Grammar {
                path: path.to_path_buf(),
                language,
                reason,
            },
        }
    }
}

impl From<ResolveError> for Error {
    fn from(err: ResolveError) -> Self {
        match err {
            ResolveError::NotConfigured { var } => Error::Configuration { var },
            ResolveError::NotFound { package, searched } => Error::NotFound { package, searched },
        }
    }
}
