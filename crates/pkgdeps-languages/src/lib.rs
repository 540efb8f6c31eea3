//! Import-header parsing for pkgdeps.
//!
//! This crate defines the `ImportParser` trait: given the bytes of one source
//! file, return the import literals its header declares, in source order, or a
//! syntax failure. Grammars come from tree-sitter; nothing here reimplements a
//! language grammar.
//!
//! # Feature Flags
//!
//! - `langs-all` (default): every supported language
//! - `lang-go`: Go, via `tree-sitter-go`
//!
//! # Example
//!
//! ```ignore
//! use pkgdeps_languages::{ImportParser, go::GoImports};
//!
//! let imports = GoImports.parse_imports(b"package main\n\nimport \"fmt\"\n")?;
//! assert_eq!(imports[0].literal, "\"fmt\"");
//! assert_eq!(GoImports.decode_literal(&imports[0].literal)?, "fmt");
//! ```

#[cfg(feature = "lang-go")]
pub mod go;
mod traits;

pub use traits::{DecodeError, ImportParser, ParseError, RawImport};
