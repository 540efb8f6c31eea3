//! List the imports used across a Go package.
//!
//! The pipeline is: resolve the package identifier against an ordered list of
//! search roots (`<root>/src/<package>`), discover its source files
//! recursively, parse each file's import header, and merge everything into a
//! deduplicated [`ImportSet`].
//!
//! ```ignore
//! use pkgdeps::{Importer, SearchRoots};
//!
//! let importer = Importer::go(SearchRoots::from_env("GOPATH"));
//! for import in importer.package_imports("github.com/user/repo/pkg")? {
//!     println!("{import}");
//! }
//! ```
//!
//! Parsing and package layout are injected: [`Importer::new`] accepts any
//! [`ImportParser`] and [`LocalDeps`] implementation.

pub mod config;
mod error;
mod importer;
pub mod output;

pub use error::{Error, ErrorKind};
pub use importer::{FileImports, ImportSet, Importer, PackageReport};
pub use pkgdeps_languages::{ImportParser, RawImport};
pub use pkgdeps_local_deps::{DiscoverOptions, LocalDeps, SearchRoots};
