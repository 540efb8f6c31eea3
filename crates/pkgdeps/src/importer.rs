//! Package import collection: resolve, discover, extract, dedup.

use crate::Error;
use pkgdeps_languages::ImportParser;
use pkgdeps_languages::go::GoImports;
use pkgdeps_local_deps::go::GoDeps;
use pkgdeps_local_deps::{
    DiscoverOptions, LocalDeps, SearchRoots, discover_source_files, has_extension,
    resolve_package,
};
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Deduplicated import identifiers of a package. Iterates in sorted order.
pub type ImportSet = BTreeSet<String>;

/// Imports of one package, with where they were found.
#[derive(Debug, Clone, Serialize)]
pub struct PackageReport {
    pub package: String,
    /// Resolved package directory.
    pub directory: PathBuf,
    /// Number of source files scanned.
    pub files: usize,
    pub imports: ImportSet,
}

/// Imports of one file, in source order, duplicates kept.
#[derive(Debug, Clone, Serialize)]
pub struct FileImports {
    pub file: PathBuf,
    pub imports: Vec<String>,
}

/// Collects imports for packages found under a set of search roots.
///
/// Holds no mutable state, so one importer can serve any number of queries,
/// from any number of threads.
pub struct Importer<'a> {
    roots: SearchRoots,
    discover: DiscoverOptions,
    deps: &'a dyn LocalDeps,
    parser: &'a dyn ImportParser,
}

impl Importer<'static> {
    /// Importer for Go packages laid out GOPATH-style.
    pub fn go(roots: SearchRoots) -> Self {
        Self::new(roots, &GoDeps, &GoImports)
    }
}

impl<'a> Importer<'a> {
    pub fn new(roots: SearchRoots, deps: &'a dyn LocalDeps, parser: &'a dyn ImportParser) -> Self {
        Self {
            roots,
            discover: DiscoverOptions::default(),
            deps,
            parser,
        }
    }

    pub fn with_discover_options(mut self, options: DiscoverOptions) -> Self {
        self.discover = options;
        self
    }

    /// Directory of `package` under the first search root that has it.
    pub fn resolve(&self, package: &str) -> Result<PathBuf, Error> {
        Ok(resolve_package(self.deps, package, &self.roots)?)
    }

    /// Source files under `dir`, best-effort (see [`discover_source_files`]).
    ///
    /// Only files the parser claims by extension are returned.
    pub fn source_files(&self, dir: &Path) -> Vec<PathBuf> {
        let extensions = self.parser.extensions();
        discover_source_files(self.deps, dir, &self.discover)
            .into_iter()
            .filter(|path| {
                let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
                has_extension(name, extensions)
            })
            .collect()
    }

    /// Decoded import identifiers of one file, in source order.
    pub fn file_imports(&self, path: &Path) -> Result<Vec<String>, Error> {
        let source = std::fs::read(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let raw = self
            .parser
            .parse_imports(&source)
            .map_err(|e| Error::parse(path, e))?;

        raw.into_iter()
            .map(|import| match self.parser.decode_literal(&import.literal) {
                Ok(decoded) => Ok(decoded),
                Err(reason) => Err(Error::Decode {
                    path: path.to_path_buf(),
                    literal: import.literal,
                    reason,
                }),
            })
            .collect()
    }

    /// Collect the imports of every source file of `package`.
    ///
    /// Fails on the first error, in processing order; there is no partial
    /// result.
    pub fn package_report(&self, package: &str) -> Result<PackageReport, Error> {
        let directory = self.resolve(package)?;
        let files = self.source_files(&directory);

        let mut imports = ImportSet::new();
        for file in &files {
            let file_imports = self.file_imports(file)?;
            tracing::trace!(file = %file.display(), count = file_imports.len(), "parsed imports");
            imports.extend(file_imports);
        }

        tracing::info!(
            package,
            language = self.parser.name(),
            files = files.len(),
            imports = imports.len(),
            "collected package imports"
        );
        Ok(PackageReport {
            package: package.to_string(),
            directory,
            files: files.len(),
            imports,
        })
    }

    /// The deduplicated imports of `package`.
    pub fn package_imports(&self, package: &str) -> Result<ImportSet, Error> {
        Ok(self.package_report(package)?.imports)
    }
}
