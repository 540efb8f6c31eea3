//! Search roots and package-to-directory resolution.

use crate::LocalDeps;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Ordered list of directories a package identifier is resolved against.
///
/// Order is priority: the first root that contains the package wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRoots(Vec<PathBuf>);

impl SearchRoots {
    /// Build from explicit paths. Empty paths are dropped.
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self(
            roots
                .into_iter()
                .map(Into::into)
                .filter(|p: &PathBuf| !p.as_os_str().is_empty())
                .collect(),
        )
    }

    /// Split a path list on the platform separator (`:` on unix, `;` on
    /// Windows), as found in GOPATH-style variables.
    pub fn from_path_list(value: impl AsRef<OsStr>) -> Self {
        Self::new(std::env::split_paths(value.as_ref()))
    }

    /// Read a path-list environment variable. Unset and empty both give an
    /// empty list.
    pub fn from_env(var: &str) -> Self {
        std::env::var_os(var)
            .map(Self::from_path_list)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.0.iter().map(PathBuf::as_path)
    }
}

/// Failure to map a package identifier to a directory.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// No search roots at all. Never treated as "nothing found".
    #[error("{var} not set")]
    NotConfigured { var: &'static str },

    #[error("package not found: {package}")]
    NotFound {
        package: String,
        /// Candidate directories that were checked, in order.
        searched: Vec<PathBuf>,
    },
}

/// Resolve `package` to the first `<root>/src/<package>` directory that
/// exists, trying roots in order. Only stats the filesystem.
pub fn resolve_package(
    deps: &dyn LocalDeps,
    package: &str,
    roots: &SearchRoots,
) -> Result<PathBuf, ResolveError> {
    if roots.is_empty() {
        return Err(ResolveError::NotConfigured {
            var: deps.search_roots_var().unwrap_or("search roots"),
        });
    }

    let mut searched = Vec::with_capacity(roots.len());
    for root in roots.iter() {
        let candidate = deps.package_dir(root, package);
        if candidate.is_dir() {
            tracing::debug!(package, dir = %candidate.display(), "resolved package");
            return Ok(candidate);
        }
        tracing::trace!(package, dir = %candidate.display(), "not in search root");
        searched.push(candidate);
    }

    Err(ResolveError::NotFound {
        package: package.to_string(),
        searched,
    })
}
