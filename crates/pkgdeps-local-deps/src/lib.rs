//! Local package discovery for language ecosystems.
//!
//! This crate answers two questions for a package identifier:
//! "which directory on disk holds it?" (resolution against an ordered list of
//! search roots, e.g. GOPATH) and "which source files live under it?"
//! (best-effort recursive discovery).
//!
//! Nothing here reads process state implicitly: search roots are an explicit
//! [`SearchRoots`] value. [`SearchRoots::from_env`] exists for the outer
//! layer that does want the environment.

mod discover;
#[cfg(feature = "lang-go")]
pub mod go;
mod roots;

pub use discover::{DiscoverOptions, discover_source_files};
pub use roots::{ResolveError, SearchRoots, resolve_package};

use std::path::{Path, PathBuf};

/// Check if name has one of the given extensions.
pub fn has_extension(name: &str, extensions: &[&str]) -> bool {
    extensions
        .iter()
        .any(|ext| name.ends_with(&format!(".{}", ext)))
}

/// Local package layout for a language ecosystem.
///
/// Only `language_name` and `indexable_extensions` are required; the rest
/// default to a GOPATH-like layout (`<root>/src/<package>`).
pub trait LocalDeps: Send + Sync {
    /// Language name (for display and log output).
    fn language_name(&self) -> &'static str;

    /// File extensions of source files, without the dot.
    fn indexable_extensions(&self) -> &'static [&'static str];

    /// Environment variable holding the search-root list, if the ecosystem
    /// has one.
    fn search_roots_var(&self) -> Option<&'static str> {
        None
    }

    /// Directory that `package` maps to under one search root.
    ///
    /// `/`-separated segments become nested directories; empty segments are
    /// dropped so an identifier can never escape the root.
    fn package_dir(&self, root: &Path, package: &str) -> PathBuf {
        let mut dir = root.join("src");
        dir.extend(package.split('/').filter(|s| !s.is_empty() && *s != "." && *s != ".."));
        dir
    }

    /// Is this file a test file (e.g. `foo_test.go`)?
    fn is_test_file(&self, _name: &str) -> bool {
        false
    }

    /// Should this entry be skipped during discovery?
    /// Called for each non-directory entry under a package directory.
    fn should_skip_dep_entry(&self, name: &str, is_dir: bool) -> bool {
        !is_dir && !has_extension(name, self.indexable_extensions())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Plain;

    impl LocalDeps for Plain {
        fn language_name(&self) -> &'static str {
            "Plain"
        }
        fn indexable_extensions(&self) -> &'static [&'static str] {
            &["txt"]
        }
    }

    #[test]
    fn test_has_extension() {
        assert!(has_extension("main.go", &["go"]));
        assert!(has_extension("a.b.go", &["rs", "go"]));
        assert!(!has_extension("main.golang", &["go"]));
        assert!(!has_extension("go", &["go"]));
    }

    #[test]
    fn test_default_package_dir() {
        let dir = Plain.package_dir(Path::new("/gopath"), "github.com/test/test1");
        assert_eq!(dir, Path::new("/gopath/src/github.com/test/test1"));
    }

    #[test]
    fn test_package_dir_stays_under_root() {
        let dir = Plain.package_dir(Path::new("/gopath"), "/../etc//passwd/");
        assert_eq!(dir, Path::new("/gopath/src/etc/passwd"));
        assert_eq!(Plain.package_dir(Path::new("/gopath"), ""), Path::new("/gopath/src"));
    }

    #[test]
    fn test_default_skip() {
        assert!(!Plain.should_skip_dep_entry("notes.txt", false));
        assert!(Plain.should_skip_dep_entry("notes.md", false));
        assert!(!Plain.should_skip_dep_entry("docs", true));
        assert!(!Plain.is_test_file("notes_test.txt"));
    }
}
