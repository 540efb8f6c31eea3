//! Best-effort recursive source discovery.

use crate::LocalDeps;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Knobs for [`discover_source_files`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoverOptions {
    /// Descend into symlinked directories.
    pub follow_links: bool,
    /// Keep test files (as classified by [`LocalDeps::is_test_file`]).
    pub include_tests: bool,
}

impl Default for DiscoverOptions {
    fn default() -> Self {
        Self {
            follow_links: false,
            include_tests: true,
        }
    }
}

/// Recursively list the source files under `dir` (or `dir` itself, if it is
/// a source file).
///
/// This is best-effort enumeration, not verified enumeration: an entry that
/// cannot be read (permission denied, broken symlink, removed mid-walk) is
/// skipped together with its subtree, and the walk carries on. It never
/// fails; a missing `dir` yields an empty list. Order follows the traversal
/// and is not sorted.
pub fn discover_source_files(
    deps: &dyn LocalDeps,
    dir: &Path,
    options: &DiscoverOptions,
) -> Vec<PathBuf> {
    let files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(options.follow_links)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                tracing::trace!(error = %err, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| !is_dir(entry))
        .filter(|entry| {
            let name = entry.file_name().to_string_lossy();
            !deps.should_skip_dep_entry(&name, false)
                && (options.include_tests || !deps.is_test_file(&name))
        })
        .map(DirEntry::into_path)
        .collect();

    tracing::debug!(
        dir = %dir.display(),
        files = files.len(),
        language = deps.language_name(),
        "discovered source files"
    );
    files
}

/// Unfollowed symlinks are classified by their target; dangling ones are
/// treated like unreadable entries.
fn is_dir(entry: &DirEntry) -> bool {
    if !entry.file_type().is_symlink() {
        return entry.file_type().is_dir();
    }
    match std::fs::metadata(entry.path()) {
        Ok(meta) => meta.is_dir(),
        Err(err) => {
            tracing::trace!(path = %entry.path().display(), error = %err, "skipping dangling symlink");
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::go::GoDeps;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) -> PathBuf {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "package p\n").unwrap();
        path
    }

    fn discover(dir: &Path, options: &DiscoverOptions) -> BTreeSet<PathBuf> {
        discover_source_files(&GoDeps, dir, options)
            .into_iter()
            .collect()
    }

    #[test]
    fn test_recursive_with_extension_filter() {
        let dir = TempDir::new().unwrap();
        let a = touch(dir.path(), "a.go");
        let b = touch(dir.path(), "sub/b.go");
        let c = touch(dir.path(), "sub/deeper/c.go");
        touch(dir.path(), "README.md");
        touch(dir.path(), "sub/go.mod");
        std::fs::create_dir_all(dir.path().join("empty.go")).unwrap();

        let found = discover(dir.path(), &DiscoverOptions::default());
        assert_eq!(found, BTreeSet::from([a, b, c]));
    }

    #[test]
    fn test_root_file_itself() {
        let dir = TempDir::new().unwrap();
        let file = touch(dir.path(), "main.go");
        let found = discover_source_files(&GoDeps, &file, &DiscoverOptions::default());
        assert_eq!(found, vec![file]);
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        let found = discover_source_files(
            &GoDeps,
            &dir.path().join("nope"),
            &DiscoverOptions::default(),
        );
        assert!(found.is_empty());
    }

    #[test]
    fn test_exclude_tests() {
        let dir = TempDir::new().unwrap();
        let main = touch(dir.path(), "main.go");
        touch(dir.path(), "main_test.go");

        let options = DiscoverOptions {
            include_tests: false,
            ..Default::default()
        };
        assert_eq!(discover(dir.path(), &options), BTreeSet::from([main]));
        assert_eq!(discover(dir.path(), &DiscoverOptions::default()).len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_dangling_symlink_skipped() {
        let dir = TempDir::new().unwrap();
        let real = touch(dir.path(), "real.go");
        std::os::unix::fs::symlink(dir.path().join("gone.go"), dir.path().join("broken.go"))
            .unwrap();

        assert_eq!(
            discover(dir.path(), &DiscoverOptions::default()),
            BTreeSet::from([real])
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_dirs_followed_only_when_asked() {
        let outside = TempDir::new().unwrap();
        touch(outside.path(), "lib/lib.go");

        let dir = TempDir::new().unwrap();
        let main = touch(dir.path(), "main.go");
        std::os::unix::fs::symlink(outside.path().join("lib"), dir.path().join("lib")).unwrap();
        let linked_file = dir.path().join("linked.go");
        std::os::unix::fs::symlink(&main, &linked_file).unwrap();

        let found = discover(dir.path(), &DiscoverOptions::default());
        assert_eq!(found, BTreeSet::from([main.clone(), linked_file.clone()]));

        let options = DiscoverOptions {
            follow_links: true,
            ..Default::default()
        };
        let found = discover(dir.path(), &options);
        assert_eq!(
            found,
            BTreeSet::from([main, linked_file, dir.path().join("lib/lib.go")])
        );
    }
}
