//! Go (GOPATH) local package layout.

use crate::LocalDeps;

/// Go packages under `$GOPATH/src/<import path>`.
pub struct GoDeps;

impl LocalDeps for GoDeps {
    fn language_name(&self) -> &'static str {
        "Go"
    }

    fn indexable_extensions(&self) -> &'static [&'static str] {
        &["go"]
    }

    fn search_roots_var(&self) -> Option<&'static str> {
        Some("GOPATH")
    }

    fn is_test_file(&self, name: &str) -> bool {
        name.ends_with("_test.go")
    }
}
