//! Configuration system for pkgdeps.
//!
//! Loads config from:
//! 1. Global: ~/.config/pkgdeps/config.toml
//! 2. Per-project: .pkgdeps/config.toml (overrides global)
//!
//! Example config.toml:
//! ```toml
//! [resolve]
//! search_roots = ["/home/me/go"]
//!
//! [discover]
//! follow_links = false
//! include_tests = true
//!
//! [output]
//! format = "text"
//! ```

use crate::output::OutputFormat;
use pkgdeps_local_deps::{DiscoverOptions, SearchRoots};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Package resolution configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ResolveConfig {
    /// Search roots used when GOPATH is unset or empty.
    pub search_roots: Option<Vec<PathBuf>>,
}

/// Source discovery configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct DiscoverConfig {
    /// Descend into symlinked directories. Default: false
    pub follow_links: Option<bool>,
    /// Include `*_test.go` files. Default: true
    pub include_tests: Option<bool>,
}

impl DiscoverConfig {
    pub fn follow_links(&self) -> bool {
        self.follow_links.unwrap_or(false)
    }

    pub fn include_tests(&self) -> bool {
        self.include_tests.unwrap_or(true)
    }

    /// Merge another config into this one. Values set in `other` win.
    pub fn merge(self, other: Self) -> Self {
        Self {
            follow_links: other.follow_links.or(self.follow_links),
            include_tests: other.include_tests.or(self.include_tests),
        }
    }

    pub fn options(&self) -> DiscoverOptions {
        DiscoverOptions {
            follow_links: self.follow_links(),
            include_tests: self.include_tests(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct OutputConfig {
    pub format: Option<OutputFormat>,
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PkgdepsConfig {
    pub resolve: ResolveConfig,
    pub discover: DiscoverConfig,
    pub output: OutputConfig,
}

impl PkgdepsConfig {
    /// Load configuration for a project.
    ///
    /// Loads global config from ~/.config/pkgdeps/config.toml,
    /// then merges with per-project config from .pkgdeps/config.toml.
    pub fn load(root: &Path) -> Self {
        Self::load_from(Self::global_config_path().as_deref(), root)
    }

    /// Load with an explicit global config path (`None` skips it).
    pub fn load_from(global_path: Option<&Path>, root: &Path) -> Self {
        let mut config = Self::default();

        if let Some(global) = global_path.and_then(Self::load_file) {
            config = config.merge(global);
        }

        let project_path = root.join(".pkgdeps").join("config.toml");
        if let Some(project) = Self::load_file(&project_path) {
            config = config.merge(project);
        }

        config
    }

    /// Search roots: non-empty roots from the environment win, otherwise the
    /// configured roots. May be empty, which resolution reports as
    /// unconfigured.
    pub fn search_roots(&self, from_env: SearchRoots) -> SearchRoots {
        if !from_env.is_empty() {
            return from_env;
        }
        SearchRoots::new(self.resolve.search_roots.clone().unwrap_or_default())
    }

    /// Get the global config path.
    fn global_config_path() -> Option<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))?;
        Some(config_home.join("pkgdeps").join("config.toml"))
    }

    /// Load config from a file path. A missing file is silent; an unreadable
    /// or malformed one is reported and ignored.
    fn load_file(path: &Path) -> Option<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "cannot read config");
                return None;
            }
        };
        match toml::from_str(&content) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring invalid config");
                None
            }
        }
    }

    /// Merge another config into this one. Values set in `other` win.
    fn merge(self, other: Self) -> Self {
        Self {
            resolve: ResolveConfig {
                search_roots: other.resolve.search_roots.or(self.resolve.search_roots),
            },
            discover: self.discover.merge(other.discover),
            output: OutputConfig {
                format: other.output.format.or(self.output.format),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(path: &Path, content: &str) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        let mut file = std::fs::File::create(path).unwrap();
        writeln!(file, "{}", content).unwrap();
    }

    #[test]
    fn test_default_config() {
        let dir = TempDir::new().unwrap();
        let config = PkgdepsConfig::load_from(None, dir.path());
        assert!(!config.discover.follow_links());
        assert!(config.discover.include_tests());
        assert_eq!(config.output.format, None);
        assert!(config.resolve.search_roots.is_none());
    }

    #[test]
    fn test_load_project_config() {
        let dir = TempDir::new().unwrap();
        write_config(
            &dir.path().join(".pkgdeps/config.toml"),
            r#"
[resolve]
search_roots = ["/opt/go", "/home/me/go"]

[discover]
include_tests = false

[output]
format = "jsonl"
"#,
        );

        let config = PkgdepsConfig::load_from(None, dir.path());
        assert!(!config.discover.include_tests());
        assert!(!config.discover.follow_links()); // default
        assert_eq!(config.output.format, Some(OutputFormat::JsonLines));
        let roots = config.search_roots(SearchRoots::default());
        let roots: Vec<_> = roots.iter().collect();
        assert_eq!(roots, vec![Path::new("/opt/go"), Path::new("/home/me/go")]);
    }

    #[test]
    fn test_project_overrides_global_per_field() {
        let global_dir = TempDir::new().unwrap();
        let global = global_dir.path().join("config.toml");
        write_config(
            &global,
            r#"
[discover]
follow_links = true
include_tests = false
"#,
        );

        let dir = TempDir::new().unwrap();
        write_config(
            &dir.path().join(".pkgdeps/config.toml"),
            r#"
[discover]
include_tests = true
"#,
        );

        let config = PkgdepsConfig::load_from(Some(&global), dir.path());
        assert!(config.discover.follow_links()); // from global
        assert!(config.discover.include_tests()); // project wins
    }

    #[test]
    fn test_discover_overrides_both_ways() {
        let configured = DiscoverConfig {
            follow_links: Some(true),
            include_tests: Some(false),
        };

        let unchanged = configured.clone().merge(DiscoverConfig::default()).options();
        assert!(unchanged.follow_links);
        assert!(!unchanged.include_tests);

        let reversed = configured
            .merge(DiscoverConfig {
                follow_links: Some(false),
                include_tests: Some(true),
            })
            .options();
        assert!(!reversed.follow_links);
        assert!(reversed.include_tests);
    }

    #[test]
    fn test_invalid_config_ignored() {
        let dir = TempDir::new().unwrap();
        write_config(&dir.path().join(".pkgdeps/config.toml"), "[discover\nnope");
        let config = PkgdepsConfig::load_from(None, dir.path());
        assert!(config.discover.include_tests());
    }

    #[test]
    fn test_gopath_beats_configured_roots() {
        let config = PkgdepsConfig {
            resolve: ResolveConfig {
                search_roots: Some(vec![PathBuf::from("/configured")]),
            },
            ..Default::default()
        };

        let roots = config.search_roots(SearchRoots::from_path_list("/from/env"));
        assert_eq!(roots.iter().collect::<Vec<_>>(), vec![Path::new("/from/env")]);

        // Empty GOPATH counts as unset.
        let roots = config.search_roots(SearchRoots::from_path_list(""));
        assert_eq!(roots.iter().collect::<Vec<_>>(), vec![Path::new("/configured")]);

        assert!(
            PkgdepsConfig::default()
                .search_roots(SearchRoots::default())
                .is_empty()
        );
    }
}
