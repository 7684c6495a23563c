//! User configuration loaded from `$XDG_CONFIG_HOME/bbb/config.toml`.
//!
//! Every key is optional. A missing file means defaults; a malformed file is
//! logged and also means defaults, so a typo never prevents startup.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

/// Values read from `config.toml`.
///
/// ```toml
/// theme = "dark"
/// tab_width = 8
/// ignore_revs_file = ".git-blame-ignore-revs"
/// pager = "delta --paging=always"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Theme name, resolved by `Theme::from_name`.
    pub theme: String,
    /// Columns a tab character expands to in the content column.
    pub tab_width: usize,
    /// Ignore-revs file passed to `git blame`, relative to the work tree.
    pub ignore_revs_file: Option<PathBuf>,
    /// Pager for `git show`; git's own pager configuration when absent.
    pub pager: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "catppuccin-mocha".to_owned(),
            tab_width: 4,
            ignore_revs_file: None,
            pager: None,
        }
    }
}

impl Config {
    /// Loads the user's config file, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    /// Loads the config at `path`, falling back to defaults on any error.
    pub fn load_from(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(_) => return Self::default(),
        };
        match toml::from_str::<Config>(&raw) {
            Ok(config) if config.tab_width == 0 => {
                warn!(?path, "tab_width must be positive, using the default");
                Config { tab_width: Self::default().tab_width, ..config }
            }
            Ok(config) => config,
            Err(err) => {
                warn!(?path, %err, "config parse error, using defaults");
                Self::default()
            }
        }
    }
}

/// Returns the path to the bbb config file.
///
/// Prefers `$XDG_CONFIG_HOME/bbb/config.toml`; falls back to
/// `~/.config/bbb/config.toml` when the env var is absent.
pub fn config_path() -> PathBuf {
    xdg_dir("XDG_CONFIG_HOME", ".config").join("bbb").join("config.toml")
}

/// Resolves an XDG base directory, falling back to `$HOME/<fallback>`.
pub fn xdg_dir(var: &str, fallback: &str) -> PathBuf {
    std::env::var(var)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var("HOME").ok().map(|h| PathBuf::from(h).join(fallback)))
        .unwrap_or_else(|| PathBuf::from(fallback))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn write_config(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        assert_eq!(Config::load_from(&dir.path().join("nope.toml")), Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let (_dir, path) = write_config("theme = \"dark\"\ntab_width = 8\n");
        let config = Config::load_from(&path);
        assert_eq!(config.theme, "dark");
        assert_eq!(config.tab_width, 8);
        assert_eq!(config.ignore_revs_file, None);
        assert_eq!(config.pager, None);
    }

    #[test]
    fn all_keys_are_read() {
        let (_dir, path) = write_config(
            "ignore_revs_file = \".git-blame-ignore-revs\"\npager = \"less -R\"\n",
        );
        let config = Config::load_from(&path);
        assert_eq!(config.ignore_revs_file, Some(PathBuf::from(".git-blame-ignore-revs")));
        assert_eq!(config.pager.as_deref(), Some("less -R"));
    }

    #[test]
    fn malformed_file_gives_defaults() {
        let (_dir, path) = write_config("theme = [\n");
        assert_eq!(Config::load_from(&path), Config::default());
        let (_dir, path) = write_config("colour = \"red\"\n");
        assert_eq!(Config::load_from(&path), Config::default());
    }

    #[test]
    fn zero_tab_width_is_replaced() {
        let (_dir, path) = write_config("tab_width = 0\n");
        assert_eq!(Config::load_from(&path).tab_width, 4);
    }
}
