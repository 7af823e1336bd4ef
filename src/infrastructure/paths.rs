//! Filesystem locations and path expansion.
//!
//! The data directory holds the JSON settings store and, when file logging is
//! enabled, the rotating log. It resolves to `$XDG_DATA_HOME/marketdir`, then
//! `~/.local/share/marketdir`, then `./.marketdir` when no home is known.

use std::env;
use std::path::{Path, PathBuf};

/// File name of the persistent key-value store inside the data directory.
pub const STORE_FILE: &str = "marketdir.json";

const APP_DIR: &str = "marketdir";

/// Returns the current user's home directory from `$HOME`.
#[must_use]
pub fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}

/// Returns the default data directory.
#[must_use]
pub fn get_data_dir() -> PathBuf {
    if let Some(xdg) = env::var_os("XDG_DATA_HOME").filter(|x| !x.is_empty()) {
        return PathBuf::from(xdg).join(APP_DIR);
    }
    home_dir().map_or_else(
        || PathBuf::from(".").join(format!(".{APP_DIR}")),
        |home| home.join(".local").join("share").join(APP_DIR),
    )
}

/// Expands a leading `~` to the home directory.
///
/// Paths without a leading `~`, and every path when no home is known, are
/// returned unchanged.
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    expand_tilde_in(path, home_dir().as_deref())
}

fn expand_tilde_in(path: &str, home: Option<&Path>) -> PathBuf {
    match (path, home) {
        ("~", Some(home)) => home.to_path_buf(),
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        (p, _) => PathBuf::from(p),
    }
}

/// Expands `~` and anchors relative paths under `base`.
#[must_use]
pub fn resolve_in(base: &Path, path: &str) -> PathBuf {
    let expanded = expand_tilde(path);
    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expands_leading_tilde_only() {
        let home = Path::new("/home/ada");
        assert_eq!(expand_tilde_in("~", Some(home)), PathBuf::from("/home/ada"));
        assert_eq!(
            expand_tilde_in("~/logs/app.log", Some(home)),
            PathBuf::from("/home/ada/logs/app.log")
        );
        assert_eq!(expand_tilde_in("/var/~x", Some(home)), PathBuf::from("/var/~x"));
        assert_eq!(expand_tilde_in("~other", Some(home)), PathBuf::from("~other"));
        assert_eq!(expand_tilde_in("~/x", None), PathBuf::from("~/x"));
    }

    #[test]
    fn relative_paths_anchor_under_base() {
        let base = Path::new("/data");
        assert_eq!(resolve_in(base, "app.log"), PathBuf::from("/data/app.log"));
        assert_eq!(resolve_in(base, "/tmp/app.log"), PathBuf::from("/tmp/app.log"));
    }
}
