//! Path utilities for locating the engine's data directory.
//!
//! The engine keeps no session state on disk; the data directory only holds
//! trace exports written by the observability layer.

use std::path::PathBuf;

/// Application directory name under the platform data directory.
const APP_DIR: &str = "scrolldex";

/// Returns the data directory used for trace files.
///
/// Resolution order:
/// 1. `$XDG_DATA_HOME/scrolldex`
/// 2. `$HOME/.local/share/scrolldex`
/// 3. `<temp dir>/scrolldex`
#[must_use]
pub fn get_data_dir() -> PathBuf {
    if let Some(xdg) = std::env::var_os("XDG_DATA_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(xdg).join(APP_DIR);
    }
    if let Some(home) = std::env::var_os("HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(home).join(".local").join("share").join(APP_DIR);
    }
    std::env::temp_dir().join(APP_DIR)
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading tilde, or when `HOME` is unset, are returned
/// unchanged.
///
/// # Examples
///
/// ```
/// use scrolldex::infrastructure::expand_tilde;
///
/// assert_eq!(expand_tilde("/absolute/path"), "/absolute/path");
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> String {
    let Some(home) = std::env::var_os("HOME") else {
        return path.to_string();
    };
    let home = home.to_string_lossy();

    if path == "~" {
        home.into_owned()
    } else if let Some(rest) = path.strip_prefix("~/") {
        format!("{}/{rest}", home.trim_end_matches('/'))
    } else {
        path.to_string()
    }
}
