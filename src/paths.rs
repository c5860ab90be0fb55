//! Path resolution for tool config files.

use directories::BaseDirs;
use std::path::PathBuf;

/// Expand a leading `~` to the invoking user's home directory.
///
/// Paths without a leading `~` are returned unchanged, as is everything when
/// no home directory can be determined.
pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(base) = BaseDirs::new() {
            return base.home_dir().join(rest);
        }
    } else if path == "~" {
        if let Some(base) = BaseDirs::new() {
            return base.home_dir().to_path_buf();
        }
    }
    PathBuf::from(path)
}
