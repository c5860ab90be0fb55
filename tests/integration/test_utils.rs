//! Shared test utilities for integration tests
//!
//! Default tool config paths are `~`-relative, so tests that exercise them
//! point HOME at a scratch directory. The process environment is shared
//! across parallel test threads; every HOME mutation goes through one
//! mutex and restores the previous value on the way out.

use std::path::Path;
use std::sync::Mutex;

static HOME_ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Run `body` with HOME pointing at `home`, restoring the old value after.
pub fn with_home<T>(home: &Path, body: impl FnOnce() -> T) -> T {
    let _guard = HOME_ENV_MUTEX.lock().unwrap();
    let previous = std::env::var("HOME").ok();
    std::env::set_var("HOME", home);
    let result = body();
    match previous {
        Some(value) => std::env::set_var("HOME", value),
        None => std::env::remove_var("HOME"),
    }
    result
}
