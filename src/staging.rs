//! Staging area for scratch config files.
//!
//! Every provisioning attempt mutates a scratch copy of the target config
//! file inside a per-run temporary directory; only after validation passes
//! is the scratch file copied over the real one. The commit is a plain
//! copy-over, not a rename swap — it is only ever reached after a
//! successful validation, which keeps the half-written window irrelevant in
//! practice.

use crate::error::ProvisionError;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::debug;

/// Per-run staging directory holding one scratch file per tool/config file.
pub struct StagingArea {
    dir: TempDir,
    keep: bool,
}

impl StagingArea {
    /// Create the run's staging directory under `$TMPDIR/<user>/` (or
    /// `/tmp/<user>/`), mode 0700, with a random `lumio-temp-` suffix.
    ///
    /// With `keep` set the directory survives the run for inspection.
    pub fn new(keep: bool) -> Result<Self, ProvisionError> {
        let base = staging_base();
        fs::create_dir_all(&base)
            .map_err(|e| ProvisionError::io(format!("failed creating {}", base.display()), e))?;
        restrict_dir_permissions(&base)?;

        let dir = tempfile::Builder::new()
            .prefix("lumio-temp-")
            .tempdir_in(&base)
            .map_err(|e| {
                ProvisionError::io(format!("failed creating staging dir in {}", base.display()), e)
            })?;
        restrict_dir_permissions(dir.path())?;
        debug!(staging_dir = %dir.path().display(), "created staging directory");
        Ok(StagingArea { dir, keep })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Where a scratch file with the given name will live.
    pub fn scratch_path(&self, scratch_name: &str) -> PathBuf {
        self.dir.path().join(scratch_name)
    }

    /// Seed a scratch file from the real config file. A missing real file
    /// means first-time configuration and yields an empty scratch file.
    /// The scratch file is owner-read/write only.
    pub fn stage(&self, real_path: &Path, scratch_name: &str) -> Result<PathBuf, ProvisionError> {
        let scratch = self.scratch_path(scratch_name);
        let data = match fs::read(real_path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(ProvisionError::io(
                    format!("failed reading {}", real_path.display()),
                    e,
                ))
            }
        };
        write_owner_only(&scratch, &data)
            .map_err(|e| ProvisionError::io(format!("failed staging {}", scratch.display()), e))?;
        Ok(scratch)
    }

    /// Drop or keep the staging directory. Returns the path when kept.
    pub fn finish(self) -> Option<PathBuf> {
        if self.keep {
            Some(self.dir.into_path())
        } else {
            None
        }
    }
}

/// Copy a validated scratch file over the real config file, creating the
/// parent directory (0700) and the file itself (0600) when missing.
///
/// Failures before the final write leave the real file untouched.
pub fn commit(scratch_path: &Path, real_path: &Path) -> Result<(), ProvisionError> {
    let data = fs::read(scratch_path).map_err(|e| {
        ProvisionError::io(
            format!("failed reading temporary config {}", scratch_path.display()),
            e,
        )
    })?;

    if let Some(parent) = real_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                ProvisionError::io(format!("failed creating {}", parent.display()), e)
            })?;
            restrict_dir_permissions(parent)?;
        }
    }

    write_owner_only(real_path, &data).map_err(|e| {
        ProvisionError::io(format!("failed writing new config {}", real_path.display()), e)
    })?;
    debug!(path = %real_path.display(), "committed config file");
    Ok(())
}

fn staging_base() -> PathBuf {
    let user = std::env::var("USER")
        .or_else(|_| std::env::var("LOGNAME"))
        .unwrap_or_else(|_| "nouser".to_string());
    std::env::temp_dir().join(user)
}

/// Truncate-write `data` to `path` in a single write call. A newly created
/// file ends up owner-read/write only; an existing file keeps its mode.
fn write_owner_only(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let existed = path.exists();
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    #[cfg(unix)]
    if !existed {
        use std::os::unix::fs::PermissionsExt;
        // mode() at open time is filtered through the umask; make it exact.
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(data)
}

fn restrict_dir_permissions(path: &Path) -> Result<(), ProvisionError> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o700)).map_err(|e| {
            ProvisionError::io(format!("failed restricting {}", path.display()), e)
        })?;
    }
    #[cfg(not(unix))]
    let _ = path;
    Ok(())
}
