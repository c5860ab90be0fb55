//! Section deletion across tools, with the `default` alias cascade and
//! per-tool companion cleanup. Deletion removes data, so it edits the real
//! files directly; the CLI layer has already asked for confirmation by the
//! time this runs.

use crate::default_alias::{clear_default_if_points_to, AliasCleanup};
use crate::error::ProvisionError;
use crate::metadata::ServiceMetadataFile;
use crate::tools::{aws, s3cmd, ToolKind, ToolSettings};
use ini::Ini;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// What happened while deleting sections from one tool's configuration.
#[derive(Debug, Default)]
pub struct DeleteReport {
    pub file: PathBuf,
    pub deleted: Vec<String>,
    pub missing: Vec<String>,
    /// The default alias pointed at a deleted section and went with it.
    pub alias_removed: bool,
    /// A default alias exists but its target could not be determined.
    pub alias_unreadable: bool,
    /// Companion files removed alongside (s3cmd versioned copies).
    pub removed_files: Vec<PathBuf>,
    /// Service metadata sections removed (aws).
    pub metadata_deleted: Vec<String>,
}

/// Delete the named sections from one tool's config file. Missing sections
/// are warnings, not errors; a malformed file aborts this tool only.
pub fn delete_tool_sections(
    settings: &ToolSettings,
    names: &[String],
) -> Result<DeleteReport, ProvisionError> {
    let path = settings.resolved_config_path();
    let mut report = DeleteReport {
        file: path.clone(),
        ..DeleteReport::default()
    };

    if path.exists() {
        let mut ini = match Ini::load_from_file(&path) {
            Ok(ini) => ini,
            Err(ini::Error::Io(e)) => {
                return Err(ProvisionError::io(
                    format!("failed reading {}", path.display()),
                    e,
                ))
            }
            Err(ini::Error::Parse(e)) => {
                return Err(ProvisionError::ConfigMalformed {
                    path,
                    cause: e.to_string(),
                })
            }
        };

        for name in names {
            if ini.delete(Some(name.as_str())).is_some() {
                report.deleted.push(name.clone());
                match clear_default_if_points_to(&mut ini, name) {
                    AliasCleanup::Removed => report.alias_removed = true,
                    AliasCleanup::Unreadable => report.alias_unreadable = true,
                    AliasCleanup::Unrelated | AliasCleanup::NotPresent => {}
                }
            } else {
                report.missing.push(name.clone());
            }
        }

        if !report.deleted.is_empty() {
            ini.write_to_file(&path).map_err(|e| {
                ProvisionError::io(format!("failed writing {}", path.display()), e)
            })?;
            info!(file = %path.display(), deleted = ?report.deleted, "deleted config sections");
        }
    } else {
        report.missing.extend(names.iter().cloned());
    }

    match settings.kind {
        ToolKind::S3cmd => delete_versioned_copies(settings, names, &mut report)?,
        ToolKind::Aws => delete_service_metadata(settings, names, &mut report)?,
        ToolKind::Rclone => {}
    }

    Ok(report)
}

/// The default s3cmd layout keeps a `~/.s3cfg-<profile>` copy per
/// generated profile; deleting the profile removes the copy too.
fn delete_versioned_copies(
    settings: &ToolSettings,
    names: &[String],
    report: &mut DeleteReport,
) -> Result<(), ProvisionError> {
    if !settings.uses_default_path() {
        return Ok(());
    }
    let base = settings.resolved_config_path();
    for name in names {
        let copy = s3cmd::versioned_copy_path(&base, name);
        if copy.exists() {
            fs::remove_file(&copy).map_err(|e| {
                ProvisionError::io(format!("failed removing {}", copy.display()), e)
            })?;
            report.removed_files.push(copy);
        }
    }
    Ok(())
}

fn delete_service_metadata(
    settings: &ToolSettings,
    names: &[String],
    report: &mut DeleteReport,
) -> Result<(), ProvisionError> {
    let metadata_path = aws::metadata_file_path(
        &settings.resolved_config_path(),
        settings.uses_default_path(),
    );
    if !metadata_path.exists() {
        return Ok(());
    }
    let mut model = ServiceMetadataFile::load(&metadata_path)?;
    for name in names {
        let section = aws::service_section_name(name);
        if model.delete_section(&section) {
            report.metadata_deleted.push(section);
        }
    }
    if !report.metadata_deleted.is_empty() {
        model.save(&metadata_path)?;
    }
    Ok(())
}
