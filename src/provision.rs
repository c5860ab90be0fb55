//! The provisioning engine: stage, merge, validate, commit.
//!
//! One `ProvisionPlan` describes everything needed to reconcile one tool's
//! config file(s): the proposed sections, the merge policy, the validation
//! command and the commit targets. The engine never touches a real file
//! until validation has passed on the scratch copy.

use crate::default_alias::set_default;
use crate::error::ProvisionError;
use crate::merge::{merge_sections, MergePolicy};
use crate::metadata::ServiceMetadataFile;
use crate::staging::{self, StagingArea};
use crate::validate::{validate, CommandSpec};
use ini::Ini;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Second commit target for tools that split profile data and service
/// metadata across two files. Staged and committed separately; the profile
/// file always commits first.
#[derive(Debug, Clone)]
pub struct MetadataPlan {
    pub real_path: PathBuf,
    pub scratch_name: String,
    pub section_name: String,
    pub body: String,
}

/// Everything needed to provision one tool's configuration.
pub struct ProvisionPlan {
    /// Tool name for diagnostics.
    pub tool: String,
    /// Profile/endpoint section the validation runs against.
    pub remote_name: String,
    /// The real config file the scratch copy is seeded from.
    pub real_path: PathBuf,
    pub scratch_name: String,
    /// Proposed section set for this request.
    pub sections: Ini,
    pub policy: MergePolicy,
    /// When set, overwrite the `default` alias to mirror this profile.
    pub set_default_for: Option<String>,
    pub validation: CommandSpec,
    pub skip_validation: bool,
    /// Files the validated scratch config is committed to, in order.
    /// Usually just `real_path`; the sync-to-several-paths case is the
    /// s3cmd default-plus-versioned-copy layout.
    pub commit_paths: Vec<PathBuf>,
    pub metadata: Option<MetadataPlan>,
}

/// Run the full sequence for one plan. On any failure nothing has been
/// committed, with one documented exception: a metadata commit failing
/// after the profile commit surfaces as `InconsistentState`.
pub fn provision(plan: &ProvisionPlan, staging: &StagingArea) -> Result<(), ProvisionError> {
    let scratch = staging.stage(&plan.real_path, &plan.scratch_name)?;
    let existing = load_sections(&scratch, &plan.real_path)?;
    let mut merged = merge_sections(&existing, &plan.sections, plan.policy);
    if let Some(profile) = &plan.set_default_for {
        set_default(&mut merged, profile);
    }
    merged.write_to_file(&scratch).map_err(|e| {
        ProvisionError::io(format!("failed writing scratch config {}", scratch.display()), e)
    })?;

    let meta_scratch = match &plan.metadata {
        Some(meta) => {
            let meta_scratch = staging.stage(&meta.real_path, &meta.scratch_name)?;
            let mut model = ServiceMetadataFile::load(&meta_scratch)?;
            model.upsert_section(&meta.section_name, &meta.body);
            model.save(&meta_scratch)?;
            Some(meta_scratch)
        }
        None => None,
    };

    validate(
        &plan.validation,
        &plan.tool,
        &plan.remote_name,
        plan.skip_validation,
    )?;
    debug!(tool = %plan.tool, remote = %plan.remote_name, "validation passed");

    for target in &plan.commit_paths {
        staging::commit(&scratch, target)?;
    }

    if let (Some(meta), Some(meta_scratch)) = (&plan.metadata, &meta_scratch) {
        staging::commit(meta_scratch, &meta.real_path).map_err(|e| {
            ProvisionError::InconsistentState {
                profile_path: plan
                    .commit_paths
                    .first()
                    .cloned()
                    .unwrap_or_else(|| plan.real_path.clone()),
                metadata_path: meta.real_path.clone(),
                cause: e.to_string(),
            }
        })?;
    }

    info!(tool = %plan.tool, remote = %plan.remote_name, "endpoint provisioned");
    Ok(())
}

/// Load a scratch config as a section set. Parse failures report the real
/// file the scratch was seeded from; that is the file the user must fix.
fn load_sections(scratch: &Path, real_path: &Path) -> Result<Ini, ProvisionError> {
    match Ini::load_from_file(scratch) {
        Ok(ini) => Ok(ini),
        Err(ini::Error::Io(e)) => Err(ProvisionError::io(
            format!("failed reading scratch config {}", scratch.display()),
            e,
        )),
        Err(ini::Error::Parse(e)) => Err(ProvisionError::ConfigMalformed {
            path: real_path.to_path_buf(),
            cause: e.to_string(),
        }),
    }
}
