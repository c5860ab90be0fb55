//! s3cmd: single-profile config files. The generated profile always lands
//! in a versioned `~/.s3cfg-<profile>` copy; `~/.s3cfg` itself is only
//! overwritten when the user has not asked to keep their current default.

use crate::error::ProvisionError;
use crate::provision::{provision as run_plan, ProvisionPlan};
use crate::request::ProvisioningRequest;
use crate::staging::StagingArea;
use crate::tools::{ProvisionReceipt, ToolSettings};
use crate::validate::CommandSpec;
use ini::Ini;
use std::path::{Path, PathBuf};

const SCRATCH_NAME: &str = "temp_s3cmd.config";

pub fn provision(
    settings: &ToolSettings,
    request: &ProvisioningRequest,
    staging: &StagingArea,
) -> Result<ProvisionReceipt, ProvisionError> {
    let base_path = settings.resolved_config_path();
    let remote_name = request.generic_remote_name();

    let mut commit_paths = Vec::new();
    let mut saved_copy = None;
    if settings.uses_default_path() {
        // Pseudo-defaults only make sense at the system default location.
        let copy = versioned_copy_path(&base_path, &remote_name);
        commit_paths.push(copy.clone());
        saved_copy = Some(copy);
        if !settings.no_replace {
            commit_paths.push(base_path.clone());
        }
    } else {
        commit_paths.push(base_path.clone());
    }

    let plan = ProvisionPlan {
        tool: "s3cmd".to_string(),
        remote_name: remote_name.clone(),
        real_path: base_path.clone(),
        scratch_name: SCRATCH_NAME.to_string(),
        sections: sections(request),
        policy: settings.kind.merge_policy(),
        set_default_for: None,
        validation: validation(&staging.scratch_path(SCRATCH_NAME)),
        skip_validation: settings.validation_disabled,
        commit_paths,
        metadata: None,
    };
    run_plan(&plan, staging)?;

    let kept_default = if settings.no_replace && settings.uses_default_path() {
        current_default(&base_path)
    } else {
        None
    };

    Ok(ProvisionReceipt {
        kind: settings.kind,
        remote_name,
        config_path: base_path,
        saved_copy,
        default_replaced: !settings.no_replace && settings.uses_default_path(),
        kept_default,
    })
}

/// `~/.s3cfg-<profile>`: the per-profile companion file the default config
/// layout keeps for every generated endpoint.
pub fn versioned_copy_path(base_path: &Path, remote_name: &str) -> PathBuf {
    PathBuf::from(format!("{}-{}", base_path.display(), remote_name))
}

fn sections(request: &ProvisioningRequest) -> Ini {
    let mut ini = Ini::new();
    ini.with_section(Some(request.generic_remote_name().as_str()))
        .set("access_key", request.access_key.as_str())
        .set("secret_key", request.secret_key.as_str())
        .set("host_base", request.url.as_str())
        .set("host_bucket", request.url.as_str())
        .set("human_readable_sizes", "True")
        .set("project_id", request.project_id.to_string())
        .set("enable_multipart", "True")
        .set("signature_v2", "True")
        .set("use_https", "True")
        .set("chunk_size", request.chunk_size.to_string());
    ini
}

fn validation(scratch: &Path) -> CommandSpec {
    CommandSpec::new("s3cmd")
        .arg("-c")
        .arg(scratch.display().to_string())
        .arg("ls")
        .arg("s3:")
}

/// The profile an untouched `~/.s3cfg` currently holds: its first section
/// name, since the file is single-profile.
fn current_default(base_path: &Path) -> Option<String> {
    let ini = Ini::load_from_file(base_path).ok()?;
    let first = ini.sections().flatten().next().map(str::to_string);
    first
}
