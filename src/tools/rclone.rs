//! rclone: two remotes per request (private and public ACL), merged
//! additively into the shared rclone config.

use crate::error::ProvisionError;
use crate::provision::{provision as run_plan, ProvisionPlan};
use crate::request::ProvisioningRequest;
use crate::staging::StagingArea;
use crate::tools::{ProvisionReceipt, ToolSettings};
use crate::validate::CommandSpec;
use ini::Ini;
use std::path::Path;

const SCRATCH_NAME: &str = "temp_rclone.config";

pub fn provision(
    settings: &ToolSettings,
    request: &ProvisioningRequest,
    staging: &StagingArea,
) -> Result<ProvisionReceipt, ProvisionError> {
    let config_path = settings.resolved_config_path();
    let remote_name = request.rclone_private_remote_name();
    let plan = ProvisionPlan {
        tool: "rclone".to_string(),
        remote_name: remote_name.clone(),
        real_path: config_path.clone(),
        scratch_name: SCRATCH_NAME.to_string(),
        sections: sections(request),
        policy: settings.kind.merge_policy(),
        set_default_for: None,
        validation: validation(&staging.scratch_path(SCRATCH_NAME), &remote_name),
        skip_validation: settings.validation_disabled,
        commit_paths: vec![config_path.clone()],
        metadata: None,
    };
    run_plan(&plan, staging)?;
    Ok(ProvisionReceipt {
        kind: settings.kind,
        remote_name,
        config_path,
        saved_copy: None,
        default_replaced: false,
        kept_default: None,
    })
}

fn sections(request: &ProvisioningRequest) -> Ini {
    let mut ini = Ini::new();
    for (remote, acl) in [
        (request.rclone_private_remote_name(), "private"),
        (request.rclone_public_remote_name(), "public"),
    ] {
        ini.with_section(Some(remote.as_str()))
            .set("type", "s3")
            .set("provider", "Ceph")
            .set("env_auth", "false")
            .set("project_id", request.project_id.to_string())
            .set("access_key_id", request.access_key.as_str())
            .set("secret_access_key", request.secret_key.as_str())
            .set("endpoint", request.url.as_str())
            .set("acl", acl);
    }
    ini
}

/// List the remote's top level with tight timeouts; an unreachable or
/// misconfigured endpoint fails in seconds instead of hanging the run.
fn validation(scratch: &Path, remote_name: &str) -> CommandSpec {
    CommandSpec::new("rclone")
        .env("RCLONE_CONFIG", scratch.display().to_string())
        .arg("lsd")
        .arg("--contimeout")
        .arg("2s")
        .arg("--timeout")
        .arg("2s")
        .arg("--low-level-retries")
        .arg("1")
        .arg("--retries")
        .arg("1")
        .arg(format!("{remote_name}:"))
}
