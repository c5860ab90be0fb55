//! aws CLI: profile credentials in one file, per-profile service endpoint
//! metadata in a second. Both are staged and validated together; the
//! credentials file commits first and a metadata commit failure afterwards
//! is surfaced as an inconsistent (but diagnosable) state.

use crate::default_alias::current_default_name;
use crate::error::ProvisionError;
use crate::provision::{provision as run_plan, MetadataPlan, ProvisionPlan};
use crate::request::ProvisioningRequest;
use crate::staging::StagingArea;
use crate::tools::{ProvisionReceipt, ToolSettings};
use crate::validate::CommandSpec;
use ini::Ini;
use std::path::{Path, PathBuf};

const SCRATCH_CREDENTIALS: &str = "temp_aws.credentials";
const SCRATCH_METADATA: &str = "temp_aws.config";

/// Overrides the derived metadata file location for non-default
/// credentials paths.
pub const CONFIG_PATH_ENV: &str = "LUMIO_AWS_CONFIG_FILE_PATH";

pub fn provision(
    settings: &ToolSettings,
    request: &ProvisioningRequest,
    staging: &StagingArea,
) -> Result<ProvisionReceipt, ProvisionError> {
    let credentials_path = settings.resolved_config_path();
    let metadata_path = metadata_file_path(&credentials_path, settings.uses_default_path());
    let remote_name = request.generic_remote_name();

    let plan = ProvisionPlan {
        tool: "aws".to_string(),
        remote_name: remote_name.clone(),
        real_path: credentials_path.clone(),
        scratch_name: SCRATCH_CREDENTIALS.to_string(),
        sections: sections(request),
        policy: settings.kind.merge_policy(),
        set_default_for: (!settings.no_replace).then(|| remote_name.clone()),
        validation: validation(
            &staging.scratch_path(SCRATCH_CREDENTIALS),
            &staging.scratch_path(SCRATCH_METADATA),
            &remote_name,
        ),
        skip_validation: settings.validation_disabled,
        commit_paths: vec![credentials_path.clone()],
        metadata: Some(MetadataPlan {
            real_path: metadata_path,
            scratch_name: SCRATCH_METADATA.to_string(),
            section_name: service_section_name(&remote_name),
            body: metadata_body(request),
        }),
    };
    run_plan(&plan, staging)?;

    let kept_default = settings
        .no_replace
        .then(|| {
            Ini::load_from_file(&credentials_path)
                .ok()
                .map(|ini| current_default_name(&ini))
        })
        .flatten();

    Ok(ProvisionReceipt {
        kind: settings.kind,
        remote_name,
        config_path: credentials_path,
        saved_copy: None,
        default_replaced: !settings.no_replace,
        kept_default,
    })
}

/// Name of the metadata section tied to a profile.
pub fn service_section_name(remote_name: &str) -> String {
    format!("services {remote_name}")
}

/// Where the service metadata lives. Next to the default credentials file
/// it is the vendor's own `config`; next to a custom credentials file it
/// gets a clearer name (or the env override) to avoid confusion.
pub fn metadata_file_path(credentials_path: &Path, uses_default_path: bool) -> PathBuf {
    let dir = credentials_path.parent().unwrap_or(Path::new("."));
    if uses_default_path {
        dir.join("config")
    } else if let Some(custom) = std::env::var_os(CONFIG_PATH_ENV) {
        PathBuf::from(custom)
    } else {
        dir.join("aws-config")
    }
}

fn sections(request: &ProvisioningRequest) -> Ini {
    let mut ini = Ini::new();
    ini.with_section(Some(request.generic_remote_name().as_str()))
        .set("aws_access_key_id", request.access_key.as_str())
        .set("aws_secret_access_key", request.secret_key.as_str())
        .set("services", request.generic_remote_name())
        .set("project_id", request.project_id.to_string());
    ini
}

/// Nested service block the vendor CLI expects; the indentation is
/// significant to its parser.
fn metadata_body(request: &ProvisioningRequest) -> String {
    format!(
        "s3 =\n  endpoint_url = {}\n  multipart_chunksize = {}\n",
        request.url, request.chunk_size
    )
}

fn validation(credentials_scratch: &Path, metadata_scratch: &Path, remote_name: &str) -> CommandSpec {
    CommandSpec::new("aws")
        .env(
            "AWS_SHARED_CREDENTIALS_FILE",
            credentials_scratch.display().to_string(),
        )
        .env("AWS_CONFIG_FILE", metadata_scratch.display().to_string())
        .arg("s3")
        .arg("ls")
        .arg("--profile")
        .arg(remote_name)
        .arg("--cli-read-timeout")
        .arg("2")
        .arg("--cli-connect-timeout")
        .arg("2")
}

/// Serializes tests that read or write `LUMIO_AWS_CONFIG_FILE_PATH`; the
/// process environment is shared across parallel test threads.
#[cfg(test)]
pub(crate) static CONFIG_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
