//! Provisioning request data and endpoint naming rules.

use crate::error::InputError;

/// Default S3 endpoint for LUMI-O.
pub const DEFAULT_S3_URL: &str = "https://lumidata.eu";

/// Environment variable that disables project-number validation.
pub const SKIP_PROJECT_ID_ENV: &str = "LUMIO_SKIP_PROJID";

/// One tool-independent provisioning request: the credentials and endpoint
/// details every tool's section set is derived from. Produced by the CLI
/// layer, consumed by the engine.
#[derive(Debug, Clone)]
pub struct ProvisioningRequest {
    pub access_key: String,
    pub secret_key: String,
    pub project_id: u32,
    pub chunk_size: u32,
    pub url: String,
    /// Custom endpoint name replacing the generated `lumi-<project>` stem.
    pub remote_name: Option<String>,
}

impl ProvisioningRequest {
    /// Endpoint name shared by s3cmd and aws: `lumi-<project>` unless a
    /// custom name was supplied.
    pub fn generic_remote_name(&self) -> String {
        match &self.remote_name {
            Some(name) => name.clone(),
            None => format!("lumi-{}", self.project_id),
        }
    }

    /// rclone remote for private-ACL uploads.
    pub fn rclone_private_remote_name(&self) -> String {
        match &self.remote_name {
            Some(name) => name.clone(),
            None => format!("lumi-{}-private", self.project_id),
        }
    }

    /// rclone remote for public-ACL uploads. A custom name gains a
    /// `-public` suffix so the two remotes stay distinct.
    pub fn rclone_public_remote_name(&self) -> String {
        match &self.remote_name {
            Some(name) => format!("{name}-public"),
            None => format!("lumi-{}-public", self.project_id),
        }
    }
}

/// Validate a LUMI project number: exactly 9 digits, prefix 462 or 465.
///
/// The check exists to make the user look at which project they are
/// generating access for, not to authorize anything; setting
/// `LUMIO_SKIP_PROJID` bypasses it.
pub fn validate_project_id(id: u32) -> Result<(), InputError> {
    if std::env::var_os(SKIP_PROJECT_ID_ENV).is_some() {
        return Ok(());
    }
    let digits = id.checked_ilog10().map_or(1, |n| n + 1);
    let prefix = id / 1_000_000;
    if digits == 9 && (prefix == 462 || prefix == 465) {
        Ok(())
    } else {
        Err(InputError::InvalidProjectId(id))
    }
}
