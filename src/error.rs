//! Error types for credential provisioning.

use std::path::PathBuf;
use thiserror::Error;

/// Failures raised while provisioning one tool's configuration.
///
/// Each tool is provisioned independently; a `ProvisionError` for one tool
/// never aborts the others in the same run.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// The external validation command exited non-zero or timed out.
    /// Nothing was committed.
    #[error("validation of the {tool} endpoint {remote} failed\n{diagnostic}")]
    ValidationFailed {
        tool: String,
        remote: String,
        diagnostic: String,
    },

    /// Staging, commit or other file I/O failed. The real config file is
    /// only ever touched by the final commit write.
    #[error("{context}: {source}")]
    IoFailure {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// The profile file was committed but the service metadata file was not.
    /// The configuration is live but incomplete; both paths are reported so
    /// the user can reconcile by hand.
    #[error(
        "profile file {} was updated but the service metadata file {} was not: {}",
        .profile_path.display(),
        .metadata_path.display(),
        .cause
    )]
    InconsistentState {
        profile_path: PathBuf,
        metadata_path: PathBuf,
        cause: String,
    },

    /// An existing config file could not be parsed as the structured format.
    #[error("existing configuration {} could not be parsed: {}", .path.display(), .cause)]
    ConfigMalformed { path: PathBuf, cause: String },
}

impl ProvisionError {
    /// Wrap an I/O error with a description of the operation that failed.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        ProvisionError::IoFailure {
            context: context.into(),
            source,
        }
    }
}

/// Invalid input from flags, prompts or the environment. Raised before any
/// provisioning starts.
#[derive(Debug, Error)]
pub enum InputError {
    #[error(
        "invalid LUMI project number ( {0} ), valid project numbers start with \
         either 462 or 465 and contain 9 digits e.g 465000001"
    )]
    InvalidProjectId(u32),

    #[error("failed to read {0}, make sure there are only numbers in the input")]
    UnreadableProjectId(String),

    #[error("{0} needs to be a number")]
    NonNumericEnv(&'static str),

    #[error("unknown option {value} for {flag}. Valid options are: {valid}")]
    UnknownToolName {
        flag: &'static str,
        value: String,
        valid: String,
    },

    #[error("specifying rclone for --keep-default does not make sense as rclone does not have a default remote")]
    KeepDefaultRclone,

    #[error("--noninteractive flag used, but neither the --project-number flag nor the LUMIO_PROJECTID environment variable is set")]
    MissingProjectId,

    #[error("both LUMIO_S3_ACCESS and LUMIO_S3_SECRET need to be set when running in noninteractive mode")]
    MissingCredentialEnv,

    #[error("failed to read user input: {0}")]
    Prompt(#[from] dialoguer::Error),
}
