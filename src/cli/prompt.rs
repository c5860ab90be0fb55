//! Credential input: interactive prompts or environment variables.

use crate::error::InputError;
use crate::request::validate_project_id;
use dialoguer::{Input, Password};

pub const PROJECT_ID_ENV: &str = "LUMIO_PROJECTID";
pub const ACCESS_KEY_ENV: &str = "LUMIO_S3_ACCESS";
pub const SECRET_KEY_ENV: &str = "LUMIO_S3_SECRET";

/// Validated credentials, ready to be folded into a provisioning request.
pub struct CredentialInput {
    pub project_id: u32,
    pub access_key: String,
    pub secret_key: String,
}

/// Prompt on the terminal. Keys are read without echo and trimmed; pasted
/// input tends to carry stray whitespace.
pub fn gather_interactive(project_flag: Option<u32>) -> Result<CredentialInput, InputError> {
    let project_id = match project_flag {
        Some(id) => id,
        None => {
            let raw: String = Input::new()
                .with_prompt("LUMI project number")
                .interact_text()?;
            raw.trim()
                .parse()
                .map_err(|_| InputError::UnreadableProjectId("LUMI project number".to_string()))?
        }
    };
    validate_project_id(project_id)?;

    let access_key = Password::new().with_prompt("Access key").interact()?;
    let secret_key = Password::new().with_prompt("Secret key").interact()?;
    Ok(CredentialInput {
        project_id,
        access_key: access_key.trim().to_string(),
        secret_key: secret_key.trim().to_string(),
    })
}

/// Read everything from the environment; used by scripts and batch jobs.
pub fn gather_noninteractive(project_flag: Option<u32>) -> Result<CredentialInput, InputError> {
    let project_id = match project_flag {
        Some(id) => id,
        None => match std::env::var(PROJECT_ID_ENV) {
            Ok(raw) => raw
                .trim()
                .parse()
                .map_err(|_| InputError::NonNumericEnv(PROJECT_ID_ENV))?,
            Err(_) => return Err(InputError::MissingProjectId),
        },
    };
    validate_project_id(project_id)?;

    match (
        std::env::var(ACCESS_KEY_ENV),
        std::env::var(SECRET_KEY_ENV),
    ) {
        (Ok(access_key), Ok(secret_key)) => Ok(CredentialInput {
            project_id,
            access_key: access_key.trim().to_string(),
            secret_key: secret_key.trim().to_string(),
        }),
        _ => Err(InputError::MissingCredentialEnv),
    }
}
