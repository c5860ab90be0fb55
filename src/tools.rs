//! Tool registry: the closed set of client tools this program can
//! configure, their per-run settings and the dispatch into each tool's
//! provisioning routine.

use crate::error::ProvisionError;
use crate::merge::{Exclusivity, MergePolicy};
use crate::paths::expand_tilde;
use crate::request::ProvisioningRequest;
use crate::staging::StagingArea;
use std::path::PathBuf;

pub mod aws;
pub mod rclone;
pub mod s3cmd;

/// The tools we know how to configure. A closed set: every variant
/// implements the same stage→merge→validate→commit contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Rclone,
    S3cmd,
    Aws,
}

impl ToolKind {
    pub const ALL: [ToolKind; 3] = [ToolKind::Rclone, ToolKind::S3cmd, ToolKind::Aws];

    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Rclone => "rclone",
            ToolKind::S3cmd => "s3cmd",
            ToolKind::Aws => "aws",
        }
    }

    pub fn from_name(name: &str) -> Option<ToolKind> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Space-separated list of valid tool names, for flag error messages.
    pub fn valid_names() -> String {
        Self::ALL
            .iter()
            .map(|kind| kind.name())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn default_config_path(self) -> &'static str {
        match self {
            ToolKind::Rclone => "~/.config/rclone/rclone.conf",
            ToolKind::S3cmd => "~/.s3cfg",
            ToolKind::Aws => "~/.aws/credentials",
        }
    }

    /// aws is opt-in via --configure-only; the other two are configured by
    /// default.
    pub fn enabled_by_default(self) -> bool {
        !matches!(self, ToolKind::Aws)
    }

    /// Whether the tool picks an active profile by a fixed default, making
    /// --keep-default meaningful. rclone remotes are always addressed by
    /// name.
    pub fn has_default_profile(self) -> bool {
        !matches!(self, ToolKind::Rclone)
    }

    /// Canonical merge policy per tool: key-level merges everywhere;
    /// s3cmd config files hold exactly one logical profile.
    pub fn merge_policy(self) -> MergePolicy {
        match self {
            ToolKind::S3cmd => MergePolicy::careful(Exclusivity::ExclusiveSingleProfile),
            ToolKind::Rclone | ToolKind::Aws => MergePolicy::careful(Exclusivity::Additive),
        }
    }
}

/// Per-run settings for one tool, resolved from flags. Plain data passed
/// into each call; nothing here is global.
#[derive(Debug, Clone)]
pub struct ToolSettings {
    pub kind: ToolKind,
    /// Possibly `~`-relative path to the tool's config file.
    pub config_path: String,
    pub enabled: bool,
    pub validation_disabled: bool,
    /// Keep the tool's existing default profile untouched.
    pub no_replace: bool,
}

impl ToolSettings {
    pub fn new(kind: ToolKind) -> Self {
        ToolSettings {
            kind,
            config_path: kind.default_config_path().to_string(),
            enabled: kind.enabled_by_default(),
            validation_disabled: false,
            no_replace: false,
        }
    }

    pub fn resolved_config_path(&self) -> PathBuf {
        expand_tilde(&self.config_path)
    }

    /// Whether the config path was left at the tool's system default.
    pub fn uses_default_path(&self) -> bool {
        self.config_path == self.kind.default_config_path()
    }

    /// Whether the tool's binary is on PATH. Only used to sharpen failure
    /// messages; a shell alias will not be found.
    pub fn binary_present(&self) -> bool {
        which::which(self.kind.name()).is_ok()
    }
}

/// Facts about a successful provisioning, for user-facing reporting.
#[derive(Debug)]
pub struct ProvisionReceipt {
    pub kind: ToolKind,
    pub remote_name: String,
    pub config_path: PathBuf,
    /// Versioned copy the s3cmd config was also saved to.
    pub saved_copy: Option<PathBuf>,
    /// Whether the tool's default now points at the new profile.
    pub default_replaced: bool,
    /// Current default profile when the default was kept.
    pub kept_default: Option<String>,
}

/// Provision one tool. Failures are isolated per tool; the caller decides
/// whether and how to continue with the rest of the run.
pub fn provision_tool(
    settings: &ToolSettings,
    request: &ProvisioningRequest,
    staging: &StagingArea,
) -> Result<ProvisionReceipt, ProvisionError> {
    match settings.kind {
        ToolKind::Rclone => rclone::provision(settings, request, staging),
        ToolKind::S3cmd => s3cmd::provision(settings, request, staging),
        ToolKind::Aws => aws::provision(settings, request, staging),
    }
}
