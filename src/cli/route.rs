//! CLI route: run context and dispatch. Flag state is resolved here into
//! per-run settings; nothing downstream reads globals.

use crate::cli::parse::Cli;
use crate::cli::presentation as view;
use crate::cli::prompt;
use crate::default_alias::current_default_name;
use crate::delete::delete_tool_sections;
use crate::error::{InputError, ProvisionError};
use crate::request::ProvisioningRequest;
use crate::staging::StagingArea;
use crate::tools::{provision_tool, ToolKind, ToolSettings};
use dialoguer::Confirm;
use ini::Ini;
use tracing::info;

/// Everything one run needs, resolved from the command line.
#[derive(Debug)]
pub struct RunContext {
    tools: Vec<ToolSettings>,
    project_number: Option<u32>,
    chunksize: u32,
    url: String,
    remote_name: Option<String>,
    delete: Vec<String>,
    status: bool,
    noninteractive: bool,
    debug: bool,
    warnings: Vec<String>,
}

impl RunContext {
    pub fn from_cli(cli: &Cli) -> Result<Self, InputError> {
        let mut tools: Vec<ToolSettings> =
            ToolKind::ALL.into_iter().map(ToolSettings::new).collect();
        let mut warnings = Vec::new();

        for settings in &mut tools {
            let override_path = match settings.kind {
                ToolKind::Rclone => cli.rclone_config.as_ref(),
                ToolKind::S3cmd => cli.s3cmd_config.as_ref(),
                ToolKind::Aws => cli.aws_config.as_ref(),
            };
            if let Some(path) = override_path {
                settings.config_path = path.clone();
            }
        }

        let configure_only = normalize_list(&cli.configure_only);
        if !configure_only.is_empty() {
            for settings in &mut tools {
                settings.enabled = false;
            }
            for token in &configure_only {
                apply_to_tools(&mut tools, token, "--configure-only", |settings| {
                    settings.enabled = true
                })?;
            }
        }

        for token in &normalize_list(&cli.skip_validation) {
            apply_to_tools(&mut tools, token, "--skip-validation", |settings| {
                settings.validation_disabled = true
            })?;
        }

        for token in &normalize_list(&cli.keep_default) {
            if token == "rclone" {
                return Err(InputError::KeepDefaultRclone);
            }
            apply_to_tools(&mut tools, token, "--keep-default", |settings| {
                if settings.kind.has_default_profile() {
                    settings.no_replace = true;
                }
            })?;
        }

        let s3cmd = tools
            .iter()
            .find(|settings| settings.kind == ToolKind::S3cmd);
        if let Some(s3cmd) = s3cmd {
            if s3cmd.no_replace && !s3cmd.uses_default_path() {
                warnings.push(
                    "using --keep-default s3cmd together with --s3cmd-config has no effect"
                        .to_string(),
                );
            }
        }

        Ok(RunContext {
            tools,
            project_number: cli.project_number,
            chunksize: cli.chunksize,
            url: cli.url.clone(),
            remote_name: cli.remote_name.clone(),
            // section names are case-sensitive; only strip whitespace here
            delete: cli
                .delete
                .iter()
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .collect(),
            status: cli.status,
            noninteractive: cli.noninteractive,
            debug: cli.debug,
            warnings,
        })
    }

    /// Run the requested operation. Ok(false) means at least one tool
    /// failed; the details have already been printed.
    pub fn execute(self) -> anyhow::Result<bool> {
        for warning in &self.warnings {
            println!("{}", view::warning(warning));
        }
        if !self.delete.is_empty() {
            return self.run_delete();
        }
        if self.status {
            self.run_status();
            return Ok(true);
        }
        self.run_provision()
    }

    fn run_delete(self) -> anyhow::Result<bool> {
        println!(
            "Trying to delete the following sections: {}",
            self.delete.join(" ")
        );
        if self.noninteractive {
            println!("Using --noninteractive, assuming yes");
        } else {
            let confirmed = Confirm::new()
                .with_prompt("Do you want to continue?")
                .default(false)
                .interact()
                .map_err(InputError::Prompt)?;
            if !confirmed {
                println!("Will not continue");
                return Ok(true);
            }
        }

        let mut all_ok = true;
        for settings in self.tools.iter().filter(|settings| settings.enabled) {
            match delete_tool_sections(settings, &self.delete) {
                Ok(report) => {
                    let summary = view::delete_summary(settings.kind, &report);
                    if !summary.is_empty() {
                        println!("{summary}");
                    }
                }
                Err(e) => {
                    println!("{}", view::error_line(&e.to_string()));
                    all_ok = false;
                }
            }
        }
        Ok(all_ok)
    }

    fn run_status(self) {
        let mut rows = Vec::new();
        for settings in &self.tools {
            let path = settings.resolved_config_path();
            let loaded = Ini::load_from_file(&path).ok();
            let profiles = loaded
                .as_ref()
                .map(|ini| {
                    ini.iter()
                        .filter_map(|(name, props)| {
                            let name = name?;
                            if name == "default" {
                                return None;
                            }
                            Some(match props.get("project_id") {
                                Some(project) => format!("{name} (project {project})"),
                                None => name.to_string(),
                            })
                        })
                        .collect()
                })
                .unwrap_or_default();
            let default_profile = match (settings.kind, &loaded) {
                (_, None) => "-".to_string(),
                (ToolKind::Rclone, Some(_)) => "-".to_string(),
                // single-profile file: whatever section it holds is active
                (ToolKind::S3cmd, Some(ini)) => ini
                    .sections()
                    .flatten()
                    .next()
                    .unwrap_or("unknown")
                    .to_string(),
                (ToolKind::Aws, Some(ini)) => current_default_name(ini),
            };
            rows.push(view::StatusRow {
                tool: settings.kind,
                config_path: settings.config_path.clone(),
                profiles,
                default_profile,
            });
        }
        println!("{}", view::status_table(&rows));
    }

    fn run_provision(self) -> anyhow::Result<bool> {
        let credentials = if self.noninteractive {
            prompt::gather_noninteractive(self.project_number)?
        } else {
            println!("{}", view::AUTH_INSTRUCTIONS);
            println!("{}", view::prompting_banner());
            prompt::gather_interactive(self.project_number)?
        };
        let request = ProvisioningRequest {
            access_key: credentials.access_key,
            secret_key: credentials.secret_key,
            project_id: credentials.project_id,
            chunk_size: self.chunksize,
            url: self.url.clone(),
            remote_name: self.remote_name.clone(),
        };

        let staging = StagingArea::new(self.debug)?;
        let mut all_ok = true;
        for settings in self.tools.iter().filter(|settings| settings.enabled) {
            println!("{}", view::configuring_banner(settings.kind));
            if settings.validation_disabled {
                println!("{}\n", view::warning(view::SKIP_VALIDATION_WARNING));
            }
            match provision_tool(settings, &request, &staging) {
                Ok(receipt) => {
                    info!(tool = settings.kind.name(), "provisioning succeeded");
                    println!("{}", view::success_message(&receipt, request.project_id));
                }
                Err(e) => {
                    all_ok = false;
                    if matches!(e, ProvisionError::ValidationFailed { .. }) {
                        println!("{}", view::validation_failure_notice(settings.kind));
                        if !settings.binary_present() {
                            println!(
                                "{}",
                                view::warning(&format!(
                                    "{tool} command missing (if {tool} is a shell alias this program will not find it)",
                                    tool = settings.kind.name()
                                ))
                            );
                        }
                    }
                    println!("{}", view::error_line(&e.to_string()));
                }
            }
        }

        if let Some(dir) = staging.finish() {
            println!("\n{}", view::staging_kept_notice(&dir));
        }
        Ok(all_ok)
    }
}

fn normalize_list(raw: &[String]) -> Vec<String> {
    raw.iter()
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Apply a settings mutation to the named tool, or to all of them.
fn apply_to_tools(
    tools: &mut [ToolSettings],
    token: &str,
    flag: &'static str,
    apply: impl Fn(&mut ToolSettings),
) -> Result<(), InputError> {
    if token == "all" {
        for settings in tools.iter_mut() {
            apply(settings);
        }
        return Ok(());
    }
    match ToolKind::from_name(token) {
        Some(kind) => {
            if let Some(settings) = tools.iter_mut().find(|settings| settings.kind == kind) {
                apply(settings);
            }
            Ok(())
        }
        None => Err(InputError::UnknownToolName {
            flag,
            value: token.to_string(),
            valid: format!("all {}", ToolKind::valid_names()),
        }),
    }
}
