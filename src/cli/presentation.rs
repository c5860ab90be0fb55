//! CLI presentation: user-facing text, kept out of the routing logic.

use crate::delete::DeleteReport;
use crate::tools::{ProvisionReceipt, ToolKind};
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use owo_colors::OwoColorize;
use std::path::Path;

pub const AUTH_INSTRUCTIONS: &str = "\
Please login to  https://auth.lumidata.eu/
In the web interface, choose first the project you wish to use.
Next generate a new key or use existing valid key
Open the Key details view and based on that give following information";

pub const SKIP_VALIDATION_WARNING: &str = "\
The --skip-validation flag was used, configurations will not be validated \
and could potentially be saved in an invalid state if user input is incorrect";

pub fn warning(message: &str) -> String {
    format!("{} {message}", "WARNING:".yellow().bold())
}

pub fn error_line(message: &str) -> String {
    format!("{} {message}", "ERROR:".red().bold())
}

pub fn configuring_banner(tool: ToolKind) -> String {
    format!(
        "\n=========== CONFIGURING {} ===========",
        tool.name().to_uppercase()
    )
}

pub fn prompting_banner() -> String {
    "\n=========== PROMPTING USER INPUT ===========".to_string()
}

/// Context printed under a validation failure, before the error itself.
pub fn validation_failure_notice(tool: ToolKind) -> String {
    format!(
        "No new {} endpoint was added\n\
         Double check that the correct details were entered\n\
         Run with --debug to keep the generated temporary configuration",
        tool.name()
    )
}

/// Where the generated configs were kept for inspection (--debug).
pub fn staging_kept_notice(dir: &Path) -> String {
    format!(
        "Generated configs have been kept in {}\n\
         IMPORTANT: When troubleshooting, DO NOT share the whole files\n\
         ONLY the info related to the specific failed endpoint",
        dir.display()
    )
}

pub fn success_message(receipt: &ProvisionReceipt, project_id: u32) -> String {
    match receipt.kind {
        ToolKind::Rclone => {
            let public = format!(
                "{}-public",
                receipt
                    .remote_name
                    .strip_suffix("-private")
                    .unwrap_or(&receipt.remote_name)
            );
            format!(
                "Updated rclone config {}\n\n\
                 rclone remote {}: now provides an S3 based connection to Lumi-O storage area of project_{}\n\
                 rclone remote {}: data pushed there is publicly available using the URL: \
                 https://{}.lumidata.eu/<bucket_name>/<object>",
                receipt.config_path.display(),
                receipt.remote_name,
                project_id,
                public,
                project_id,
            )
        }
        ToolKind::S3cmd => {
            let mut out = String::new();
            if let Some(copy) = &receipt.saved_copy {
                out.push_str(&format!("Saved generated config to {}\n", copy.display()));
            }
            if receipt.default_replaced {
                out.push_str(&format!(
                    "Updated s3cmd config {}\nNew configuration set as default\n",
                    receipt.config_path.display()
                ));
            } else if let Some(current) = &receipt.kept_default {
                out.push_str(&format!(
                    "Default s3cmd config was not changed, current default is {} in file {}\n\
                     Either set S3CMD_CONFIG\n\
                     Or use the -c flag on the commandline to use the generated config\n",
                    current,
                    receipt.config_path.display()
                ));
            } else if !receipt.default_replaced && receipt.saved_copy.is_some() {
                out.push_str(
                    "No default configuration exists, use S3CMD_CONFIG or the -c flag to use the generated config\n",
                );
            }
            out.push_str(&format!(
                "Created s3cmd config {} for project_{}\n\
                 \tOther existing configurations can be accessed by adding the -c flag\n\
                 \ts3cmd -c ~/.s3cfg-<profile-name> COMMAND ARGS",
                receipt.remote_name, project_id
            ));
            out
        }
        ToolKind::Aws => {
            let mut out = format!("Updated aws config {}\n", receipt.config_path.display());
            if receipt.default_replaced {
                out.push_str("New profile set as default\n");
            } else {
                out.push_str(
                    "New profile not set as default, use the --profile flag to use the generated config\n",
                );
                match &receipt.kept_default {
                    Some(current) => {
                        out.push_str(&format!("\tCurrent default is {current}\n"))
                    }
                    None => out.push_str("\tNo default config set\n"),
                }
            }
            out.push_str(&format!(
                "Created aws credentials profile {} for project_{}\n\
                 \tuse a specific profile with the --profile flag",
                receipt.remote_name, project_id
            ));
            out
        }
    }
}

pub fn delete_summary(tool: ToolKind, report: &DeleteReport) -> String {
    let mut lines = Vec::new();
    for name in &report.deleted {
        lines.push(format!(
            "Deleted section {} in file {}",
            name,
            report.file.display()
        ));
    }
    for name in &report.missing {
        lines.push(warning(&format!(
            "while deleting section {} in file {}, no such section",
            name,
            report.file.display()
        )));
    }
    if report.alias_removed {
        lines.push(format!(
            "Removed the default alias in {} as it pointed at a deleted section",
            report.file.display()
        ));
    }
    if report.alias_unreadable {
        lines.push(warning(
            "found a default section but could not determine the related section",
        ));
    }
    for path in &report.removed_files {
        lines.push(format!(
            "Removed profile file {} ({})",
            path.display(),
            tool.name()
        ));
    }
    for section in &report.metadata_deleted {
        lines.push(format!("Removed service metadata section [{section}]"));
    }
    lines.join("\n")
}

/// One row of the --status table.
pub struct StatusRow {
    pub tool: ToolKind,
    pub config_path: String,
    pub profiles: Vec<String>,
    pub default_profile: String,
}

pub fn status_table(rows: &[StatusRow]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Tool", "Config file", "Profiles", "Default"]);
    for row in rows {
        let profiles = if row.profiles.is_empty() {
            "(none)".to_string()
        } else {
            row.profiles.join("\n")
        };
        table.add_row(vec![
            Cell::new(row.tool.name()),
            Cell::new(&row.config_path),
            Cell::new(profiles),
            Cell::new(&row.default_profile),
        ]);
    }
    table.to_string()
}
