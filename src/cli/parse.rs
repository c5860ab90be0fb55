//! CLI parse: clap types for lumio-conf. No behavior; definitions only.

use clap::Parser;

/// Configure rclone, s3cmd and aws for LUMI-O object storage.
#[derive(Parser, Debug)]
#[command(name = "lumio-conf")]
#[command(about = "Configure rclone, s3cmd and aws for LUMI-O object storage")]
#[command(version)]
pub struct Cli {
    /// LUMI project to generate access for
    #[arg(long = "project-number")]
    pub project_number: Option<u32>,

    /// s3cmd chunk size in MB; files larger than this are uploaded
    /// multithread-multipart
    #[arg(long, default_value_t = 15, value_parser = clap::value_parser!(u32).range(5..=5000))]
    pub chunksize: u32,

    /// Url for the s3 object storage
    #[arg(long, default_value = crate::request::DEFAULT_S3_URL)]
    pub url: String,

    /// Custom name for the endpoints; the rclone public remote gains a
    /// -public suffix
    #[arg(long = "remote-name")]
    pub remote_name: Option<String>,

    /// Comma separated list of tools to configure. Default is rclone,s3cmd
    #[arg(long = "configure-only", value_delimiter = ',')]
    pub configure_only: Vec<String>,

    /// Comma separated list of tools to skip validation for.
    /// WARNING: might lead to a broken config
    #[arg(long = "skip-validation", value_delimiter = ',')]
    pub skip_validation: Vec<String>,

    /// Comma separated list of tools to not switch defaults for.
    /// Valid values: all,s3cmd,aws
    #[arg(long = "keep-default", value_delimiter = ',')]
    pub keep_default: Vec<String>,

    /// Path to rclone config
    #[arg(long = "rclone-config")]
    pub rclone_config: Option<String>,

    /// Path to s3cmd config
    #[arg(long = "s3cmd-config")]
    pub s3cmd_config: Option<String>,

    /// Path to aws credentials file; the endpoint configuration is added to
    /// the derived config file next to it
    #[arg(long = "aws-config")]
    pub aws_config: Option<String>,

    /// Comma separated list of endpoints to delete
    #[arg(long, value_delimiter = ',')]
    pub delete: Vec<String>,

    /// Show the configured endpoints and current defaults, then exit
    #[arg(long)]
    pub status: bool,

    /// Read access and secret keys from the environment:
    /// LUMIO_S3_ACCESS, LUMIO_S3_SECRET
    #[arg(long)]
    pub noninteractive: bool,

    /// Keep temporary configs for debugging
    #[arg(long)]
    pub debug: bool,

    /// Enable verbose logging (default: off)
    #[arg(long)]
    pub verbose: bool,
}
