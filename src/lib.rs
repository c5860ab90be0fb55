//! lumio-conf: LUMI-O credential provisioning
//!
//! Provisions S3 credentials for the LUMI-O object storage into the
//! configuration files of rclone, s3cmd and the aws CLI. Every change is
//! staged into a scratch copy, validated against the live service and only
//! then committed over the real file, leaving unrelated configuration
//! untouched.

pub mod cli;
pub mod default_alias;
pub mod delete;
pub mod error;
pub mod logging;
pub mod merge;
pub mod metadata;
pub mod paths;
pub mod provision;
pub mod request;
pub mod staging;
pub mod tools;
pub mod validate;
