//! Deletion flow: structured section removal, default-alias cascade and
//! per-tool companion cleanup.

use super::test_utils::with_home;
use ini::Ini;
use lumio_conf::delete::delete_tool_sections;
use lumio_conf::tools::{ToolKind, ToolSettings};
use std::fs;
use tempfile::TempDir;

#[test]
fn test_deleting_a_profile_cascades_to_the_default_alias() {
    let home = TempDir::new().unwrap();
    let credentials = home.path().join("credentials");
    let mut ini = Ini::new();
    ini.with_section(Some("lumi-465000001"))
        .set("aws_access_key_id", "A")
        .set("aws_secret_access_key", "B");
    ini.with_section(Some("default"))
        .set("aws_access_key_id", "A")
        .set("aws_secret_access_key", "B")
        .set("original_name", "lumi-465000001");
    ini.with_section(Some("unrelated")).set("aws_access_key_id", "C");
    ini.write_to_file(&credentials).unwrap();

    let mut settings = ToolSettings::new(ToolKind::Aws);
    settings.config_path = credentials.display().to_string();
    let report = delete_tool_sections(&settings, &["lumi-465000001".to_string()]).unwrap();

    assert_eq!(report.deleted, vec!["lumi-465000001"]);
    assert!(report.alias_removed);

    let after = Ini::load_from_file(&credentials).unwrap();
    assert!(after.section(Some("lumi-465000001")).is_none());
    assert!(after.section(Some("default")).is_none());
    assert!(after.section(Some("unrelated")).is_some());
}

#[test]
fn test_alias_pointing_elsewhere_survives_deletion() {
    let home = TempDir::new().unwrap();
    let credentials = home.path().join("credentials");
    let mut ini = Ini::new();
    ini.with_section(Some("lumi-462000007")).set("aws_access_key_id", "A");
    ini.with_section(Some("lumi-465000001")).set("aws_access_key_id", "B");
    ini.with_section(Some("default"))
        .set("aws_access_key_id", "A")
        .set("original_name", "lumi-462000007");
    ini.write_to_file(&credentials).unwrap();

    let mut settings = ToolSettings::new(ToolKind::Aws);
    settings.config_path = credentials.display().to_string();
    let report = delete_tool_sections(&settings, &["lumi-465000001".to_string()]).unwrap();

    assert!(!report.alias_removed);
    let after = Ini::load_from_file(&credentials).unwrap();
    assert_eq!(
        after.get_from(Some("default"), "original_name"),
        Some("lumi-462000007")
    );
}

#[test]
fn test_aws_deletion_removes_the_service_metadata_too() {
    let home = TempDir::new().unwrap();
    let credentials = home.path().join("credentials");
    let mut ini = Ini::new();
    ini.with_section(Some("lumi-465000001")).set("aws_access_key_id", "A");
    ini.write_to_file(&credentials).unwrap();
    fs::write(
        home.path().join("aws-config"),
        "[services lumi-465000001]\ns3 =\n  endpoint_url = https://lumidata.eu\n",
    )
    .unwrap();

    let mut settings = ToolSettings::new(ToolKind::Aws);
    settings.config_path = credentials.display().to_string();
    let report = delete_tool_sections(&settings, &["lumi-465000001".to_string()]).unwrap();

    assert_eq!(report.metadata_deleted, vec!["services lumi-465000001"]);
    let metadata = fs::read_to_string(home.path().join("aws-config")).unwrap();
    assert!(!metadata.contains("services lumi-465000001"));
}

#[test]
fn test_s3cmd_deletion_removes_versioned_copies() {
    let home = TempDir::new().unwrap();
    with_home(home.path(), || {
        let base = home.path().join(".s3cfg");
        fs::write(&base, "[lumi-465000001]\naccess_key = A\n").unwrap();
        let copy = home.path().join(".s3cfg-lumi-465000001");
        fs::write(&copy, "[lumi-465000001]\naccess_key = A\n").unwrap();

        let settings = ToolSettings::new(ToolKind::S3cmd);
        let report = delete_tool_sections(&settings, &["lumi-465000001".to_string()]).unwrap();

        assert_eq!(report.deleted, vec!["lumi-465000001"]);
        assert_eq!(report.removed_files, vec![copy.clone()]);
        assert!(!copy.exists());
    });
}

#[test]
fn test_missing_sections_warn_without_failing() {
    let home = TempDir::new().unwrap();
    let conf = home.path().join("rclone.conf");
    fs::write(&conf, "[keepme]\ntype = s3\n").unwrap();

    let mut settings = ToolSettings::new(ToolKind::Rclone);
    settings.config_path = conf.display().to_string();
    let report = delete_tool_sections(&settings, &["ghost".to_string()]).unwrap();

    assert!(report.deleted.is_empty());
    assert_eq!(report.missing, vec!["ghost"]);
    // nothing changed, nothing rewritten
    assert_eq!(
        fs::read_to_string(&conf).unwrap(),
        "[keepme]\ntype = s3\n"
    );
}
