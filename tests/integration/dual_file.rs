//! aws dual-file coordination: credentials and service metadata stay in
//! lockstep across provisioning runs.

use ini::Ini;
use lumio_conf::request::{ProvisioningRequest, DEFAULT_S3_URL};
use lumio_conf::staging::StagingArea;
use lumio_conf::tools::{provision_tool, ToolKind, ToolSettings};
use std::fs;
use tempfile::TempDir;

fn request(url: &str, chunk: u32) -> ProvisioningRequest {
    ProvisioningRequest {
        access_key: "A".to_string(),
        secret_key: "B".to_string(),
        project_id: 465000001,
        chunk_size: chunk,
        url: url.to_string(),
        remote_name: None,
    }
}

fn settings(credentials: &std::path::Path) -> ToolSettings {
    let mut settings = ToolSettings::new(ToolKind::Aws);
    settings.config_path = credentials.display().to_string();
    settings.enabled = true;
    settings.validation_disabled = true;
    settings
}

#[test]
fn test_aws_provision_writes_credentials_and_metadata() {
    let home = TempDir::new().unwrap();
    let credentials = home.path().join("credentials");
    let staging = StagingArea::new(false).unwrap();

    let receipt =
        provision_tool(&settings(&credentials), &request(DEFAULT_S3_URL, 15), &staging).unwrap();
    assert!(receipt.default_replaced);

    let creds = Ini::load_from_file(&credentials).unwrap();
    assert_eq!(
        creds.get_from(Some("lumi-465000001"), "aws_access_key_id"),
        Some("A")
    );
    assert_eq!(
        creds.get_from(Some("lumi-465000001"), "services"),
        Some("lumi-465000001")
    );
    assert_eq!(
        creds.get_from(Some("default"), "original_name"),
        Some("lumi-465000001")
    );

    // custom credentials path derives a sibling aws-config metadata file
    let metadata = fs::read_to_string(home.path().join("aws-config")).unwrap();
    assert!(metadata.contains("[services lumi-465000001]"));
    assert!(metadata.contains("  endpoint_url = https://lumidata.eu"));
    assert!(metadata.contains("  multipart_chunksize = 15"));
}

#[test]
fn test_reprovisioning_replaces_the_service_block() {
    let home = TempDir::new().unwrap();
    let credentials = home.path().join("credentials");
    let staging = StagingArea::new(false).unwrap();

    provision_tool(&settings(&credentials), &request(DEFAULT_S3_URL, 15), &staging).unwrap();
    provision_tool(
        &settings(&credentials),
        &request("https://other.example", 50),
        &staging,
    )
    .unwrap();

    let metadata = fs::read_to_string(home.path().join("aws-config")).unwrap();
    let headers = metadata.matches("[services lumi-465000001]").count();
    assert_eq!(headers, 1, "stale service blocks must not accumulate");
    assert!(metadata.contains("https://other.example"));
    assert!(metadata.contains("multipart_chunksize = 50"));
    assert!(!metadata.contains("https://lumidata.eu"));
}

#[test]
fn test_unrelated_metadata_sections_survive_byte_for_byte() {
    let home = TempDir::new().unwrap();
    let credentials = home.path().join("credentials");
    let preexisting = "\
[profile work]
region = eu-west-1

[services other]
s3 =
  endpoint_url = https://example.org
";
    fs::write(home.path().join("aws-config"), preexisting).unwrap();
    let staging = StagingArea::new(false).unwrap();

    provision_tool(&settings(&credentials), &request(DEFAULT_S3_URL, 15), &staging).unwrap();

    let metadata = fs::read_to_string(home.path().join("aws-config")).unwrap();
    assert!(metadata.starts_with(preexisting));
    assert!(metadata.contains("[services lumi-465000001]"));
}

#[test]
fn test_keep_default_reports_the_current_default() {
    let home = TempDir::new().unwrap();
    let credentials = home.path().join("credentials");
    let mut existing = Ini::new();
    existing
        .with_section(Some("older-profile"))
        .set("aws_access_key_id", "OLD");
    existing
        .with_section(Some("default"))
        .set("aws_access_key_id", "OLD")
        .set("original_name", "older-profile");
    existing.write_to_file(&credentials).unwrap();
    let staging = StagingArea::new(false).unwrap();

    let mut keep = settings(&credentials);
    keep.no_replace = true;
    let receipt = provision_tool(&keep, &request(DEFAULT_S3_URL, 15), &staging).unwrap();

    assert!(!receipt.default_replaced);
    assert_eq!(receipt.kept_default.as_deref(), Some("older-profile"));
    let creds = Ini::load_from_file(&credentials).unwrap();
    assert_eq!(
        creds.get_from(Some("default"), "original_name"),
        Some("older-profile")
    );
    assert_eq!(
        creds.get_from(Some("lumi-465000001"), "aws_access_key_id"),
        Some("A")
    );
}
