//! End-to-end provisioning: stage, merge, validate, commit.

use super::test_utils::with_home;
use ini::Ini;
use lumio_conf::merge::{Exclusivity, MergePolicy};
use lumio_conf::provision::{provision, ProvisionPlan};
use lumio_conf::request::{ProvisioningRequest, DEFAULT_S3_URL};
use lumio_conf::staging::StagingArea;
use lumio_conf::tools::{provision_tool, ToolKind, ToolSettings};
use lumio_conf::validate::CommandSpec;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn sh(script: &str) -> CommandSpec {
    CommandSpec::new("/bin/sh").arg("-c").arg(script)
}

fn request() -> ProvisioningRequest {
    ProvisioningRequest {
        access_key: "A".to_string(),
        secret_key: "B".to_string(),
        project_id: 465000001,
        chunk_size: 15,
        url: DEFAULT_S3_URL.to_string(),
        remote_name: None,
    }
}

fn s3cmd_style_plan(real: &Path, validation: CommandSpec) -> ProvisionPlan {
    let mut sections = Ini::new();
    sections
        .with_section(Some("lumi-465000001"))
        .set("access_key", "A")
        .set("secret_key", "B");
    ProvisionPlan {
        tool: "s3cmd".to_string(),
        remote_name: "lumi-465000001".to_string(),
        real_path: real.to_path_buf(),
        scratch_name: "temp_s3cmd.config".to_string(),
        sections,
        policy: MergePolicy::careful(Exclusivity::ExclusiveSingleProfile),
        set_default_for: None,
        validation,
        skip_validation: false,
        commit_paths: vec![real.to_path_buf()],
        metadata: None,
    }
}

#[test]
fn test_exclusive_merge_replaces_unrelated_sections() {
    let home = TempDir::new().unwrap();
    let real = home.path().join("s3cfg");
    fs::write(&real, "[other]\nx = 1\n").unwrap();
    let staging = StagingArea::new(false).unwrap();

    provision(&s3cmd_style_plan(&real, sh("exit 0")), &staging).unwrap();

    let after = Ini::load_from_file(&real).unwrap();
    let names: Vec<&str> = after.sections().flatten().collect();
    assert_eq!(names, vec!["lumi-465000001"]);
    assert_eq!(after.get_from(Some("lumi-465000001"), "access_key"), Some("A"));
    assert_eq!(after.get_from(Some("lumi-465000001"), "secret_key"), Some("B"));
}

#[test]
fn test_reprovisioning_with_default_creates_the_alias() {
    let home = TempDir::new().unwrap();
    let real = home.path().join("credentials");
    let staging = StagingArea::new(false).unwrap();

    let mut plan = s3cmd_style_plan(&real, sh("exit 0"));
    plan.policy = MergePolicy::careful(Exclusivity::Additive);
    provision(&plan, &staging).unwrap();

    // second run, this time switching the default over
    let mut plan = s3cmd_style_plan(&real, sh("exit 0"));
    plan.policy = MergePolicy::careful(Exclusivity::Additive);
    plan.set_default_for = Some("lumi-465000001".to_string());
    provision(&plan, &staging).unwrap();

    let after = Ini::load_from_file(&real).unwrap();
    assert_eq!(after.get_from(Some("default"), "access_key"), Some("A"));
    assert_eq!(after.get_from(Some("default"), "secret_key"), Some("B"));
    assert_eq!(
        after.get_from(Some("default"), "original_name"),
        Some("lumi-465000001")
    );
    assert_eq!(after.get_from(Some("lumi-465000001"), "access_key"), Some("A"));
}

#[test]
fn test_failed_validation_leaves_the_file_byte_identical() {
    let home = TempDir::new().unwrap();
    let real = home.path().join("s3cfg");
    fs::write(&real, "[other]\nx = 1\n# trailing note\n").unwrap();
    let before = fs::read(&real).unwrap();
    let staging = StagingArea::new(false).unwrap();

    let err = provision(
        &s3cmd_style_plan(&real, sh("echo ERROR: Test failure >&2; exit 1")),
        &staging,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        lumio_conf::error::ProvisionError::ValidationFailed { .. }
    ));
    assert_eq!(fs::read(&real).unwrap(), before);
    let message = err.to_string();
    assert!(message.contains("Test failure"), "diagnostic lost: {message}");
}

#[test]
fn test_one_failing_tool_does_not_block_another() {
    let home = TempDir::new().unwrap();
    let failing = home.path().join("failing.conf");
    let passing = home.path().join("passing.conf");
    let staging = StagingArea::new(false).unwrap();

    let mut bad = s3cmd_style_plan(&failing, sh("exit 1"));
    bad.scratch_name = "temp_failing.config".to_string();
    assert!(provision(&bad, &staging).is_err());

    let mut good = s3cmd_style_plan(&passing, sh("exit 0"));
    good.scratch_name = "temp_passing.config".to_string();
    provision(&good, &staging).unwrap();

    assert!(!failing.exists());
    assert!(passing.exists());
}

#[test]
fn test_rclone_provision_adds_private_and_public_remotes() {
    let home = TempDir::new().unwrap();
    let conf = home.path().join("rclone.conf");
    fs::write(&conf, "[unrelated]\ntype = local\n").unwrap();

    let mut settings = ToolSettings::new(ToolKind::Rclone);
    settings.config_path = conf.display().to_string();
    settings.validation_disabled = true;
    let staging = StagingArea::new(false).unwrap();

    let receipt = provision_tool(&settings, &request(), &staging).unwrap();
    assert_eq!(receipt.remote_name, "lumi-465000001-private");

    let after = Ini::load_from_file(&conf).unwrap();
    // additive merge keeps the unrelated remote
    assert!(after.section(Some("unrelated")).is_some());
    assert_eq!(
        after.get_from(Some("lumi-465000001-private"), "acl"),
        Some("private")
    );
    assert_eq!(
        after.get_from(Some("lumi-465000001-public"), "acl"),
        Some("public")
    );
    assert_eq!(
        after.get_from(Some("lumi-465000001-public"), "endpoint"),
        Some(DEFAULT_S3_URL)
    );
}

#[test]
fn test_s3cmd_default_layout_writes_versioned_copy_and_default() {
    let home = TempDir::new().unwrap();
    with_home(home.path(), || {
        let mut settings = ToolSettings::new(ToolKind::S3cmd);
        settings.validation_disabled = true;
        let staging = StagingArea::new(false).unwrap();

        let receipt = provision_tool(&settings, &request(), &staging).unwrap();
        assert!(receipt.default_replaced);

        let base = home.path().join(".s3cfg");
        let copy = home.path().join(".s3cfg-lumi-465000001");
        assert_eq!(receipt.saved_copy.as_deref(), Some(copy.as_path()));
        for path in [&base, &copy] {
            let ini = Ini::load_from_file(path).unwrap();
            assert_eq!(
                ini.get_from(Some("lumi-465000001"), "access_key"),
                Some("A")
            );
            assert_eq!(ini.get_from(Some("lumi-465000001"), "chunk_size"), Some("15"));
        }
    });
}

#[test]
fn test_s3cmd_keep_default_leaves_the_base_config_untouched() {
    let home = TempDir::new().unwrap();
    with_home(home.path(), || {
        let base = home.path().join(".s3cfg");
        fs::write(&base, "[existing-profile]\naccess_key = OLD\n").unwrap();
        let before = fs::read(&base).unwrap();

        let mut settings = ToolSettings::new(ToolKind::S3cmd);
        settings.validation_disabled = true;
        settings.no_replace = true;
        let staging = StagingArea::new(false).unwrap();

        let receipt = provision_tool(&settings, &request(), &staging).unwrap();
        assert!(!receipt.default_replaced);
        assert_eq!(receipt.kept_default.as_deref(), Some("existing-profile"));

        assert_eq!(fs::read(&base).unwrap(), before);
        let copy = home.path().join(".s3cfg-lumi-465000001");
        assert!(copy.exists());
    });
}
