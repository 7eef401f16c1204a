//! Rig file load/save round trips on disk.

use lightwave_config::{CaptureSource, ConfigError, RigConfig, ValidationError};
use tempfile::TempDir;

#[test]
fn save_then_load_preserves_edits() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("rig.toml");

    let mut rig = RigConfig::default();
    rig.audio.source = CaptureSource::Input;
    rig.audio.device = Some("USB Line In".into());
    rig.serial.port = Some("COM4".into());
    rig.serial.settle_ms = 500;
    rig.bands[4].sensitivity = 2.5;
    rig.controller.fade_interval_ms = 25;

    rig.save(&path).unwrap();
    assert!(path.exists(), "parent directories are created");

    let loaded = RigConfig::load(&path).unwrap();
    assert_eq!(loaded, rig);
}

#[test]
fn saved_file_is_readable_toml() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rig.toml");
    RigConfig::default().save(&path).unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("[analysis]"));
    assert!(text.contains("window_size = 4096"));
    assert_eq!(text.matches("[[bands]]").count(), 6);
    assert!(!text.contains("port"), "absent port is omitted");
}

#[test]
fn load_missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");
    let err = RigConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::ReadFile { .. }));
    assert!(err.to_string().contains("absent.toml"));
}

#[test]
fn explicit_missing_file_is_an_error_not_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("typo.toml");
    assert!(RigConfig::load_or_default(Some(&path)).is_err());
}

#[test]
fn invalid_file_lists_every_problem() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rig.toml");
    std::fs::write(
        &path,
        "[analysis]\nmin_db = 0.0\nmax_db = -10.0\n\n[controller]\nfade_interval_ms = 0\n",
    )
    .unwrap();

    match RigConfig::load(&path) {
        Err(ConfigError::Validation(ValidationError::Multiple(errors))) => {
            assert_eq!(errors.len(), 2, "{errors:?}");
            assert!(errors.contains(&ValidationError::FadeInterval));
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("rig.toml");
    std::fs::write(&path, "[serial\nport = ").unwrap();
    assert!(matches!(RigConfig::load(&path), Err(ConfigError::TomlParse(_))));
}
