//! Integration tests for loading settings from files on disk.

use std::io::Write;

use iscore_core::settings_loader;
use iscore_core::IsCoreError;

#[test]
fn test_load_settings_from_toml_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
debug = false
site_name = "library"
log_level = "iscore_views=debug"
session_cookie_age = 3600
"#
    )
    .unwrap();

    let settings = settings_loader::from_toml_file(file.path()).unwrap();
    assert!(!settings.debug);
    assert_eq!(settings.site_name, "library");
    assert_eq!(settings.log_level, "iscore_views=debug");
    assert_eq!(settings.session_cookie_age, 3600);
    assert_eq!(settings.login_url, "/login/");
}

#[test]
fn test_load_settings_from_json_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, r#"{{"site_name": "ops", "template_dirs": ["tpl"]}}"#).unwrap();

    let settings = settings_loader::from_json_file(file.path()).unwrap();
    assert_eq!(settings.site_name, "ops");
    assert_eq!(settings.template_dirs.len(), 1);
}

#[test]
fn test_malformed_file_reports_configuration_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "site_name = ").unwrap();

    let err = settings_loader::from_toml_file(file.path()).unwrap_err();
    assert!(matches!(err, IsCoreError::ConfigurationError(_)));
    assert_eq!(err.status_code(), 500);
}
