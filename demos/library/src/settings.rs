//! Settings for the demo server.

use std::path::Path;

use iscore::core::settings_loader;
use iscore::prelude::*;

/// Loads settings from `path` when it exists, otherwise from defaults.
/// `ISCORE_*` environment variables apply in both cases.
pub fn load_settings(path: &Path) -> IsCoreResult<Settings> {
    if path.exists() {
        settings_loader::from_toml_file_with_env(path)
    } else {
        Ok(settings_loader::from_env())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_toml_when_present() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.toml");
        std::fs::write(&path, "site_name = \"library\"\nsession_cookie_age = 3600\n").unwrap();
        let settings = load_settings(&path).unwrap();
        assert_eq!(settings.site_name, "library");
        assert_eq!(settings.session_cookie_age, 3600);
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings.session_cookie_name, "sessionid");
    }
}
