//! Settings loading from configuration files and the environment.
//!
//! ## Loading Order
//!
//! 1. Start with [`Settings::default`].
//! 2. Deep-merge a TOML or JSON document over the defaults.
//! 3. Apply `ISCORE_*` environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `ISCORE_SECRET_KEY` | `secret_key` |
//! | `ISCORE_DEBUG` | `debug` |
//! | `ISCORE_SITE_NAME` | `site_name` |
//! | `ISCORE_BIND_ADDRESS` | `bind_address` |
//! | `ISCORE_LOG_LEVEL` | `log_level` |
//! | `ISCORE_TEMPLATE_DIRS` | `template_dirs` (comma-separated) |
//! | `ISCORE_SESSION_COOKIE_NAME` | `session_cookie_name` |
//! | `ISCORE_SESSION_COOKIE_AGE` | `session_cookie_age` |
//! | `ISCORE_LOGIN_URL` | `login_url` |
//!
//! ```rust,no_run
//! use iscore_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file_with_env("iscore.toml").unwrap();
//! ```

use std::path::{Path, PathBuf};

use crate::error::IsCoreError;
use crate::settings::Settings;

/// Loads settings from a TOML string.
///
/// Keys missing from the document keep their default values.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, IsCoreError> {
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| IsCoreError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;
    merge_over_defaults(toml_to_json(toml_value), "TOML")
}

/// Loads settings from a TOML file.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, IsCoreError> {
    let content = read_config_file(path.as_ref(), "TOML")?;
    from_toml_str(&content)
}

/// Loads settings from a TOML file and then applies environment overrides.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, IsCoreError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
pub fn from_json_str(json_str: &str) -> Result<Settings, IsCoreError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| IsCoreError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;
    merge_over_defaults(json_value, "JSON")
}

/// Loads settings from a JSON file.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, IsCoreError> {
    let content = read_config_file(path.as_ref(), "JSON")?;
    from_json_str(&content)
}

/// Loads settings from a JSON file and then applies environment overrides.
pub fn from_json_file_with_env(path: impl AsRef<Path>) -> Result<Settings, IsCoreError> {
    let mut settings = from_json_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from environment variables only (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies `ISCORE_*` environment variable overrides to a settings struct.
///
/// Unparseable numeric values are ignored and the previous value is kept.
pub fn apply_env_overrides(settings: &mut Settings) {
    apply_overrides_from(settings, |name| std::env::var(name).ok());
}

/// Applies overrides using an arbitrary variable lookup.
fn apply_overrides_from(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup("ISCORE_SECRET_KEY") {
        settings.secret_key = val;
    }

    if let Some(val) = lookup("ISCORE_DEBUG") {
        settings.debug = matches!(val.to_lowercase().as_str(), "true" | "1" | "yes");
    }

    if let Some(val) = lookup("ISCORE_SITE_NAME") {
        settings.site_name = val;
    }

    if let Some(val) = lookup("ISCORE_BIND_ADDRESS") {
        settings.bind_address = val;
    }

    if let Some(val) = lookup("ISCORE_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Some(val) = lookup("ISCORE_TEMPLATE_DIRS") {
        settings.template_dirs = val
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(PathBuf::from)
            .collect();
    }

    if let Some(val) = lookup("ISCORE_SESSION_COOKIE_NAME") {
        settings.session_cookie_name = val;
    }

    if let Some(age) = lookup("ISCORE_SESSION_COOKIE_AGE").and_then(|v| v.parse::<u64>().ok()) {
        settings.session_cookie_age = age;
    }

    if let Some(val) = lookup("ISCORE_LOGIN_URL") {
        settings.login_url = val;
    }
}

// ============================================================
// Helpers
// ============================================================

fn read_config_file(path: &Path, kind: &str) -> Result<String, IsCoreError> {
    std::fs::read_to_string(path).map_err(|e| {
        IsCoreError::ConfigurationError(format!(
            "Failed to read {kind} file '{}': {e}",
            path.display()
        ))
    })
}

fn merge_over_defaults(value: serde_json::Value, kind: &str) -> Result<Settings, IsCoreError> {
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        IsCoreError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, value);
    serde_json::from_value(merged).map_err(|e| {
        IsCoreError::ConfigurationError(format!("Failed to deserialize settings from {kind}: {e}"))
    })
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => serde_json::Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

/// Deep-merges two JSON values. `override_val` wins on conflicts.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = match base_map.remove(&key) {
                    Some(base_v) => merge_json(base_v, override_v),
                    None => override_v,
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}
