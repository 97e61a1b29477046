use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{AppError, Result};

/// Environment variables that may be passed through to `p4` from configuration.
pub const P4_ENVIRONMENT_VARIABLES: [&str; 4] = ["P4PORT", "P4CLIENT", "P4USER", "P4PASSWD"];

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub p4: P4Config,
    #[serde(default)]
    pub environment: EnvironmentConfig,
    #[serde(default)]
    pub behavior: BehaviorConfig,
    #[serde(default)]
    pub diff: DiffConfig,
    #[serde(default)]
    pub progress: ProgressConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct P4Config {
    #[serde(default = "default_binary")]
    pub binary: String,
    /// Oldest server release that supports `p4 move`, as `YEAR.MINOR`.
    #[serde(default = "default_move_min_server_version")]
    pub move_min_server_version: String,
}

#[derive(Deserialize, Clone, Default)]
pub struct EnvironmentConfig {
    #[serde(alias = "P4PORT", default)]
    pub p4port: Option<String>,
    #[serde(alias = "P4CLIENT", default)]
    pub p4client: Option<String>,
    #[serde(alias = "P4USER", default)]
    pub p4user: Option<String>,
    #[serde(alias = "P4PASSWD", default)]
    pub p4passwd: Option<String>,
}

// Manual Debug impl to avoid leaking the password
impl std::fmt::Debug for EnvironmentConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvironmentConfig")
            .field("P4PORT", &self.p4port)
            .field("P4CLIENT", &self.p4client)
            .field("P4USER", &self.p4user)
            .field("P4PASSWD", &self.p4passwd.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct BehaviorConfig {
    #[serde(default = "default_true")]
    pub warnings_enabled: bool,
    #[serde(default = "default_true")]
    pub log_warnings_to_status: bool,
    #[serde(default = "default_true")]
    pub auto_checkout: bool,
    #[serde(default)]
    pub auto_checkout_on_modified: bool,
    #[serde(default = "default_true")]
    pub auto_checkout_on_save: bool,
    #[serde(default = "default_true")]
    pub auto_add: bool,
    #[serde(default = "default_end_line_separator")]
    pub end_line_separator: String,
    #[serde(default)]
    pub unified_diff: bool,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DiffConfig {
    #[serde(default)]
    pub selected_app: Option<String>,
    /// Command template of the selected graphical diff application.
    #[serde(default)]
    pub command: Option<String>,
    #[serde(default = "default_diff_command")]
    pub default_command: String,
    /// JSON catalog of available graphical diff applications.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ProgressConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_progress_width")]
    pub width: usize,
}

fn default_binary() -> String {
    "p4".to_string()
}

fn default_move_min_server_version() -> String {
    "2009.1".to_string()
}

fn default_true() -> bool {
    true
}

fn default_end_line_separator() -> String {
    "\n".to_string()
}

fn default_diff_command() -> String {
    "p4merge \"%depotfile_path\" \"%file_path\"".to_string()
}

fn default_tick_ms() -> u64 {
    100
}

fn default_progress_width() -> usize {
    8
}

impl Default for P4Config {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            move_min_server_version: default_move_min_server_version(),
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            warnings_enabled: true,
            log_warnings_to_status: true,
            auto_checkout: true,
            auto_checkout_on_modified: false,
            auto_checkout_on_save: true,
            auto_add: true,
            end_line_separator: default_end_line_separator(),
            unified_diff: false,
        }
    }
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            selected_app: None,
            command: None,
            default_command: default_diff_command(),
            catalog_path: None,
        }
    }
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            width: default_progress_width(),
        }
    }
}

impl ProgressConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}

impl EnvironmentConfig {
    fn get(&self, name: &str) -> Option<&str> {
        let value = match name {
            "P4PORT" => &self.p4port,
            "P4CLIENT" => &self.p4client,
            "P4USER" => &self.p4user,
            "P4PASSWD" => &self.p4passwd,
            _ => &None,
        };
        value.as_deref()
    }
}

impl AppConfig {
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Load from file if specified
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        } else {
            builder = builder.add_source(config::File::with_name("p4bridge").required(false));
        }

        // Environment variable overrides with P4BRIDGE_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("P4BRIDGE")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::Config(e.to_string()))
    }

    /// Configured passthrough variables with a non-empty value.
    ///
    /// Only these override the inherited process environment.
    pub fn env_overlay(&self) -> BTreeMap<String, String> {
        P4_ENVIRONMENT_VARIABLES
            .iter()
            .filter_map(|name| {
                self.environment
                    .get(name)
                    .filter(|value| !value.is_empty())
                    .map(|value| (name.to_string(), value.to_string()))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_overlay_skips_empty_values() {
        let mut config = AppConfig::default();
        config.environment.p4port = Some("ssl:perforce:1666".to_string());
        config.environment.p4client = Some(String::new());
        config.environment.p4user = Some("alice".to_string());

        let overlay = config.env_overlay();
        assert_eq!(overlay.len(), 2);
        assert_eq!(overlay["P4PORT"], "ssl:perforce:1666");
        assert_eq!(overlay["P4USER"], "alice");
        assert!(!overlay.contains_key("P4CLIENT"));
        assert!(!overlay.contains_key("P4PASSWD"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let env = EnvironmentConfig {
            p4passwd: Some("hunter2".to_string()),
            ..Default::default()
        };
        let rendered = format!("{env:?}");
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn test_load_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            r#"
[p4]
binary = "/opt/perforce/p4"

[environment]
P4CLIENT = "alice-ws"

[behavior]
unified_diff = true
end_line_separator = "\r\n"
"#,
        )
        .unwrap();

        let config = AppConfig::load(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.p4.binary, "/opt/perforce/p4");
        assert_eq!(config.p4.move_min_server_version, "2009.1");
        assert_eq!(config.environment.p4client.as_deref(), Some("alice-ws"));
        assert!(config.behavior.unified_diff);
        assert_eq!(config.behavior.end_line_separator, "\r\n");
        assert!(config.behavior.auto_add);
        assert_eq!(config.progress.tick_ms, 100);
    }
}
