//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.tagarela/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::state::DEFAULT_TIME_FORMAT;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TagarelaConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub chat: ChatConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    pub base_url: Option<String>,
    /// Appended to endpoint names, e.g. "php" → `/listar.php`.
    pub extension: Option<String>,
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ChatConfig {
    pub poll_interval_secs: Option<u64>,
    pub mark_read_on_poll: Option<bool>,
    pub time_format: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_BASE_URL: &str = "http://localhost/chat";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 3;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    pub base_url: String,
    pub extension: Option<String>,
    pub request_timeout: Duration,
    pub poll_interval: Duration,
    pub mark_read_on_poll: bool,
    pub time_format: String,
}

/// Values taken from command-line flags (None = not specified).
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub server: Option<String>,
    pub interval_secs: Option<u64>,
}

/// Values taken from environment variables (None = unset).
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    pub server: Option<String>,
    pub interval_secs: Option<u64>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        let interval_secs = std::env::var("TAGARELA_POLL_INTERVAL")
            .ok()
            .and_then(|raw| match raw.trim().parse() {
                Ok(secs) => Some(secs),
                Err(e) => {
                    warn!("Ignoring TAGARELA_POLL_INTERVAL={:?}: {}", raw, e);
                    None
                }
            });
        Self {
            server: std::env::var("TAGARELA_SERVER_URL").ok(),
            interval_secs,
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.tagarela/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".tagarela").join("config.toml"))
}

/// Load config from `~/.tagarela/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `TagarelaConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<TagarelaConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(TagarelaConfig::default());
        }
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<TagarelaConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(TagarelaConfig::default());
    }

    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: TagarelaConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

const DEFAULT_CONFIG_CONTENT: &str = r#"# Tagarela Configuration
# All settings are optional; defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [server]
# base_url = "http://localhost/chat"   # Or set TAGARELA_SERVER_URL / --server
# extension = "php"                    # Endpoints become listar.php, enviar.php, ...
# request_timeout_secs = 10

# [chat]
# poll_interval_secs = 3               # Or set TAGARELA_POLL_INTERVAL / --interval
# mark_read_on_poll = true             # false: mark read only once, when joining
# time_format = "%H:%M"                # strftime pattern for message times
"#;

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, DEFAULT_CONFIG_CONTENT) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &TagarelaConfig, env: &EnvOverrides, cli: &CliOverrides) -> ResolvedConfig {
    let base_url = cli
        .server
        .clone()
        .or_else(|| env.server.clone())
        .or_else(|| config.server.base_url.clone())
        .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

    // Zero would spin the poll loop; fall back to the default instead
    let poll_secs = cli
        .interval_secs
        .or(env.interval_secs)
        .or(config.chat.poll_interval_secs)
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);

    let timeout_secs = config
        .server
        .request_timeout_secs
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);

    ResolvedConfig {
        base_url,
        extension: config.server.extension.clone(),
        request_timeout: Duration::from_secs(timeout_secs),
        poll_interval: Duration::from_secs(poll_secs),
        mark_read_on_poll: config.chat.mark_read_on_poll.unwrap_or(true),
        time_format: config
            .chat
            .time_format
            .clone()
            .unwrap_or_else(|| DEFAULT_TIME_FORMAT.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_overrides() -> (EnvOverrides, CliOverrides) {
        (EnvOverrides::default(), CliOverrides::default())
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let (env, cli) = no_overrides();
        let resolved = resolve(&TagarelaConfig::default(), &env, &cli);
        assert_eq!(resolved.base_url, DEFAULT_BASE_URL);
        assert_eq!(resolved.poll_interval, Duration::from_secs(3));
        assert_eq!(resolved.request_timeout, Duration::from_secs(10));
        assert!(resolved.mark_read_on_poll);
        assert_eq!(resolved.time_format, "%H:%M");
        assert!(resolved.extension.is_none());
    }

    #[test]
    fn test_config_values_override_defaults() {
        let config = TagarelaConfig {
            server: ServerConfig {
                base_url: Some("http://chat.lan/chat".to_string()),
                extension: Some("php".to_string()),
                request_timeout_secs: Some(2),
            },
            chat: ChatConfig {
                poll_interval_secs: Some(5),
                mark_read_on_poll: Some(false),
                time_format: Some("%I:%M %p".to_string()),
            },
        };
        let (env, cli) = no_overrides();
        let resolved = resolve(&config, &env, &cli);
        assert_eq!(resolved.base_url, "http://chat.lan/chat");
        assert_eq!(resolved.extension.as_deref(), Some("php"));
        assert_eq!(resolved.request_timeout, Duration::from_secs(2));
        assert_eq!(resolved.poll_interval, Duration::from_secs(5));
        assert!(!resolved.mark_read_on_poll);
        assert_eq!(resolved.time_format, "%I:%M %p");
    }

    #[test]
    fn test_env_beats_file_and_cli_beats_env() {
        let config = TagarelaConfig {
            server: ServerConfig {
                base_url: Some("http://file".to_string()),
                ..Default::default()
            },
            chat: ChatConfig {
                poll_interval_secs: Some(9),
                ..Default::default()
            },
        };
        let env = EnvOverrides {
            server: Some("http://env".to_string()),
            interval_secs: Some(4),
        };
        let resolved = resolve(&config, &env, &CliOverrides::default());
        assert_eq!(resolved.base_url, "http://env");
        assert_eq!(resolved.poll_interval, Duration::from_secs(4));

        let cli = CliOverrides {
            server: Some("http://cli".to_string()),
            interval_secs: Some(1),
        };
        let resolved = resolve(&config, &env, &cli);
        assert_eq!(resolved.base_url, "http://cli");
        assert_eq!(resolved.poll_interval, Duration::from_secs(1));
    }

    #[test]
    fn test_zero_interval_falls_back_to_default() {
        let cli = CliOverrides {
            interval_secs: Some(0),
            ..Default::default()
        };
        let resolved = resolve(&TagarelaConfig::default(), &EnvOverrides::default(), &cli);
        assert_eq!(resolved.poll_interval, Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS));
    }

    #[test]
    fn test_sparse_toml_parses() {
        let toml_str = r#"
[chat]
poll_interval_secs = 10
"#;
        let config: TagarelaConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.chat.poll_interval_secs, Some(10));
        assert!(config.server.base_url.is_none());
        assert!(config.chat.mark_read_on_poll.is_none());
    }

    #[test]
    fn test_generated_default_is_valid_toml() {
        // Everything is commented out, so it parses to all-defaults
        let config: TagarelaConfig = toml::from_str(DEFAULT_CONFIG_CONTENT).unwrap();
        assert!(config.server.base_url.is_none());
        assert!(config.chat.time_format.is_none());
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[chat\npoll_interval_secs = ").unwrap();

        let result = load_config_from(&path);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file_generates_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".tagarela").join("config.toml");

        let config = load_config_from(&path).unwrap();
        assert!(config.server.base_url.is_none());
        assert!(path.exists());
    }
}
