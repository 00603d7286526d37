//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::collections::HashMap;
use std::net::IpAddr;
use std::path::{Path, PathBuf};

use crate::tracker::{PetId, RoomCode};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub ingest: IngestConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub tracker: TrackerConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_api_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_api_port() -> u16 {
    80
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_api_port(),
        }
    }
}

/// Sensor report listener configuration
#[derive(Debug, Clone, Deserialize)]
pub struct IngestConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_ingest_port")]
    pub port: u16,

    /// Bytes read from each sensor connection
    #[serde(default = "default_max_report_bytes")]
    pub max_report_bytes: usize,

    /// Seconds a sensor may take to send its report
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,
}

fn default_ingest_port() -> u16 {
    12345
}

fn default_max_report_bytes() -> usize {
    1024
}

fn default_read_timeout_secs() -> u64 {
    10
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_ingest_port(),
            max_report_bytes: default_max_report_bytes(),
            read_timeout_secs: default_read_timeout_secs(),
        }
    }
}

/// Dashboard page configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    /// Page reload interval in seconds
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
}

fn default_refresh_secs() -> u64 {
    crate::dashboard::DEFAULT_REFRESH_SECS
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_secs: default_refresh_secs(),
        }
    }
}

/// Sensor and tag registry
#[derive(Debug, Clone, Deserialize)]
pub struct TrackerConfig {
    /// Sensor IP address → room code (0..=3)
    #[serde(default = "default_rooms")]
    pub rooms: HashMap<String, i32>,

    /// Bluetooth tag address → pet index (0 or 1)
    #[serde(default = "default_pets")]
    pub pets: HashMap<String, usize>,
}

fn default_rooms() -> HashMap<String, i32> {
    HashMap::from([
        ("192.168.10.100".to_string(), 0),
        ("192.168.10.101".to_string(), 1),
        ("192.168.10.102".to_string(), 2),
        ("192.168.10.103".to_string(), 3),
    ])
}

fn default_pets() -> HashMap<String, usize> {
    HashMap::from([
        ("c8:a0:f1:69:d0:9c".to_string(), 0), // white tag
        ("c9:f2:08:ec:88:19".to_string(), 1), // black tag
    ])
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            rooms: default_rooms(),
            pets: default_pets(),
        }
    }
}

impl TrackerConfig {
    /// Parsed sensor table
    pub fn sensors(&self) -> Result<HashMap<IpAddr, RoomCode>, ConfigError> {
        self.rooms
            .iter()
            .map(|(addr, code)| -> Result<(IpAddr, RoomCode), ConfigError> {
                let ip: IpAddr = addr
                    .parse()
                    .map_err(|_| ConfigError::Invalid(format!("invalid sensor address `{}`", addr)))?;
                let room = RoomCode::try_from(*code)
                    .ok()
                    .filter(|r| r.is_indoor())
                    .ok_or_else(|| {
                        ConfigError::Invalid(format!("sensor {} has invalid room {}", addr, code))
                    })?;
                Ok((ip, room))
            })
            .collect()
    }

    /// Parsed tag table
    pub fn tags(&self) -> Result<Vec<(String, PetId)>, ConfigError> {
        self.pets
            .iter()
            .map(|(addr, idx)| -> Result<(String, PetId), ConfigError> {
                let pet = PetId::from_index(*idx).ok_or_else(|| {
                    ConfigError::Invalid(format!("tag {} has invalid pet index {}", addr, idx))
                })?;
                Ok((addr.clone(), pet))
            })
            .collect()
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("pettrack").join("config.toml")),
            Some(PathBuf::from("/etc/pettrack/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // API overrides
        if let Some(host) = var("PETTRACK_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = var("PETTRACK_API_PORT").and_then(|p| p.parse().ok()) {
            self.api.port = port;
        }

        // Ingest overrides
        if let Some(host) = var("PETTRACK_INGEST_HOST") {
            self.ingest.host = host;
        }
        if let Some(port) = var("PETTRACK_INGEST_PORT").and_then(|p| p.parse().ok()) {
            self.ingest.port = port;
        }

        // Dashboard overrides
        if let Some(secs) = var("PETTRACK_REFRESH_SECS").and_then(|s| s.parse().ok()) {
            self.dashboard.refresh_secs = secs;
        }

        // Logging overrides
        if let Some(level) = var("PETTRACK_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("PETTRACK_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Pettrack Configuration
#
# Environment variables override these settings:
# - PETTRACK_API_HOST
# - PETTRACK_API_PORT
# - PETTRACK_INGEST_HOST
# - PETTRACK_INGEST_PORT
# - PETTRACK_REFRESH_SECS
# - PETTRACK_LOG_LEVEL
# - PETTRACK_LOG_FORMAT

[api]
# Dashboard server host
host = "0.0.0.0"

# Dashboard server port
port = 80

[ingest]
# Room sensor listener host
host = "0.0.0.0"

# Room sensor listener port
port = 12345

# Bytes read from each sensor connection
max_report_bytes = 1024

# Seconds a sensor may take to send its report
read_timeout_secs = 10

[dashboard]
# Page reload interval (seconds)
refresh_secs = 5

[tracker.rooms]
# Sensor IP address = room (0 living room, 1 small bedroom, 2 large bedroom, 3 bathroom)
"192.168.10.100" = 0
"192.168.10.101" = 1
"192.168.10.102" = 2
"192.168.10.103" = 3

[tracker.pets]
# Bluetooth tag address = pet (0 or 1)
"c8:a0:f1:69:d0:9c" = 0
"c9:f2:08:ec:88:19" = 1

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_generated_config_matches_defaults() {
        let parsed = Config::parse(&generate_default_config()).unwrap();
        let defaults = Config::default();

        assert_eq!(parsed.api.port, defaults.api.port);
        assert_eq!(parsed.ingest.port, 12345);
        assert_eq!(parsed.ingest.max_report_bytes, 1024);
        assert_eq!(parsed.ingest.read_timeout_secs, 10);
        assert_eq!(parsed.dashboard.refresh_secs, 5);
        assert_eq!(parsed.tracker.rooms, defaults.tracker.rooms);
        assert_eq!(parsed.tracker.pets, defaults.tracker.pets);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = Config::parse("[api]\nport = 8080\n").unwrap();
        assert_eq!(config.api.port, 8080);
        assert_eq!(config.api.host, "0.0.0.0");
        assert_eq!(config.tracker.rooms.len(), 4);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_sensor_and_tag_tables() {
        let tracker = TrackerConfig::default();
        let sensors = tracker.sensors().unwrap();
        assert_eq!(
            sensors.get(&"192.168.10.102".parse::<IpAddr>().unwrap()),
            Some(&RoomCode::LargeBedroom)
        );

        let tags = tracker.tags().unwrap();
        assert!(tags.contains(&("c9:f2:08:ec:88:19".to_string(), PetId::Pet1)));
    }

    #[test]
    fn test_invalid_tables() {
        let config = Config::parse("[tracker.rooms]\n\"10.0.0.1\" = -1\n").unwrap();
        assert!(matches!(config.tracker.sensors(), Err(ConfigError::Invalid(_))));

        let config = Config::parse("[tracker.rooms]\n\"not-an-ip\" = 0\n").unwrap();
        assert!(config.tracker.sensors().is_err());

        let config = Config::parse("[tracker.pets]\n\"aa:bb\" = 2\n").unwrap();
        assert!(matches!(config.tracker.tags(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_overrides() {
        let vars = HashMap::from([
            ("PETTRACK_API_PORT", "8081"),
            ("PETTRACK_INGEST_PORT", "not-a-port"),
            ("PETTRACK_REFRESH_SECS", "10"),
            ("PETTRACK_LOG_FORMAT", "json"),
        ]);
        let mut config = Config::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.port, 8081);
        assert_eq!(config.ingest.port, 12345);
        assert_eq!(config.dashboard.refresh_secs, 10);
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[ingest]\nport = 4000").unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.ingest.port, 4000);

        let missing = Config::load(Path::new("/nonexistent/pettrack.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }
}
