//! Settings: a TOML file, then environment overrides, then validation.
//!
//! File lookup order: explicit path, `$SPONSORGRID_CONFIG`,
//! `<config_dir>/sponsorgrid/config.toml`. No file means defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const CONFIG_ENV: &str = "SPONSORGRID_CONFIG";

const DEFAULT_CSV_URL: &str = "https://assets.publishing.service.gov.uk/media/65b6a4ce0a3a1c000c5a7c0e/2024-01-26_Register_of_licensed_sponsors_Worker.csv";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub ping_message: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            environment: "development".into(),
            ping_message: "ping".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegisterSettings {
    pub csv_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Records returned by the "latest" view.
    pub latest_limit: usize,
    pub refresh_interval_hours: u64,
}

impl Default for RegisterSettings {
    fn default() -> Self {
        Self {
            csv_url: DEFAULT_CSV_URL.into(),
            timeout_secs: 30,
            user_agent: "UK-Tier-Sponsors-Platform/1.0".into(),
            latest_limit: 100,
            refresh_interval_hours: 24,
        }
    }
}

impl RegisterSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_hours.saturating_mul(3600))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Directory holding the tabular JSON datasets.
    pub dir: PathBuf,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self { dir: PathBuf::from("data") }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub register: RegisterSettings,
    pub data: DataSettings,
}

impl Settings {
    /// Parse and validate TOML. Environment overrides are not applied.
    pub fn from_toml(input: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(input).map_err(|e| ConfigError::Parse(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Default settings file location, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("sponsorgrid").join("config.toml"))
    }

    /// Load settings for the running process.
    ///
    /// An explicit path (or `$SPONSORGRID_CONFIG`) must exist; the default
    /// location is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let required = explicit.map(Path::to_path_buf).or(env_path);

        let mut settings = match required {
            Some(path) => Self::read_file(&path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::read_file(&path)?,
                None => {
                    tracing::info!("no settings file found, using defaults");
                    Self::default()
                }
            },
        };

        settings.apply_overrides(|key| std::env::var(key).ok())?;
        settings.validate()?;
        Ok(settings)
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings = toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        tracing::info!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Apply environment-style overrides. `lookup` returns the value for a
    /// variable name, or `None` when unset.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("SPONSORGRID_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("SPONSORGRID_PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|e| ConfigError::Invalid(format!("SPONSORGRID_PORT '{port}': {e}")))?;
        }
        if let Some(env) = lookup("SPONSORGRID_ENV") {
            self.server.environment = env;
        }
        if let Some(msg) = lookup("PING_MESSAGE") {
            self.server.ping_message = msg;
        }
        if let Some(url) = lookup("SPONSORGRID_REGISTER_URL") {
            self.register.csv_url = url;
        }
        if let Some(dir) = lookup("SPONSORGRID_DATA_DIR") {
            self.data.dir = PathBuf::from(dir);
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid("server.port must be non-zero".into()));
        }
        if self.register.timeout_secs == 0 {
            return Err(ConfigError::Invalid("register.timeout_secs must be non-zero".into()));
        }
        if self.register.refresh_interval_hours == 0 {
            return Err(ConfigError::Invalid(
                "register.refresh_interval_hours must be non-zero".into(),
            ));
        }
        if self.register.latest_limit == 0 {
            return Err(ConfigError::Invalid("register.latest_limit must be non-zero".into()));
        }
        let url = &self.register.csv_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "register.csv_url must be an http(s) URL, got '{url}'"
            )));
        }
        Ok(())
    }

    /// `host:port` for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
