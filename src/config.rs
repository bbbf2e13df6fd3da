use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration for photo-geotag.
///
/// Controls the reverse-geocoding endpoint, the retry policy around it,
/// and output behavior (dry run).
///
/// # Loading
///
/// ```rust,no_run
/// use photo_geotag::config::Config;
///
/// // From a JSON file
/// let config = Config::load(Some("config.json".as_ref())).unwrap();
///
/// // Or use defaults and customize
/// let mut config = Config::default();
/// config.geocoder.language = Some("en".into());
/// config.retry.max_attempts = 2;
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Reverse-geocoding service settings.
    pub geocoder: GeocoderConfig,
    /// Retry policy for transient geocoding failures.
    pub retry: RetryConfig,
    /// Output behavior.
    pub output: OutputConfig,
}

/// Nominatim reverse-geocoding settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocoderConfig {
    /// Full URL of the `/reverse` endpoint.
    pub endpoint: String,
    /// `User-Agent` header; the public Nominatim instance rejects generic ones.
    pub user_agent: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Preferred language for place names (`Accept-Language`), e.g. `"en"`.
    pub language: Option<String>,
    /// Level of detail, 3 (country) to 18 (building). `None` uses the service default.
    pub zoom: Option<u8>,
}

/// Retry policy for transient geocoding failures (timeouts, HTTP 429/5xx).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Total attempts per coordinate, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry; doubled after every failed attempt.
    pub initial_backoff_ms: u64,
}

/// Output and behavior configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// If `true`, resolve place names but don't write any sidecar file.
    pub dry_run: bool,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://nominatim.openstreetmap.org/reverse".to_string(),
            user_agent: concat!("photo-geotag/", env!("CARGO_PKG_VERSION")).to_string(),
            timeout_secs: 30,
            language: None,
            zoom: None,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff_ms: 1000,
        }
    }
}

impl Config {
    /// Resolve the config file path — same directory as the executable.
    pub fn config_path() -> Result<PathBuf> {
        let exe_path = std::env::current_exe().context("Failed to get executable path")?;
        let exe_dir = exe_path
            .parent()
            .context("Failed to get executable directory")?;
        Ok(exe_dir.join("config.json"))
    }

    /// Load config from the given path, or from the default location.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        if !config_path.exists() {
            log::warn!(
                "Config file not found at {}. Using defaults.",
                config_path.display()
            );
            return Ok(Self::default());
        }

        let contents =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;
        let config: Config =
            serde_json::from_str(&contents).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Save config to the given path, or to the default location.
    pub fn save(&self, path: Option<&Path>) -> Result<()> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::config_path()?,
        };

        let contents = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&config_path, contents).context("Failed to write config file")?;
        log::info!("Config saved to {}", config_path.display());
        Ok(())
    }
}
