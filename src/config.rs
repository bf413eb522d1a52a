use chrono::Duration;
use serde::{Deserialize, Deserializer};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::observer::Site;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Every section has defaults, so an empty file describes a London observer
/// tracking the ISS.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub observer: Site,
    pub satellite: SatelliteConfig,
    pub passes: PassSearchConfig,
    pub planets: PlanetConfig,
    pub aurora: AuroraConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SatelliteConfig {
    /// Cache key, also the stem of the cache file name.
    pub key: String,
    pub norad_id: u32,
    pub elements_url: Option<String>,
    pub cache_dir: PathBuf,
    #[serde(deserialize_with = "deserialize_duration")]
    pub max_age: Duration,
}

impl Default for SatelliteConfig {
    fn default() -> Self {
        Self {
            key: "iss".to_string(),
            norad_id: 25544,
            elements_url: None,
            cache_dir: PathBuf::from("."),
            max_age: Duration::hours(24),
        }
    }
}

impl SatelliteConfig {
    pub fn elements_url(&self) -> String {
        self.elements_url.clone().unwrap_or_else(|| {
            format!(
                "https://celestrak.org/NORAD/elements/gp.php?CATNR={}&FORMAT=TLE",
                self.norad_id
            )
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PassSearchConfig {
    pub max_attempts: usize,
    /// A pass must culminate strictly above this.
    pub min_peak_altitude_deg: f64,
    /// The sun must be strictly below this at culmination.
    pub max_sun_altitude_deg: f64,
    #[serde(deserialize_with = "deserialize_duration")]
    pub retry_step: Duration,
    #[serde(deserialize_with = "deserialize_duration")]
    pub set_margin: Duration,
    #[serde(deserialize_with = "deserialize_duration")]
    pub look_ahead: Duration,
}

impl Default for PassSearchConfig {
    fn default() -> Self {
        Self {
            max_attempts: 50,
            min_peak_altitude_deg: 10.0,
            max_sun_altitude_deg: -6.0,
            retry_step: Duration::hours(1),
            // 0.01 day
            set_margin: Duration::seconds(864),
            look_ahead: Duration::hours(24),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlanetConfig {
    pub min_altitude_deg: f64,
    #[serde(deserialize_with = "deserialize_duration")]
    pub viewing_delay: Duration,
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            min_altitude_deg: 5.0,
            viewing_delay: Duration::hours(1),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuroraConfig {
    pub status_url: String,
    pub activity_url: String,
}

impl Default for AuroraConfig {
    fn default() -> Self {
        Self {
            status_url: "https://aurorawatch-api.lancs.ac.uk/0.2/status/current-status.xml"
                .to_string(),
            activity_url:
                "https://aurorawatch-api.lancs.ac.uk/0.2/status/alerting-site-activity.xml"
                    .to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    #[serde(deserialize_with = "deserialize_duration")]
    pub timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::seconds(10),
        }
    }
}

impl HttpConfig {
    pub fn timeout_std(&self) -> std::time::Duration {
        self.timeout
            .to_std()
            .unwrap_or(std::time::Duration::from_secs(10))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("dashboard.json"),
        }
    }
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    pub fn from_str(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Read `path` if given, otherwise fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }
}

fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    humantime::parse_duration(s.trim())
        .map_err(serde::de::Error::custom)
        .and_then(|d| Duration::from_std(d).map_err(serde::de::Error::custom))
}
