use serde::Deserialize;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Observation endpoint for a single station.
const URL_TEMPLATE: &str =
    "https://api.weather.gov/stations/{station_code}/observations/latest?require_qc=false";

/// Updater configuration, loaded once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Station code from weather.gov (e.g. `KNYC`)
    #[serde(default)]
    pub station_code: Option<String>,

    /// `metric` or `imperial`. Validated on every update cycle.
    #[serde(default = "default_units")]
    pub units: String,

    /// Value for the `update_error` field when a cycle fails
    #[serde(default = "default_update_error")]
    pub update_error: String,

    /// Seconds between update cycles when run by the node binary
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
}

fn default_units() -> String {
    "metric".to_string()
}

fn default_update_error() -> String {
    "!".to_string()
}

fn default_interval_secs() -> u64 {
    900
}

impl Default for Config {
    fn default() -> Self {
        Self {
            station_code: None,
            units: default_units(),
            update_error: default_update_error(),
            interval_secs: default_interval_secs(),
        }
    }
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not to a mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// The configured unit system, or an error naming the bad value.
    pub fn units(&self) -> Result<Units, ConfigError> {
        self.units.parse()
    }

    /// Request URL for the latest observation, `None` without a station code.
    pub fn observation_url(&self) -> Option<String> {
        let code = self.station_code.as_deref()?.trim();
        if code.is_empty() {
            return None;
        }
        Some(URL_TEMPLATE.replace("{station_code}", code))
    }
}

/// Unit system applied to every convertible field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Units {
    Metric,
    Imperial,
}

impl Units {
    pub fn temperature(self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }

    pub fn wind(self) -> &'static str {
        match self {
            Units::Metric => "kph",
            Units::Imperial => "mph",
        }
    }

    pub fn pressure(self) -> &'static str {
        match self {
            Units::Metric => "mb",
            Units::Imperial => "in",
        }
    }

    pub fn visibility(self) -> &'static str {
        match self {
            Units::Metric => "km",
            Units::Imperial => "mi",
        }
    }
}

impl FromStr for Units {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "metric" => Ok(Units::Metric),
            "imperial" => Ok(Units::Imperial),
            other => Err(ConfigError::InvalidUnits(other.to_string())),
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Units::Metric => f.write_str("metric"),
            Units::Imperial => f.write_str("imperial"),
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("units must be one of (imperial, metric), got '{0}'")]
    InvalidUnits(String),
    #[error("a station_code is required to check weather.gov")]
    MissingStation,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_yaml() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.station_code, None);
        assert_eq!(config.units, "metric");
        assert_eq!(config.update_error, "!");
        assert_eq!(config.interval_secs, 900);
    }

    #[test]
    fn test_load_full_config() {
        let yaml = r#"
station_code: KNYC
units: imperial
update_error: '<span color="red">!</span>'
interval_secs: 300
"#;
        let config = Config::parse(yaml).unwrap();
        assert_eq!(config.station_code.as_deref(), Some("KNYC"));
        assert_eq!(config.units().unwrap(), Units::Imperial);
        assert_eq!(config.update_error, "<span color=\"red\">!</span>");
        assert_eq!(config.interval_secs, 300);
    }

    #[test]
    fn test_observation_url() {
        let config = Config {
            station_code: Some("KBOS".into()),
            ..Config::default()
        };
        assert_eq!(
            config.observation_url().as_deref(),
            Some("https://api.weather.gov/stations/KBOS/observations/latest?require_qc=false")
        );
    }

    #[test]
    fn test_observation_url_requires_station() {
        assert_eq!(Config::default().observation_url(), None);

        let blank = Config {
            station_code: Some("  ".into()),
            ..Config::default()
        };
        assert_eq!(blank.observation_url(), None);
    }

    #[test]
    fn test_units_parse() {
        assert_eq!("metric".parse::<Units>().unwrap(), Units::Metric);
        assert_eq!("imperial".parse::<Units>().unwrap(), Units::Imperial);

        for bad in ["Metric", "kelvin", ""] {
            match bad.parse::<Units>() {
                Err(ConfigError::InvalidUnits(v)) => assert_eq!(v, bad),
                other => panic!("expected InvalidUnits for {:?}, got {:?}", bad, other),
            }
        }
    }

    #[test]
    fn test_unit_labels() {
        assert_eq!(Units::Metric.temperature(), "°C");
        assert_eq!(Units::Imperial.wind(), "mph");
        assert_eq!(Units::Metric.pressure(), "mb");
        assert_eq!(Units::Imperial.visibility(), "mi");
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(
            Config::parse("station_code: [unclosed"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Config::from_file("/nonexistent/weathergov.yaml"),
            Err(ConfigError::Io(_))
        ));
    }
}
