//! Typed view over the `properties` object of an observation response.
//!
//! Measurements are `{"unitCode": ..., "value": ...}` objects in SI units
//! (°C, km/h, Pa, m, %). Any of them may be missing or carry a null value,
//! which decodes to `None` rather than failing.

use chrono::{DateTime, FixedOffset};
use serde::Deserialize;
use serde_json::Value;

use crate::error::UpdateError;

/// A single quantitative value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Measurement {
    #[serde(default)]
    pub value: Option<f64>,
}

/// Measurements read from an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Temperature,
    Dewpoint,
    WindDirection,
    WindSpeed,
    WindGust,
    BarometricPressure,
    Visibility,
    HeatIndex,
    RelativeHumidity,
}

impl Field {
    /// Key of the measurement inside `properties`.
    pub fn key(self) -> &'static str {
        match self {
            Field::Temperature => "temperature",
            Field::Dewpoint => "dewpoint",
            Field::WindDirection => "windDirection",
            Field::WindSpeed => "windSpeed",
            Field::WindGust => "windGust",
            Field::BarometricPressure => "barometricPressure",
            Field::Visibility => "visibility",
            Field::HeatIndex => "heatIndex",
            Field::RelativeHumidity => "relativeHumidity",
        }
    }
}

/// The latest observation for a station.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Observation {
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub text_description: Option<String>,
    #[serde(default)]
    pub temperature: Option<Measurement>,
    #[serde(default)]
    pub dewpoint: Option<Measurement>,
    #[serde(default)]
    pub wind_direction: Option<Measurement>,
    #[serde(default)]
    pub wind_speed: Option<Measurement>,
    #[serde(default)]
    pub wind_gust: Option<Measurement>,
    #[serde(default)]
    pub barometric_pressure: Option<Measurement>,
    #[serde(default)]
    pub visibility: Option<Measurement>,
    #[serde(default)]
    pub heat_index: Option<Measurement>,
    #[serde(default)]
    pub relative_humidity: Option<Measurement>,
}

impl Observation {
    /// Extract the observation from a decoded response document.
    pub fn from_response(response: &Value) -> Result<Self, UpdateError> {
        let properties = response.get("properties").ok_or_else(|| {
            UpdateError::Schema("response has no 'properties' object".to_string())
        })?;

        Self::deserialize(properties)
            .map_err(|e| UpdateError::Schema(format!("malformed 'properties': {}", e)))
    }

    /// Value of a measurement, `None` when missing or null.
    pub fn value(&self, field: Field) -> Option<f64> {
        let measurement = match field {
            Field::Temperature => &self.temperature,
            Field::Dewpoint => &self.dewpoint,
            Field::WindDirection => &self.wind_direction,
            Field::WindSpeed => &self.wind_speed,
            Field::WindGust => &self.wind_gust,
            Field::BarometricPressure => &self.barometric_pressure,
            Field::Visibility => &self.visibility,
            Field::HeatIndex => &self.heat_index,
            Field::RelativeHumidity => &self.relative_humidity,
        };
        measurement.as_ref().and_then(|m| m.value)
    }

    /// Value of a measurement that the output cannot do without.
    pub fn require(&self, field: Field) -> Result<f64, UpdateError> {
        self.value(field)
            .ok_or_else(|| UpdateError::Schema(format!("'{}' has no value", field.key())))
    }

    /// Observation time, `None` when absent or not ISO-8601.
    pub fn observed_at(&self) -> Option<DateTime<FixedOffset>> {
        let timestamp = self.timestamp.as_deref()?;
        DateTime::parse_from_rfc3339(timestamp).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_properties() {
        let err = Observation::from_response(&json!({"type": "Feature"})).unwrap_err();
        assert!(matches!(err, UpdateError::Schema(_)));
    }

    #[test]
    fn test_properties_wrong_shape() {
        let err = Observation::from_response(&json!({"properties": null})).unwrap_err();
        assert!(matches!(err, UpdateError::Schema(_)));

        let err = Observation::from_response(&json!({
            "properties": {"temperature": {"value": "warm"}}
        }))
        .unwrap_err();
        assert!(matches!(err, UpdateError::Schema(_)));
    }

    #[test]
    fn test_missing_and_null_values() {
        let obs = Observation::from_response(&json!({
            "properties": {
                "temperature": {"unitCode": "wmoUnit:degC", "value": 21.7},
                "windGust": {"unitCode": "wmoUnit:km_h-1", "value": null},
                "heatIndex": null,
                "visibility": {"unitCode": "wmoUnit:m"}
            }
        }))
        .unwrap();

        assert_eq!(obs.value(Field::Temperature), Some(21.7));
        assert_eq!(obs.value(Field::WindGust), None);
        assert_eq!(obs.value(Field::HeatIndex), None);
        assert_eq!(obs.value(Field::Visibility), None);
        assert_eq!(obs.value(Field::Dewpoint), None);
    }

    #[test]
    fn test_require_names_field() {
        let obs = Observation::default();
        match obs.require(Field::BarometricPressure) {
            Err(UpdateError::Schema(msg)) => assert!(msg.contains("barometricPressure")),
            other => panic!("expected Schema error, got {:?}", other),
        }
    }

    #[test]
    fn test_integer_values() {
        let obs = Observation::from_response(&json!({
            "properties": {"relativeHumidity": {"value": 65}}
        }))
        .unwrap();
        assert_eq!(obs.value(Field::RelativeHumidity), Some(65.0));
    }

    #[test]
    fn test_observed_at() {
        let obs = Observation {
            timestamp: Some("2024-07-04T14:51:00+00:00".into()),
            ..Observation::default()
        };
        let at = obs.observed_at().unwrap();
        assert_eq!(at.to_rfc3339(), "2024-07-04T14:51:00+00:00");

        let bad = Observation {
            timestamp: Some("yesterday".into()),
            ..Observation::default()
        };
        assert_eq!(bad.observed_at(), None);
        assert_eq!(Observation::default().observed_at(), None);
    }
}
