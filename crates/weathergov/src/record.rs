//! The display record handed to a status-bar formatter.

use serde::Serialize;

/// Display values for one station, keyed by formatter placeholder name.
///
/// The record outlives update cycles: a successful cycle overwrites every
/// field, a failed one only sets `update_error`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OutputRecord {
    pub text_description: String,
    pub observation_time: String,
    pub current_temp: String,
    pub high_temp: String,
    pub low_temp: String,
    pub dewpoint: String,
    pub temp_unit: String,
    pub wind_direction: String,
    pub wind_speed: String,
    pub wind_gust: String,
    pub wind_unit: String,
    pub pressure: String,
    pub pressure_unit: String,
    pub visibility: String,
    pub visibility_unit: String,
    pub humidity: String,
    pub heat_index: String,
    pub update_error: String,
}

impl OutputRecord {
    /// All fields as `(placeholder, value)` pairs, in declaration order.
    pub fn fields(&self) -> [(&'static str, &str); 18] {
        [
            ("text_description", self.text_description.as_str()),
            ("observation_time", self.observation_time.as_str()),
            ("current_temp", self.current_temp.as_str()),
            ("high_temp", self.high_temp.as_str()),
            ("low_temp", self.low_temp.as_str()),
            ("dewpoint", self.dewpoint.as_str()),
            ("temp_unit", self.temp_unit.as_str()),
            ("wind_direction", self.wind_direction.as_str()),
            ("wind_speed", self.wind_speed.as_str()),
            ("wind_gust", self.wind_gust.as_str()),
            ("wind_unit", self.wind_unit.as_str()),
            ("pressure", self.pressure.as_str()),
            ("pressure_unit", self.pressure_unit.as_str()),
            ("visibility", self.visibility.as_str()),
            ("visibility_unit", self.visibility_unit.as_str()),
            ("humidity", self.humidity.as_str()),
            ("heat_index", self.heat_index.as_str()),
            ("update_error", self.update_error.as_str()),
        ]
    }

    /// Look up a field by placeholder name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields()
            .into_iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
    }

    /// Replace every observation field with a fresh reading and clear the
    /// error marker.
    pub(crate) fn apply(&mut self, reading: OutputRecord) {
        *self = OutputRecord {
            update_error: String::new(),
            ..reading
        };
    }

    /// Flag the record as stale, leaving the last good values in place.
    pub(crate) fn mark_error(&mut self, marker: &str) {
        self.update_error = marker.to_string();
    }
}
