//! Fetch-and-normalize cycle for a single weather.gov station.

use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use crate::config::{Config, ConfigError, Units};
use crate::convert::{
    compass_direction, display_float, display_int, round_half_even, round_to, to_fahrenheit,
    HIGH_LOW_UNAVAILABLE,
};
use crate::error::UpdateError;
use crate::fetcher::Fetch;
use crate::observation::{Field, Observation};
use crate::record::OutputRecord;

/// km/h per mph.
const KPH_PER_MPH: f64 = 1.609;
/// Pa per inHg.
const PA_PER_INHG: f64 = 3386.0;
/// Pa per hPa (millibar).
const PA_PER_HPA: f64 = 100.0;
/// Metres per mile.
const M_PER_MILE: f64 = 1609.0;
/// Metres per kilometre.
const M_PER_KM: f64 = 1000.0;

/// Keeps the display record for one station up to date.
///
/// Each call to [`WeatherGov::check_weather`] runs one complete cycle. The
/// caller must not run cycles concurrently against the same updater; the
/// `&mut self` receiver enforces that.
pub struct WeatherGov<F: Fetch> {
    config: Config,
    url: Option<String>,
    fetcher: F,
    record: OutputRecord,
}

impl<F: Fetch> WeatherGov<F> {
    /// Create an updater. The request URL is built here, once.
    pub fn new(config: Config, fetcher: F) -> Self {
        let url = config.observation_url();
        Self {
            config,
            url,
            fetcher,
            record: OutputRecord::default(),
        }
    }

    /// The configuration this updater was built from.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The request URL, if a station code was configured.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// The current display record.
    pub fn record(&self) -> &OutputRecord {
        &self.record
    }

    /// Fetch the latest observation and update the record.
    ///
    /// On failure the error marker is set, the previous values are left in
    /// place, and the error is returned for inspection. Nothing is retried.
    pub async fn check_weather(&mut self) -> Result<(), UpdateError> {
        match self.cycle().await {
            Ok(reading) => {
                self.record.apply(reading);
                Ok(())
            }
            Err(e) => {
                log_failure(&e);
                self.record.mark_error(&self.config.update_error);
                Err(e)
            }
        }
    }

    /// Run a cycle every `period` until `shutdown` fires, handing the record
    /// to `publish` after each cycle.
    ///
    /// Shutdown also interrupts a cycle that is still waiting on the network.
    /// Ticks missed during a slow cycle are delayed, not burst.
    pub async fn run(
        &mut self,
        period: Duration,
        mut shutdown: watch::Receiver<()>,
        mut publish: impl FnMut(&OutputRecord),
    ) {
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            // First tick fires immediately, so the record is filled at startup.
            tokio::select! {
                _ = interval.tick() => {}
                _ = shutdown.changed() => {
                    log::info!("Shutdown signal received, exiting");
                    return;
                }
            }

            tokio::select! {
                result = self.check_weather() => {
                    if let Err(e) = result {
                        log::debug!("Update failed ({:?}): {}", e.kind(), e);
                    }
                    publish(&self.record);
                }
                _ = shutdown.changed() => {
                    log::info!("Shutdown signal received during update, exiting");
                    return;
                }
            }
        }
    }

    async fn cycle(&self) -> Result<OutputRecord, UpdateError> {
        let units = self.config.units()?;
        let url = self.url.as_deref().ok_or(ConfigError::MissingStation)?;

        let response = self.fetcher.fetch(url).await?;
        let observation = Observation::from_response(&response)?;

        normalize(&observation, units)
    }
}

/// Convert an observation into display values for the given unit system.
///
/// The returned record has an empty `update_error`.
pub fn normalize(observation: &Observation, units: Units) -> Result<OutputRecord, UpdateError> {
    let observation_time = observation
        .observed_at()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S%:z").to_string())
        .unwrap_or_default();

    let heat_index = observation.require(Field::HeatIndex)?;
    let wind_deg = observation.require(Field::WindDirection)?;
    let wind_speed = observation.require(Field::WindSpeed)?;
    let wind_gust = observation.value(Field::WindGust);
    let pressure = observation.require(Field::BarometricPressure)?;
    let visibility = observation.require(Field::Visibility)?;
    let humidity = observation.require(Field::RelativeHumidity)?;

    let wind_direction = compass_direction(finite("windDirection", wind_deg)?);

    // Metric temperatures pass through untouched, so only imperial needs them.
    let (current_temp, high_temp, low_temp, dewpoint) = match units {
        Units::Imperial => {
            let fahrenheit = |field: Field| -> Result<String, UpdateError> {
                let value = to_fahrenheit(observation.require(field)?);
                Ok(display_float(finite(field.key(), value)?))
            };
            let extreme = display_float(to_fahrenheit(HIGH_LOW_UNAVAILABLE));
            (
                fahrenheit(Field::Temperature)?,
                extreme.clone(),
                extreme,
                fahrenheit(Field::Dewpoint)?,
            )
        }
        Units::Metric => {
            let celsius = |field: Field| {
                observation
                    .value(field)
                    .map(display_float)
                    .unwrap_or_default()
            };
            let extreme = display_int(HIGH_LOW_UNAVAILABLE);
            (
                celsius(Field::Temperature),
                extreme.clone(),
                extreme,
                celsius(Field::Dewpoint),
            )
        }
    };

    let (heat_index, wind_speed, wind_gust, pressure, visibility) = match units {
        Units::Imperial => (
            to_fahrenheit(heat_index),
            round_half_even(wind_speed / KPH_PER_MPH),
            wind_gust.map(|g| round_half_even(g / KPH_PER_MPH)),
            round_half_even(pressure / PA_PER_INHG),
            round_half_even(visibility / M_PER_MILE),
        ),
        Units::Metric => (
            round_to(heat_index, 1),
            round_half_even(wind_speed),
            wind_gust.map(round_half_even),
            round_half_even(pressure / PA_PER_HPA),
            round_half_even(visibility / M_PER_KM),
        ),
    };

    Ok(OutputRecord {
        text_description: observation.text_description.clone().unwrap_or_default(),
        observation_time,
        current_temp,
        high_temp,
        low_temp,
        dewpoint,
        temp_unit: units.temperature().to_string(),
        wind_direction: wind_direction.to_string(),
        wind_speed: whole("windSpeed", wind_speed)?,
        wind_gust: match wind_gust {
            Some(gust) => whole("windGust", gust)?,
            None => String::new(),
        },
        wind_unit: units.wind().to_string(),
        pressure: whole("barometricPressure", pressure)?,
        pressure_unit: units.pressure().to_string(),
        visibility: whole("visibility", visibility)?,
        visibility_unit: units.visibility().to_string(),
        humidity: format!("{}%", whole("relativeHumidity", round_half_even(humidity))?),
        heat_index: display_float(finite("heatIndex", heat_index)?),
        update_error: String::new(),
    })
}

/// Reject values that overflowed during conversion.
fn finite(name: &str, value: f64) -> Result<f64, UpdateError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(UpdateError::Unhandled(format!(
            "'{}' is not a finite number after conversion",
            name
        )))
    }
}

/// Render a rounded value as an integer, rejecting values an `i64` cannot hold.
fn whole(name: &str, value: f64) -> Result<String, UpdateError> {
    let value = finite(name, value)?;
    if value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return Err(UpdateError::Unhandled(format!(
            "'{}' is out of range after conversion",
            name
        )));
    }
    Ok(display_int(value))
}

fn log_failure(error: &UpdateError) {
    match error {
        UpdateError::Config(ConfigError::InvalidUnits(_)) => log::error!(
            "{}! See the documentation for more information.",
            error
        ),
        UpdateError::Config(_) => log::error!(
            "A station_code is required to check weather.gov. See the \
             documentation for more information."
        ),
        UpdateError::Fetch(_) => log::error!(
            "Failed to read weather data from page ({}). Run module with debug \
             logging to get more information.",
            error
        ),
        UpdateError::Schema(_) => log::error!(
            "Failed to retrieve current conditions from API response ({}). Run \
             module with debug logging to get more information.",
            error
        ),
        UpdateError::Unhandled(_) => log::error!(
            "Uncaught error occurred while checking weather: {:?}",
            error
        ),
    }
}
