//! Current conditions from api.weather.gov for status bars.
//!
//! Each update cycle fetches the latest observation for one station,
//! converts it to the configured unit system and writes the result into an
//! [`OutputRecord`] of display strings. Failed cycles set the configured
//! error marker and keep the last good values.
//!
//! ```rust,ignore
//! let config = Config::parse("station_code: KNYC\nunits: imperial")?;
//! let mut weather = WeatherGov::new(config, HttpFetcher::new()?);
//! weather.check_weather().await.ok();
//! println!("{}{}", weather.record().current_temp, weather.record().temp_unit);
//! ```

pub mod config;
pub mod convert;
pub mod error;
pub mod fetcher;
pub mod observation;
pub mod record;
pub mod updater;

pub use config::{Config, ConfigError, Units};
pub use error::{ErrorKind, UpdateError};
pub use fetcher::{Fetch, FetchError, HttpFetcher};
pub use observation::{Field, Observation};
pub use record::OutputRecord;
pub use updater::{normalize, WeatherGov};
