//! Unit conversion and display helpers.
//!
//! Rounding follows round-half-to-even, so `round_half_even(2.5)` is `2` and
//! `round_half_even(3.5)` is `4`.

/// Compass labels, one per 45° sector starting at north.
const DIRECTIONS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

/// The observation endpoint carries no daily extremes, so high and low
/// temperatures are reported as this constant (in °C, before conversion).
pub const HIGH_LOW_UNAVAILABLE: f64 = 0.0;

pub fn to_fahrenheit(celsius: f64) -> f64 {
    celsius * 1.8 + 32.0
}

pub fn to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) / 1.8
}

/// Map a heading in degrees to one of eight compass labels.
///
/// Headings outside `[0, 360)` wrap, and a sector index of 8 (anything
/// rounding up to 360°) folds back to `N`.
pub fn compass_direction(degrees: f64) -> &'static str {
    let sector = round_half_even(degrees.rem_euclid(360.0) / 45.0) as usize;
    DIRECTIONS[sector % DIRECTIONS.len()]
}

pub fn round_half_even(value: f64) -> f64 {
    value.round_ties_even()
}

/// Round to `digits` decimal places, ties to even.
pub fn round_to(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (value * scale).round_ties_even() / scale
}

/// Render a float the way status formats expect: integral values keep a
/// trailing `.0`, everything else uses the shortest round-trip form.
pub fn display_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

/// Render an already rounded value as an integer.
pub fn display_int(value: f64) -> String {
    (value as i64).to_string()
}
