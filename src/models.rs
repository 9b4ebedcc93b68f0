//! Simple data models for the weather-station simulator.

use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize, Serializer};

// ---

pub const TEMPERATURE_RANGE: (f64, f64) = (15.0, 40.0);
pub const HUMIDITY_RANGE: (f64, f64) = (30.0, 90.0);
pub const PRESSURE_RANGE: (f64, f64) = (950.0, 1050.0);

/// Reference sea-level pressure used by the altitude derivation, in hPa.
pub const SEA_LEVEL_PRESSURE_HPA: f64 = 1013.25;

/// Approximate altitude in meters for an atmospheric pressure in hPa.
pub fn barometric_altitude(pressure_hpa: f64) -> f64 {
    44330.0 * (1.0 - (pressure_hpa / SEA_LEVEL_PRESSURE_HPA).powf(0.1903))
}

/// Round `value` to `decimals` decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Serialize a timestamp as ISO-8601 UTC with millisecond precision.
pub fn serialize_iso_millis<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// One tick's worth of random-walk deltas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perturbation {
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
}

impl Perturbation {
    /// Draw temperature, humidity and pressure deltas, in that order.
    pub fn sample<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self {
            temperature: rng.random_range(-1.0..1.0),
            humidity: rng.random_range(-2.5..2.5),
            pressure: rng.random_range(-1.0..1.0),
        }
    }
}

/// Live, unrounded sensor state.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorState {
    // ---
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub altitude: f64,
    pub last_update: DateTime<Utc>,
}

impl SensorState {
    /// Seed values the station boots with.
    pub fn initial(now: DateTime<Utc>) -> Self {
        Self {
            temperature: 25.5,
            humidity: 65.2,
            pressure: 1013.25,
            altitude: 850.0,
            last_update: now,
        }
    }

    /// Apply one random-walk step.
    ///
    /// Altitude is derived from the perturbed pressure before it is clamped.
    pub fn apply(&mut self, delta: Perturbation, now: DateTime<Utc>) {
        // ---
        self.temperature += delta.temperature;
        self.humidity += delta.humidity;
        self.pressure += delta.pressure;
        self.altitude = barometric_altitude(self.pressure);
        self.last_update = now;

        self.temperature = self.temperature.clamp(TEMPERATURE_RANGE.0, TEMPERATURE_RANGE.1);
        self.humidity = self.humidity.clamp(HUMIDITY_RANGE.0, HUMIDITY_RANGE.1);
        self.pressure = self.pressure.clamp(PRESSURE_RANGE.0, PRESSURE_RANGE.1);
    }

    /// Precision-rounded copy safe to hand to callers.
    pub fn to_snapshot(&self) -> SensorSnapshot {
        SensorSnapshot {
            temperature: round_to(self.temperature, 1),
            humidity: round_to(self.humidity, 1),
            pressure: round_to(self.pressure, 2),
            // `+ 0.0` turns the -0.0 of just-above-sea-level readings into 0.0.
            altitude: self.altitude.round() + 0.0,
            timestamp: self.last_update,
        }
    }
}

/// Rounded, immutable view of [`SensorState`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorSnapshot {
    // ---
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub altitude: f64,
    #[serde(serialize_with = "serialize_iso_millis")]
    pub timestamp: DateTime<Utc>,
}

/// Operator-tunable temperature limits and calibration offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdConfig {
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub temp_offset: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            min_temperature: 10.0,
            max_temperature: 70.0,
            temp_offset: 0.0,
        }
    }
}

/// Body of `GET /api/weather`: the live reading next to the thresholds.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReport {
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    pub altitude: f64,
    pub min_temperature: f64,
    pub max_temperature: f64,
    pub temp_offset: f64,
    #[serde(serialize_with = "serialize_iso_millis")]
    pub timestamp: DateTime<Utc>,
}

impl WeatherReport {
    pub fn new(reading: SensorSnapshot, limits: ThresholdConfig) -> Self {
        Self {
            temperature: reading.temperature,
            humidity: reading.humidity,
            pressure: reading.pressure,
            altitude: reading.altitude,
            min_temperature: limits.min_temperature,
            max_temperature: limits.max_temperature,
            temp_offset: limits.temp_offset,
            timestamp: reading.timestamp,
        }
    }
}

/// One synthesized point of `GET /api/history`.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryPoint {
    #[serde(serialize_with = "serialize_iso_millis")]
    pub timestamp: DateTime<Utc>,
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
}
