//! Core data models for the Fishly forecast core
//!
//! This module contains the normalized records the scoring engine and the
//! timeline aggregator read. Provider payloads are converted into these types
//! by [`provider`]; nothing in here is fetched, cached or mutated by the core.

pub mod astro;
pub mod provider;

pub use astro::{parse_clock_time, AstroDayInfo, CelestialKind, MoonPhase};
pub use provider::{ProviderError, ProviderPayload, WeatherAlert};

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Resolves a wall-clock date-time in the location zone to an instant.
///
/// Returns `None` for local times skipped by a DST transition. Times repeated
/// by a transition resolve to the earlier instant.
pub fn local_to_utc(naive: NaiveDateTime, tz: Tz) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}

/// Current atmospheric conditions at the forecast location
///
/// Every reading is optional. A missing or non-numeric provider value is
/// `None`, never `0.0`, so the scoring engine can skip the dimension.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Air temperature in °F
    pub temperature_f: Option<f64>,
    /// Feels-like temperature in °F
    pub feels_like_f: Option<f64>,
    /// Barometric pressure in millibars
    pub pressure_mb: Option<f64>,
    /// Wind speed in mph
    pub wind_mph: Option<f64>,
    /// Cloud cover percentage (0-100)
    pub cloud_pct: Option<f64>,
    /// Precipitation in millimeters
    pub precip_mm: Option<f64>,
    /// UV index
    pub uv_index: Option<f64>,
    /// Visibility in miles
    pub visibility_miles: Option<f64>,
}

/// Water-specific readings from the most relevant marine sample
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MarineConditions {
    /// Water temperature in °F
    pub water_temp_f: Option<f64>,
    /// Significant swell height in feet
    pub swell_height_ft: Option<f64>,
    /// Swell period in seconds
    pub swell_period_secs: Option<f64>,
}

/// High or low water
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TideType {
    High,
    Low,
}

impl TideType {
    /// Parses a provider tide label ("HIGH", "low", ...), case-insensitively.
    pub fn from_label(label: &str) -> Option<TideType> {
        match label.trim().to_lowercase().as_str() {
            "high" => Some(TideType::High),
            "low" => Some(TideType::Low),
            _ => None,
        }
    }

    /// Display label as the provider spells it.
    pub fn label(&self) -> &'static str {
        match self {
            TideType::High => "HIGH",
            TideType::Low => "LOW",
        }
    }
}

/// A single high or low tide event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tide {
    /// Instant of the tide event
    pub time: DateTime<Utc>,
    /// High or low water
    pub kind: TideType,
    /// Height in meters, kept as the provider's display text
    pub height_m: String,
}

/// Weather condition as the provider describes it
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Condition {
    /// Human-readable text, e.g. "Partly cloudy"
    pub text: String,
    /// Icon reference supplied by the provider
    pub icon: String,
}

/// One hour of forecast data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlySample {
    /// Start of the forecast hour
    pub time: DateTime<Utc>,
    /// Whether the sun is up during this hour
    pub is_day: bool,
    /// Precipitation in millimeters
    pub precip_mm: Option<f64>,
    /// Air temperature in °F
    pub temp_f: Option<f64>,
    /// Sky condition
    pub condition: Condition,
    /// Wind speed in mph
    pub wind_mph: Option<f64>,
}

/// A sunrise, sunset, moonrise or moonset at an absolute instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CelestialEvent {
    /// Instant of the event
    pub time: DateTime<Utc>,
    /// Which event this is
    pub kind: CelestialKind,
}

/// An entry of the display timeline
///
/// The `type` tag is explicit in the serialized form so a renderer can
/// dispatch without looking at which fields are present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ForecastEntry {
    /// Hourly forecast sample
    Hourly(HourlySample),
    /// Derived celestial event
    Celestial(CelestialEvent),
}

impl ForecastEntry {
    /// The instant this entry is placed at on the timeline.
    pub fn time(&self) -> DateTime<Utc> {
        match self {
            ForecastEntry::Hourly(sample) => sample.time,
            ForecastEntry::Celestial(event) => event.time,
        }
    }

    /// Returns the celestial event if this entry is one.
    pub fn as_celestial(&self) -> Option<&CelestialEvent> {
        match self {
            ForecastEntry::Celestial(event) => Some(event),
            ForecastEntry::Hourly(_) => None,
        }
    }
}
