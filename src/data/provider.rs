//! Provider payload boundary
//!
//! The surrounding application assembles a combined weather/marine/astronomy
//! payload from its third-party provider. This module deserializes that
//! payload into explicit structs and converts it into the normalized records
//! in [`crate::data`].
//!
//! Provider JSON is loosely typed: numbers arrive as numbers, as numeric
//! strings, or as placeholders like `"N/A"`. Every scalar is therefore read
//! leniently, and anything that isn't a usable number becomes `None` instead
//! of failing the whole payload or turning into `0`. A numeric string counts
//! when it starts with a number ("0.3 mm", "5mph"); only that prefix is read.
//! Nested objects and lists given as `null` read as empty, and `null` list
//! elements are skipped.

use std::collections::HashSet;
use std::io::Read;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::{
    local_to_utc, AstroDayInfo, Condition, HourlySample, MarineConditions, MoonPhase, Tide,
    TideType, WeatherSnapshot,
};

/// Local date-time layout used by the provider, e.g. "2025-03-03 14:00"
const LOCAL_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Calendar date layout used by the provider, e.g. "2025-03-03"
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Errors that can occur when reading a provider payload
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Reading the payload failed
    #[error("Failed to read payload: {0}")]
    Io(#[from] std::io::Error),

    /// The payload is not structurally valid JSON for this schema
    #[error("Failed to parse payload: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Combined provider payload for one location
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProviderPayload {
    #[serde(deserialize_with = "lenient_struct")]
    pub location: Location,
    #[serde(deserialize_with = "lenient_struct")]
    pub forecast: ForecastSection,
    #[serde(deserialize_with = "lenient_struct")]
    pub marine: MarineSection,
}

/// Forecast location metadata
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Location {
    #[serde(deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub region: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub country: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub lat: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub lon: Option<f64>,
    /// IANA zone of the location, e.g. "America/New_York"
    #[serde(deserialize_with = "lenient_text")]
    pub tz_id: Option<String>,
}

/// Current conditions plus active alerts
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ForecastSection {
    #[serde(deserialize_with = "lenient_struct")]
    pub current: CurrentConditions,
    pub alerts: AlertList,
}

/// Current atmospheric conditions as the provider reports them
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CurrentConditions {
    #[serde(deserialize_with = "lenient_f64")]
    pub temp_f: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub feelslike_f: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub wind_mph: Option<f64>,
    #[serde(deserialize_with = "lenient_text")]
    pub wind_dir: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub gust_mph: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub pressure_mb: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub cloud: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub humidity: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub precip_mm: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub uv: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub vis_miles: Option<f64>,
    #[serde(deserialize_with = "lenient_struct")]
    pub condition: ProviderCondition,
}

/// Sky condition text and icon
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProviderCondition {
    #[serde(deserialize_with = "lenient_text")]
    pub text: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub icon: Option<String>,
}

/// Alerts arrive either as a bare list or wrapped in `{ "alert": [...] }`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum AlertList {
    Flat(#[serde(deserialize_with = "lenient_list")] Vec<WeatherAlert>),
    Wrapped {
        #[serde(deserialize_with = "lenient_list")]
        alert: Vec<WeatherAlert>,
    },
    Other(IgnoredAny),
}

impl Default for AlertList {
    fn default() -> Self {
        AlertList::Flat(Vec::new())
    }
}

impl AlertList {
    fn as_slice(&self) -> &[WeatherAlert] {
        match self {
            AlertList::Flat(alerts) | AlertList::Wrapped { alert: alerts } => alerts,
            AlertList::Other(_) => &[],
        }
    }
}

/// A weather alert issued for the location
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherAlert {
    #[serde(deserialize_with = "lenient_text")]
    pub headline: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub severity: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub urgency: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub areas: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub event: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub effective: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub expires: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub desc: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub instruction: Option<String>,
}

/// Marine forecast wrapper
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MarineSection {
    #[serde(deserialize_with = "lenient_struct")]
    pub forecast: MarineForecast,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MarineForecast {
    #[serde(deserialize_with = "lenient_list")]
    pub forecastday: Vec<ForecastDay>,
}

/// One forecast day: astronomy, daily tides and hourly samples
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ForecastDay {
    #[serde(deserialize_with = "lenient_text")]
    pub date: Option<String>,
    #[serde(deserialize_with = "lenient_struct")]
    pub astro: ProviderAstro,
    #[serde(deserialize_with = "lenient_struct")]
    pub day: ProviderDay,
    #[serde(deserialize_with = "lenient_list")]
    pub hour: Vec<ProviderHour>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProviderAstro {
    #[serde(deserialize_with = "lenient_text")]
    pub sunrise: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub sunset: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub moonrise: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub moonset: Option<String>,
    #[serde(deserialize_with = "lenient_text")]
    pub moon_phase: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub moon_illumination: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProviderDay {
    #[serde(deserialize_with = "lenient_list")]
    pub tides: Vec<TideGroup>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TideGroup {
    #[serde(deserialize_with = "lenient_list")]
    pub tide: Vec<ProviderTide>,
}

/// Raw tide event; both the long and the short field spellings are accepted
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProviderTide {
    #[serde(alias = "time", deserialize_with = "lenient_text")]
    pub tide_time: Option<String>,
    #[serde(alias = "type", deserialize_with = "lenient_text")]
    pub tide_type: Option<String>,
    #[serde(alias = "height_mt", deserialize_with = "lenient_text")]
    pub tide_height_mt: Option<String>,
}

/// Raw hourly sample carrying both atmospheric and marine readings
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProviderHour {
    #[serde(deserialize_with = "lenient_f64")]
    pub time_epoch: Option<f64>,
    #[serde(deserialize_with = "lenient_text")]
    pub time: Option<String>,
    #[serde(deserialize_with = "lenient_f64")]
    pub is_day: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub temp_f: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub precip_mm: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub wind_mph: Option<f64>,
    #[serde(deserialize_with = "lenient_struct")]
    pub condition: ProviderCondition,
    #[serde(deserialize_with = "lenient_f64")]
    pub water_temp_f: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub swell_ht_ft: Option<f64>,
    #[serde(deserialize_with = "lenient_f64")]
    pub swell_period_secs: Option<f64>,
    #[serde(deserialize_with = "lenient_text")]
    pub swell_dir_16_point: Option<String>,
}

impl ProviderHour {
    /// Instant of this hour: the epoch field when present, else the local
    /// time string resolved in the location zone.
    fn instant(&self, tz: Tz) -> Option<DateTime<Utc>> {
        if let Some(epoch) = self.time_epoch {
            if let Some(instant) = Utc.timestamp_opt(epoch as i64, 0).single() {
                return Some(instant);
            }
        }
        let raw = self.time.as_deref()?;
        let instant = parse_provider_datetime(raw, tz);
        if instant.is_none() {
            debug!(time = raw, "dropping hourly sample with unparseable time");
        }
        instant
    }

    fn to_sample(&self, time: DateTime<Utc>) -> HourlySample {
        HourlySample {
            time,
            is_day: self.is_day.map(|flag| flag >= 1.0).unwrap_or(false),
            precip_mm: self.precip_mm,
            temp_f: self.temp_f,
            condition: Condition {
                text: self.condition.text.clone().unwrap_or_default(),
                icon: self.condition.icon.clone().unwrap_or_default(),
            },
            wind_mph: self.wind_mph,
        }
    }

    fn to_marine(&self) -> MarineConditions {
        MarineConditions {
            water_temp_f: self.water_temp_f,
            swell_height_ft: self.swell_ht_ft,
            swell_period_secs: self.swell_period_secs,
        }
    }
}

impl ForecastDay {
    fn astro_info(&self) -> AstroDayInfo {
        AstroDayInfo {
            sunrise: self.astro.sunrise.clone(),
            sunset: self.astro.sunset.clone(),
            moonrise: self.astro.moonrise.clone(),
            moonset: self.astro.moonset.clone(),
        }
    }
}

impl ProviderPayload {
    /// Parses a payload from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ProviderError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parses a payload from any reader (a file, stdin, ...).
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ProviderError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Display name of the location, e.g. "Key West, Florida".
    pub fn location_name(&self) -> Option<String> {
        match (&self.location.name, &self.location.region) {
            (Some(name), Some(region)) if !region.is_empty() => Some(format!("{name}, {region}")),
            (Some(name), _) => Some(name.clone()),
            (None, _) => None,
        }
    }

    /// Resolves the zone that anchors every local time in this payload.
    ///
    /// Uses the location's `tz_id`, then `fallback`, then UTC.
    pub fn timezone(&self, fallback: Option<Tz>) -> Tz {
        if let Some(tz_id) = self.location.tz_id.as_deref() {
            match tz_id.parse::<Tz>() {
                Ok(tz) => return tz,
                Err(_) => warn!(tz_id, "ignoring unrecognized location timezone"),
            }
        }
        fallback.unwrap_or(chrono_tz::UTC)
    }

    /// Current conditions as a [`WeatherSnapshot`].
    pub fn weather_snapshot(&self) -> WeatherSnapshot {
        let current = &self.forecast.current;
        WeatherSnapshot {
            temperature_f: current.temp_f,
            feels_like_f: current.feelslike_f,
            pressure_mb: current.pressure_mb,
            wind_mph: current.wind_mph,
            cloud_pct: current.cloud,
            precip_mm: current.precip_mm,
            uv_index: current.uv,
            visibility_miles: current.vis_miles,
        }
    }

    /// Hours of the first two forecast days that are still ahead of `now`
    ///
    /// Only hours whose local date is today or tomorrow (in `tz`, relative to
    /// `now`) are kept. Sorted ascending; hours with a bad timestamp are dropped.
    pub fn future_hourly(&self, tz: Tz, now: DateTime<Utc>) -> Vec<HourlySample> {
        self.future_hours(tz, now)
            .into_iter()
            .map(|(time, hour)| hour.to_sample(time))
            .collect()
    }

    /// The most temporally relevant marine sample
    ///
    /// The first future hour, else the first hour of the first forecast day,
    /// else all readings absent.
    pub fn marine_conditions(&self, tz: Tz, now: DateTime<Utc>) -> MarineConditions {
        if let Some((_, hour)) = self.future_hours(tz, now).first() {
            return hour.to_marine();
        }
        self.days()
            .first()
            .and_then(|day| day.hour.first())
            .map(ProviderHour::to_marine)
            .unwrap_or_default()
    }

    /// Tide events from the first two forecast days
    ///
    /// Events whose time or type can't be read are dropped.
    pub fn tides(&self, tz: Tz) -> Vec<Tide> {
        self.days()
            .iter()
            .take(2)
            .filter_map(|day| day.day.tides.first())
            .flat_map(|group| group.tide.iter())
            .filter_map(|raw| convert_tide(raw, tz))
            .collect()
    }

    /// Moon phase of the first forecast day.
    pub fn moon_phase(&self) -> MoonPhase {
        self.days()
            .first()
            .and_then(|day| day.astro.moon_phase.as_deref())
            .map(MoonPhase::from_label)
            .unwrap_or(MoonPhase::Unknown)
    }

    /// Moon illumination percentage of the first forecast day.
    pub fn moon_illumination(&self) -> Option<f64> {
        self.days().first().and_then(|day| day.astro.moon_illumination)
    }

    /// Astronomy clock-times for the first forecast day and the day after.
    pub fn astro_days(&self) -> (AstroDayInfo, AstroDayInfo) {
        let days = self.days();
        let today = days.first().map(ForecastDay::astro_info).unwrap_or_default();
        let next_day = days.get(1).map(ForecastDay::astro_info).unwrap_or_default();
        (today, next_day)
    }

    /// Calendar date of the first forecast day.
    pub fn reference_date(&self) -> Option<NaiveDate> {
        let raw = self.days().first()?.date.as_deref()?;
        NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
    }

    /// Alerts with repeated headlines removed; the first occurrence wins.
    pub fn alerts(&self) -> Vec<WeatherAlert> {
        let mut seen = HashSet::new();
        self.forecast
            .alerts
            .as_slice()
            .iter()
            .filter(|alert| seen.insert(alert.headline.clone()))
            .cloned()
            .collect()
    }

    fn days(&self) -> &[ForecastDay] {
        &self.marine.forecast.forecastday
    }

    fn future_hours(&self, tz: Tz, now: DateTime<Utc>) -> Vec<(DateTime<Utc>, &ProviderHour)> {
        let today = now.with_timezone(&tz).date_naive();
        let tomorrow = today + Duration::days(1);

        let mut hours: Vec<(DateTime<Utc>, &ProviderHour)> = self
            .days()
            .iter()
            .take(2)
            .flat_map(|day| day.hour.iter())
            .filter_map(|hour| hour.instant(tz).map(|time| (time, hour)))
            .filter(|(time, _)| {
                let local_date = time.with_timezone(&tz).date_naive();
                (local_date == today || local_date == tomorrow) && *time > now
            })
            .collect();

        hours.sort_by_key(|(time, _)| *time);
        hours
    }
}

/// Parse a provider timestamp: "2025-03-03 14:00" in `tz`, or RFC 3339
fn parse_provider_datetime(raw: &str, tz: Tz) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, LOCAL_DATETIME_FORMAT) {
        return local_to_utc(naive, tz);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn convert_tide(raw: &ProviderTide, tz: Tz) -> Option<Tide> {
    let Some(time) = raw
        .tide_time
        .as_deref()
        .and_then(|t| parse_provider_datetime(t, tz))
    else {
        debug!(time = ?raw.tide_time, "dropping tide with unparseable time");
        return None;
    };
    let Some(kind) = raw.tide_type.as_deref().and_then(TideType::from_label) else {
        debug!(kind = ?raw.tide_type, "dropping tide with unknown type");
        return None;
    };

    Some(Tide {
        time,
        kind,
        height_m: raw
            .tide_height_mt
            .clone()
            .unwrap_or_else(|| "N/A".to_string()),
    })
}

/// Parses the number at the start of `text`, ignoring whatever follows it.
///
/// Accepts an optional sign, digits with an optional fraction and an optional
/// exponent: "12abc" reads as 12, "-0.5 ft" as -0.5, "N/A" as nothing.
fn leading_number(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let digits_in = |mut i: usize| {
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        i
    };

    let sign_end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let int_end = digits_in(sign_end);
    let mut end = int_end;
    if bytes.get(end) == Some(&b'.') {
        end = digits_in(end + 1);
    }
    // a lone sign or dot is not a number
    if int_end == sign_end && end <= int_end + 1 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let exp_start = end + 1 + usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
        let exp_end = digits_in(exp_start);
        if exp_end > exp_start {
            end = exp_end;
        }
    }

    text[..end].parse().ok()
}

/// Reads a JSON number or a numeric string; everything else is `None`.
fn numeric(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => leading_number(text),
        _ => None,
    };
    if parsed.is_none() && !value.is_null() {
        debug!(%value, "treating non-numeric reading as missing");
    }
    parsed.filter(|v: &f64| v.is_finite())
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(numeric(&value))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    })
}

fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let items = Option::<Vec<Option<T>>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(items.into_iter().flatten().collect())
}

fn lenient_struct<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
