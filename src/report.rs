//! Report assembly and rendering
//!
//! Runs the scoring engine and the timeline aggregator over one provider
//! payload and bundles the results for display, either as plain text or as
//! JSON. All clock times are shown in the forecast location's zone.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Serialize, Serializer};
use std::fmt;

use crate::data::{
    ForecastEntry, MarineConditions, MoonPhase, ProviderPayload, Tide, WeatherAlert,
    WeatherSnapshot,
};
use crate::score::{uv_description, FishingRating, ScoreEngine, ScoreFactors, MAX_SCORE};
use crate::timeline::TimelineAggregator;

/// Formats an instant as "h:MM AM/PM" in `tz`, e.g. "6:24 PM".
pub fn format_clock(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format("%-I:%M %p").to_string()
}

/// Formats a tide time, appending " (MM/DD)" when it isn't on today's date.
pub fn format_tide_time(instant: DateTime<Utc>, tz: Tz, now: DateTime<Utc>) -> String {
    let local = instant.with_timezone(&tz);
    let clock = format_clock(instant, tz);
    if local.date_naive() == now.with_timezone(&tz).date_naive() {
        clock
    } else {
        format!("{} ({})", clock, local.format("%m/%d"))
    }
}

fn serialize_tz<S: Serializer>(tz: &Tz, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(tz.name())
}

/// Everything shown for one location at one instant
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub location: Option<String>,
    #[serde(serialize_with = "serialize_tz")]
    pub timezone: Tz,
    pub generated_at: DateTime<Utc>,
    pub score: u8,
    pub rating: FishingRating,
    pub factors: ScoreFactors,
    pub weather: WeatherSnapshot,
    pub marine: MarineConditions,
    pub moon_phase: MoonPhase,
    pub moon_illumination: Option<f64>,
    pub timeline: Vec<ForecastEntry>,
    pub tides: Vec<Tide>,
    pub alerts: Vec<WeatherAlert>,
}

impl Report {
    /// Builds a report from a normalized payload.
    ///
    /// The score sees every tide of the first two forecast days; the report
    /// only lists the ones picked for display.
    pub fn build(
        payload: &ProviderPayload,
        engine: &ScoreEngine,
        aggregator: &TimelineAggregator,
        now: DateTime<Utc>,
    ) -> Self {
        let tz = aggregator.timezone();
        let weather = payload.weather_snapshot();
        let marine = payload.marine_conditions(tz, now);
        let moon_phase = payload.moon_phase();
        let all_tides = payload.tides(tz);

        let fishing = engine.breakdown(&weather, &marine, moon_phase, &all_tides, now);

        let (today, next_day) = payload.astro_days();
        let timeline = aggregator.build_hourly(
            &payload.future_hourly(tz, now),
            &today,
            &next_day,
            payload.reference_date(),
            now,
        );

        Report {
            location: payload.location_name(),
            timezone: tz,
            generated_at: now,
            score: fishing.score,
            rating: fishing.rating,
            factors: fishing.factors,
            weather,
            marine,
            moon_phase,
            moon_illumination: payload.moon_illumination(),
            timeline,
            tides: aggregator.select_tides(&all_tides, now),
            alerts: payload.alerts(),
        }
    }

    /// Pretty-printed JSON form of the report.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    fn write_conditions(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let w = &self.weather;
        writeln!(f, "Conditions")?;
        writeln!(
            f,
            "  Air {} (feels like {}), wind {}, pressure {}",
            reading(w.temperature_f, "°F"),
            reading(w.feels_like_f, "°F"),
            reading(w.wind_mph, " mph"),
            reading(w.pressure_mb, " mb"),
        )?;
        let uv = match w.uv_index {
            Some(uv) => format!("{} ({})", uv, uv_description(uv)),
            None => "--".to_string(),
        };
        writeln!(
            f,
            "  Clouds {}, rain {}, UV {}, visibility {}",
            reading(w.cloud_pct, "%"),
            reading(w.precip_mm, " mm"),
            uv,
            reading(w.visibility_miles, " mi"),
        )?;
        writeln!(
            f,
            "  Water {}, swell {} @ {}",
            reading(self.marine.water_temp_f, "°F"),
            reading(self.marine.swell_height_ft, " ft"),
            reading(self.marine.swell_period_secs, " s"),
        )?;
        match self.moon_illumination {
            Some(pct) => writeln!(f, "  Moon {} ({}% lit)", self.moon_phase.label(), pct),
            None => writeln!(f, "  Moon {}", self.moon_phase.label()),
        }
    }

    fn write_timeline(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Timeline")?;
        if self.timeline.is_empty() {
            return writeln!(f, "  No future hourly forecast available");
        }
        for entry in &self.timeline {
            let clock = format_clock(entry.time(), self.timezone);
            match entry {
                ForecastEntry::Hourly(hour) => writeln!(
                    f,
                    "  {:>8}  {:<6} {:<10} {}",
                    clock,
                    reading(hour.temp_f, "°F"),
                    reading(hour.wind_mph, " mph"),
                    hour.condition.text,
                )?,
                ForecastEntry::Celestial(event) => {
                    writeln!(f, "  {:>8}  {}", clock, event.kind.label())?
                }
            }
        }
        Ok(())
    }

    fn write_tides(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Tides")?;
        if self.tides.is_empty() {
            return writeln!(f, "  No tide data");
        }
        for tide in &self.tides {
            writeln!(
                f,
                "  {:<4}  {}  {} m",
                tide.kind.label(),
                format_tide_time(tide.time, self.timezone, self.generated_at),
                tide.height_m,
            )?;
        }
        Ok(())
    }

    fn write_alerts(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Alerts")?;
        if self.alerts.is_empty() {
            return writeln!(f, "  None");
        }
        for alert in &self.alerts {
            let headline = alert.headline.as_deref().unwrap_or("Weather alert");
            match alert.severity.as_deref() {
                Some(severity) => writeln!(f, "  {} ({})", headline, severity)?,
                None => writeln!(f, "  {}", headline)?,
            }
        }
        Ok(())
    }
}

/// A reading with its unit, or "--" when absent.
fn reading(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{}{}", v, unit),
        None => "--".to_string(),
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({})",
            self.location.as_deref().unwrap_or("Unknown location"),
            self.timezone.name()
        )?;
        writeln!(
            f,
            "Fishing score: {}/{} ({})",
            self.score,
            MAX_SCORE,
            self.rating.label()
        )?;
        for (label, adjustment) in self.factors.entries() {
            if let Some(adjustment) = adjustment {
                writeln!(f, "  {:<18} {:+}", label, adjustment)?;
            }
        }
        writeln!(f)?;
        self.write_conditions(f)?;
        writeln!(f)?;
        self.write_timeline(f)?;
        writeln!(f)?;
        self.write_tides(f)?;
        writeln!(f)?;
        self.write_alerts(f)
    }
}
