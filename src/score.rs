//! Fishing favorability scoring engine
//!
//! Scores start from a baseline of 100 and every observed dimension adds an
//! independent adjustment. Dimensions whose reading is missing contribute
//! nothing. The total is clamped to `0..=150`.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::data::{MarineConditions, MoonPhase, Tide, WeatherSnapshot};

/// Score before any adjustment
pub const BASELINE_SCORE: i32 = 100;

/// Upper bound of the favorability score
pub const MAX_SCORE: u8 = 150;

/// A tide this close to "now" counts as a feeding window
pub const DEFAULT_TIDE_WINDOW_HOURS: i64 = 2;

/// Verbal rating for a favorability score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FishingRating {
    Exceptional,
    Great,
    Decent,
    Fair,
    Poor,
}

impl FishingRating {
    /// Returns a slice containing all ratings, best first.
    pub fn all() -> &'static [FishingRating] {
        &[
            FishingRating::Exceptional,
            FishingRating::Great,
            FishingRating::Decent,
            FishingRating::Fair,
            FishingRating::Poor,
        ]
    }

    /// Buckets a score: 120+, 90+, 60+, 30+, below.
    pub fn from_score(score: u8) -> FishingRating {
        match score {
            120..=u8::MAX => FishingRating::Exceptional,
            90..=119 => FishingRating::Great,
            60..=89 => FishingRating::Decent,
            30..=59 => FishingRating::Fair,
            _ => FishingRating::Poor,
        }
    }

    /// Returns a human-readable display label for the rating.
    pub fn label(&self) -> &'static str {
        match self {
            FishingRating::Exceptional => "Exceptional Fishing!",
            FishingRating::Great => "Great Fishing!",
            FishingRating::Decent => "Decent Fishing",
            FishingRating::Fair => "Fair Fishing",
            FishingRating::Poor => "Poor Fishing",
        }
    }
}

/// Describes a UV index the way forecasts usually do.
pub fn uv_description(uv: f64) -> &'static str {
    if uv <= 2.0 {
        "Low"
    } else if uv <= 5.0 {
        "Moderate"
    } else if uv <= 7.0 {
        "High"
    } else if uv <= 10.0 {
        "Very High"
    } else {
        "Extreme"
    }
}

/// Per-dimension adjustments that make up a score.
///
/// `None` means the dimension was skipped because its reading was missing;
/// `Some(0)` means it was observed and landed in a neutral band.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreFactors {
    pub wind: Option<i32>,
    pub cloud: Option<i32>,
    pub air_temp: Option<i32>,
    pub pressure: Option<i32>,
    pub precipitation: Option<i32>,
    pub water_temp: Option<i32>,
    pub swell_height: Option<i32>,
    pub swell_period: Option<i32>,
    pub visibility: Option<i32>,
    pub moon: Option<i32>,
    pub uv: Option<i32>,
    pub tide: Option<i32>,
}

impl ScoreFactors {
    /// Labelled adjustments in table order.
    pub fn entries(&self) -> [(&'static str, Option<i32>); 12] {
        [
            ("Wind", self.wind),
            ("Cloud cover", self.cloud),
            ("Air temperature", self.air_temp),
            ("Pressure", self.pressure),
            ("Precipitation", self.precipitation),
            ("Water temperature", self.water_temp),
            ("Swell height", self.swell_height),
            ("Swell period", self.swell_period),
            ("Visibility", self.visibility),
            ("Moon phase", self.moon),
            ("UV index", self.uv),
            ("Tide", self.tide),
        ]
    }

    /// Sum of all observed adjustments.
    pub fn total(&self) -> i32 {
        self.entries().iter().filter_map(|(_, adj)| *adj).sum()
    }
}

/// Final score with its rating and the factors behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FishingScore {
    /// Favorability score (0-150)
    pub score: u8,
    /// Verbal bucket for the score
    pub rating: FishingRating,
    /// Individual adjustments
    pub factors: ScoreFactors,
}

/// Computes fishing favorability from current conditions.
///
/// The engine holds no state between calls; the only setting is how close a
/// tide must be to count.
#[derive(Debug, Clone, Copy)]
pub struct ScoreEngine {
    tide_window: Duration,
}

impl Default for ScoreEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ScoreEngine {
    /// Creates an engine with the standard two-hour tide window.
    pub fn new() -> Self {
        Self {
            tide_window: Duration::hours(DEFAULT_TIDE_WINDOW_HOURS),
        }
    }

    /// Overrides the tide proximity window.
    pub fn with_tide_window(mut self, window: Duration) -> Self {
        self.tide_window = window;
        self
    }

    /// Wind speed in mph: >20 −30, >15 −20, >10 −10, <5 +5.
    pub fn score_wind(&self, mph: f64) -> i32 {
        if mph > 20.0 {
            -30
        } else if mph > 15.0 {
            -20
        } else if mph > 10.0 {
            -10
        } else if mph < 5.0 {
            5
        } else {
            0
        }
    }

    /// Cloud cover %: <20 −15, >80 −10, 30..=70 +10.
    pub fn score_cloud(&self, pct: f64) -> i32 {
        if pct < 20.0 {
            -15
        } else if pct > 80.0 {
            -10
        } else if (30.0..=70.0).contains(&pct) {
            10
        } else {
            0
        }
    }

    /// Air temperature °F: <50/>90 −20, <60/>85 −10, 65..=80 +10.
    pub fn score_air_temp(&self, temp_f: f64) -> i32 {
        if !(50.0..=90.0).contains(&temp_f) {
            -20
        } else if !(60.0..=85.0).contains(&temp_f) {
            -10
        } else if (65.0..=80.0).contains(&temp_f) {
            10
        } else {
            0
        }
    }

    /// Pressure mb: >1020 −15, <1000 −10, 1005..=1015 +15.
    pub fn score_pressure(&self, mb: f64) -> i32 {
        if mb > 1020.0 {
            -15
        } else if mb < 1000.0 {
            -10
        } else if (1005.0..=1015.0).contains(&mb) {
            15
        } else {
            0
        }
    }

    /// Precipitation mm: >2 −20, >0.5 −10, any light rain +5.
    pub fn score_precipitation(&self, mm: f64) -> i32 {
        if mm > 2.0 {
            -20
        } else if mm > 0.5 {
            -10
        } else if mm > 0.0 {
            5
        } else {
            0
        }
    }

    /// Water temperature °F: <60/>85 −15, 65..=80 +10.
    pub fn score_water_temp(&self, temp_f: f64) -> i32 {
        if !(60.0..=85.0).contains(&temp_f) {
            -15
        } else if (65.0..=80.0).contains(&temp_f) {
            10
        } else {
            0
        }
    }

    /// Swell height ft: >5 −20, >3 −10, <1 +5.
    pub fn score_swell_height(&self, ft: f64) -> i32 {
        if ft > 5.0 {
            -20
        } else if ft > 3.0 {
            -10
        } else if ft < 1.0 {
            5
        } else {
            0
        }
    }

    /// Swell period s: <5 −10, ≥8 +10.
    pub fn score_swell_period(&self, secs: f64) -> i32 {
        if secs < 5.0 {
            -10
        } else if secs >= 8.0 {
            10
        } else {
            0
        }
    }

    /// Visibility miles: >10 −10, <2 −15, 4..=8 +5.
    pub fn score_visibility(&self, miles: f64) -> i32 {
        if miles > 10.0 {
            -10
        } else if miles < 2.0 {
            -15
        } else if (4.0..=8.0).contains(&miles) {
            5
        } else {
            0
        }
    }

    /// Moon phase: full or new +10, quarters +5. Unknown phases are skipped.
    pub fn score_moon(&self, phase: MoonPhase) -> Option<i32> {
        match phase {
            MoonPhase::Unknown => None,
            MoonPhase::FullMoon | MoonPhase::NewMoon => Some(10),
            p if p.is_quarter() => Some(5),
            _ => Some(0),
        }
    }

    /// UV index: >8 −10, <3 +5.
    pub fn score_uv(&self, uv: f64) -> i32 {
        if uv > 8.0 {
            -10
        } else if uv < 3.0 {
            5
        } else {
            0
        }
    }

    /// +15 when the closest tide is within the tide window of `now`.
    ///
    /// Returns `None` when there are no tides at all.
    pub fn score_tide(&self, tides: &[Tide], now: DateTime<Utc>) -> Option<i32> {
        let closest = tides
            .iter()
            .map(|tide| (tide.time - now).abs())
            .min()?;
        Some(if closest <= self.tide_window { 15 } else { 0 })
    }

    /// Scores conditions and keeps the per-dimension breakdown.
    pub fn breakdown(
        &self,
        weather: &WeatherSnapshot,
        marine: &MarineConditions,
        moon: MoonPhase,
        tides: &[Tide],
        now: DateTime<Utc>,
    ) -> FishingScore {
        let factors = ScoreFactors {
            wind: observed(weather.wind_mph).map(|v| self.score_wind(v)),
            cloud: observed(weather.cloud_pct).map(|v| self.score_cloud(v)),
            air_temp: observed(weather.temperature_f).map(|v| self.score_air_temp(v)),
            pressure: observed(weather.pressure_mb).map(|v| self.score_pressure(v)),
            precipitation: observed(weather.precip_mm).map(|v| self.score_precipitation(v)),
            water_temp: observed(marine.water_temp_f).map(|v| self.score_water_temp(v)),
            swell_height: observed(marine.swell_height_ft).map(|v| self.score_swell_height(v)),
            swell_period: observed(marine.swell_period_secs).map(|v| self.score_swell_period(v)),
            visibility: observed(weather.visibility_miles).map(|v| self.score_visibility(v)),
            moon: self.score_moon(moon),
            uv: observed(weather.uv_index).map(|v| self.score_uv(v)),
            tide: self.score_tide(tides, now),
        };

        let score = (BASELINE_SCORE + factors.total()).clamp(0, MAX_SCORE as i32) as u8;

        FishingScore {
            score,
            rating: FishingRating::from_score(score),
            factors,
        }
    }

    /// Computes the favorability score (0-150).
    pub fn compute(
        &self,
        weather: &WeatherSnapshot,
        marine: &MarineConditions,
        moon: MoonPhase,
        tides: &[Tide],
        now: DateTime<Utc>,
    ) -> u8 {
        self.breakdown(weather, marine, moon, tides, now).score
    }
}

/// A reading only counts when it is present and a real number.
fn observed(reading: Option<f64>) -> Option<f64> {
    reading.filter(|v| v.is_finite())
}
