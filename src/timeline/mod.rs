//! Display timeline aggregation
//!
//! Merges hourly forecast samples with derived sunrise/sunset/moonrise/moonset
//! instants, and picks the handful of tide events worth showing around now.
//! Every local clock-time is anchored to the forecast location's zone.

mod hourly;
mod tides;

pub use hourly::{celestial_events, resolve_clock_time};
pub use tides::select_relevant;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::data::{AstroDayInfo, ForecastEntry, HourlySample, Tide};

/// Default number of timeline entries shown
pub const DEFAULT_TIMELINE_LIMIT: usize = 12;

/// Builds presentation-ready sequences for one forecast location
#[derive(Debug, Clone, Copy)]
pub struct TimelineAggregator {
    tz: Tz,
    limit: usize,
}

impl TimelineAggregator {
    /// Creates an aggregator anchored to the location zone `tz`.
    pub fn new(tz: Tz) -> Self {
        Self {
            tz,
            limit: DEFAULT_TIMELINE_LIMIT,
        }
    }

    /// Overrides the maximum timeline length.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Zone every local clock-time is resolved in.
    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Maximum number of entries `build_hourly` returns.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Merges future hourly samples with future celestial events
    ///
    /// `samples` are expected to be future-only already. "Today" is
    /// `reference_date` when given, else the local date of the first sample;
    /// `today` astro times are placed on that date and `next_day` ones on the
    /// day after. The result is sorted by instant (ties keep input order,
    /// samples before celestial events) and truncated to the limit. No samples
    /// means nothing to show, so the result is empty.
    pub fn build_hourly(
        &self,
        samples: &[HourlySample],
        today: &AstroDayInfo,
        next_day: &AstroDayInfo,
        reference_date: Option<NaiveDate>,
        now: DateTime<Utc>,
    ) -> Vec<ForecastEntry> {
        hourly::merge(samples, today, next_day, reference_date, self.tz, now, self.limit)
    }

    /// Most recent past tide followed by the next three, or the next four.
    pub fn select_tides(&self, tides: &[Tide], now: DateTime<Utc>) -> Vec<Tide> {
        select_relevant(tides, now)
    }
}
