//! Hourly/celestial merge

use chrono::{DateTime, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::data::{
    local_to_utc, parse_clock_time, AstroDayInfo, CelestialEvent, CelestialKind, ForecastEntry,
    HourlySample,
};

/// Combines a "H:MM AM/PM" clock-time with a calendar date in `tz`.
///
/// Returns `None` for malformed clock strings and for local times that don't
/// exist on that date.
pub fn resolve_clock_time(date: NaiveDate, clock: &str, tz: Tz) -> Option<DateTime<Utc>> {
    let time = parse_clock_time(clock)?;
    local_to_utc(date.and_time(time), tz)
}

/// Synthesizes the celestial events for `today` and the following day.
///
/// Events are produced in sunrise, sunset, moonrise, moonset order per day.
/// Missing or malformed clock-times are skipped.
pub fn celestial_events(
    today: &AstroDayInfo,
    next_day: &AstroDayInfo,
    today_date: NaiveDate,
    tz: Tz,
) -> Vec<CelestialEvent> {
    let tomorrow = today_date + Duration::days(1);
    let mut events = Vec::with_capacity(CelestialKind::all().len() * 2);

    for (astro, date) in [(today, today_date), (next_day, tomorrow)] {
        for &kind in CelestialKind::all() {
            let Some(clock) = astro.clock_time(kind) else {
                continue;
            };
            match resolve_clock_time(date, clock, tz) {
                Some(time) => events.push(CelestialEvent { time, kind }),
                None => debug!(%date, clock, kind = kind.label(), "dropping unparseable celestial time"),
            }
        }
    }

    events
}

pub(super) fn merge(
    samples: &[HourlySample],
    today: &AstroDayInfo,
    next_day: &AstroDayInfo,
    reference_date: Option<NaiveDate>,
    tz: Tz,
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<ForecastEntry> {
    let Some(first) = samples.first() else {
        return Vec::new();
    };
    let today_date = reference_date.unwrap_or_else(|| first.time.with_timezone(&tz).date_naive());

    let upcoming = celestial_events(today, next_day, today_date, tz)
        .into_iter()
        .filter(|event| event.time > now)
        .map(ForecastEntry::Celestial);

    let mut entries: Vec<ForecastEntry> = samples
        .iter()
        .cloned()
        .map(ForecastEntry::Hourly)
        .chain(upcoming)
        .collect();

    // sort_by_key is stable: equal instants keep their input order
    entries.sort_by_key(ForecastEntry::time);
    entries.truncate(limit);
    entries
}
