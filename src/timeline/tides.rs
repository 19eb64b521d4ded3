//! Relevant tide selection

use chrono::{DateTime, Utc};

use crate::data::Tide;

/// Tides shown when no past event is known
const TIDES_SHOWN: usize = 4;

/// Picks the tides worth displaying around `now`
///
/// Events are ordered chronologically first. An event at exactly `now` counts
/// as past. With a past event the result is the most recent one followed by up
/// to three upcoming ones; otherwise it is up to four upcoming ones.
pub fn select_relevant(tides: &[Tide], now: DateTime<Utc>) -> Vec<Tide> {
    let mut sorted: Vec<&Tide> = tides.iter().collect();
    sorted.sort_by_key(|tide| tide.time);

    let split = sorted.partition_point(|tide| tide.time <= now);
    let (past, upcoming) = sorted.split_at(split);

    match past.last() {
        Some(&recent) => std::iter::once(recent)
            .chain(upcoming.iter().copied().take(TIDES_SHOWN - 1))
            .cloned()
            .collect(),
        None => upcoming.iter().take(TIDES_SHOWN).map(|&tide| tide.clone()).collect(),
    }
}
