//! Astronomy records: moon phase labels, celestial event kinds and the
//! clock-time strings providers report for a forecast day.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Moon phase as reported by the astronomy provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MoonPhase {
    NewMoon,
    WaxingCrescent,
    FirstQuarter,
    WaxingGibbous,
    FullMoon,
    WaningGibbous,
    LastQuarter,
    WaningCrescent,
    /// Missing or unrecognized label
    Unknown,
}

impl MoonPhase {
    /// Parses a provider label.
    ///
    /// Matching is case-insensitive and whitespace-tolerant. "Third Quarter"
    /// is accepted as an alias of "Last Quarter". Anything else is `Unknown`.
    pub fn from_label(label: &str) -> MoonPhase {
        let normalized = label.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase();
        match normalized.as_str() {
            "new moon" => MoonPhase::NewMoon,
            "waxing crescent" => MoonPhase::WaxingCrescent,
            "first quarter" => MoonPhase::FirstQuarter,
            "waxing gibbous" => MoonPhase::WaxingGibbous,
            "full moon" => MoonPhase::FullMoon,
            "waning gibbous" => MoonPhase::WaningGibbous,
            "last quarter" | "third quarter" => MoonPhase::LastQuarter,
            "waning crescent" => MoonPhase::WaningCrescent,
            _ => MoonPhase::Unknown,
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            MoonPhase::NewMoon => "New Moon",
            MoonPhase::WaxingCrescent => "Waxing Crescent",
            MoonPhase::FirstQuarter => "First Quarter",
            MoonPhase::WaxingGibbous => "Waxing Gibbous",
            MoonPhase::FullMoon => "Full Moon",
            MoonPhase::WaningGibbous => "Waning Gibbous",
            MoonPhase::LastQuarter => "Last Quarter",
            MoonPhase::WaningCrescent => "Waning Crescent",
            MoonPhase::Unknown => "Unknown",
        }
    }

    /// True for the two quarter phases.
    pub fn is_quarter(&self) -> bool {
        matches!(self, MoonPhase::FirstQuarter | MoonPhase::LastQuarter)
    }
}

impl From<String> for MoonPhase {
    fn from(label: String) -> Self {
        MoonPhase::from_label(&label)
    }
}

impl From<MoonPhase> for String {
    fn from(phase: MoonPhase) -> Self {
        phase.label().to_string()
    }
}

/// Kinds of celestial events shown on the timeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CelestialKind {
    Sunrise,
    Sunset,
    Moonrise,
    Moonset,
}

impl CelestialKind {
    /// Returns a slice containing all kinds, in per-day synthesis order.
    pub fn all() -> &'static [CelestialKind] {
        &[
            CelestialKind::Sunrise,
            CelestialKind::Sunset,
            CelestialKind::Moonrise,
            CelestialKind::Moonset,
        ]
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            CelestialKind::Sunrise => "Sunrise",
            CelestialKind::Sunset => "Sunset",
            CelestialKind::Moonrise => "Moonrise",
            CelestialKind::Moonset => "Moonset",
        }
    }
}

/// Clock-time strings for one forecast day, e.g. `"06:42 AM"`
///
/// Values are kept as the provider sent them; they carry no date and no
/// zone until the timeline combines them with a calendar date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AstroDayInfo {
    pub sunrise: Option<String>,
    pub sunset: Option<String>,
    pub moonrise: Option<String>,
    pub moonset: Option<String>,
}

impl AstroDayInfo {
    /// The raw clock-time for the given event kind, if any.
    pub fn clock_time(&self, kind: CelestialKind) -> Option<&str> {
        match kind {
            CelestialKind::Sunrise => self.sunrise.as_deref(),
            CelestialKind::Sunset => self.sunset.as_deref(),
            CelestialKind::Moonrise => self.moonrise.as_deref(),
            CelestialKind::Moonset => self.moonset.as_deref(),
        }
    }
}

/// Parse a 12-hour clock string (e.g. "6:42 PM") to NaiveTime
///
/// 12 AM maps to hour 0 and 12 PM to hour 12. Returns `None` for anything
/// that isn't `H:MM AM|PM`, including provider sentinels like "No moonrise".
pub fn parse_clock_time(time_str: &str) -> Option<NaiveTime> {
    let mut parts = time_str.split_whitespace();
    let hours_minutes = parts.next()?;
    let period = parts.next()?;
    if parts.next().is_some() {
        return None;
    }

    let (hours, minutes) = hours_minutes.split_once(':')?;
    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if !(1..=12).contains(&hours) {
        return None;
    }

    let hour24 = match period.to_uppercase().as_str() {
        "AM" if hours == 12 => 0,
        "AM" => hours,
        "PM" if hours == 12 => 12,
        "PM" => hours + 12,
        _ => return None,
    };

    NaiveTime::from_hms_opt(hour24, minutes, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moon_phase_from_label() {
        assert_eq!(MoonPhase::from_label("Full Moon"), MoonPhase::FullMoon);
        assert_eq!(MoonPhase::from_label("new moon"), MoonPhase::NewMoon);
        assert_eq!(MoonPhase::from_label("  First   Quarter "), MoonPhase::FirstQuarter);
        assert_eq!(MoonPhase::from_label("Third Quarter"), MoonPhase::LastQuarter);
        assert_eq!(MoonPhase::from_label("Waning Crescent"), MoonPhase::WaningCrescent);
    }

    #[test]
    fn test_moon_phase_unrecognized_is_unknown() {
        assert_eq!(MoonPhase::from_label(""), MoonPhase::Unknown);
        assert_eq!(MoonPhase::from_label("Blood Moon"), MoonPhase::Unknown);
        assert!(!MoonPhase::Unknown.is_quarter());
    }

    #[test]
    fn test_moon_phase_serde_uses_labels() {
        let json = serde_json::to_string(&MoonPhase::WaxingGibbous).unwrap();
        assert_eq!(json, "\"Waxing Gibbous\"");
        let parsed: MoonPhase = serde_json::from_str("\"Last Quarter\"").unwrap();
        assert_eq!(parsed, MoonPhase::LastQuarter);
        let unknown: MoonPhase = serde_json::from_str("\"???\"").unwrap();
        assert_eq!(unknown, MoonPhase::Unknown);
    }

    #[test]
    fn test_parse_clock_time() {
        assert_eq!(parse_clock_time("06:42 AM"), NaiveTime::from_hms_opt(6, 42, 0));
        assert_eq!(parse_clock_time("6:24 PM"), NaiveTime::from_hms_opt(18, 24, 0));
        assert_eq!(parse_clock_time("11:59 pm"), NaiveTime::from_hms_opt(23, 59, 0));
    }

    #[test]
    fn test_parse_clock_time_midnight_and_noon() {
        assert_eq!(parse_clock_time("12:15 AM"), NaiveTime::from_hms_opt(0, 15, 0));
        assert_eq!(parse_clock_time("12:00 PM"), NaiveTime::from_hms_opt(12, 0, 0));
    }

    #[test]
    fn test_parse_clock_time_invalid() {
        assert!(parse_clock_time("").is_none());
        assert!(parse_clock_time("No moonrise").is_none());
        assert!(parse_clock_time("06:42").is_none());
        assert!(parse_clock_time("13:00 PM").is_none());
        assert!(parse_clock_time("0:30 AM").is_none());
        assert!(parse_clock_time("6:75 AM").is_none());
        assert!(parse_clock_time("6:30 XM").is_none());
        assert!(parse_clock_time("6:30 AM extra").is_none());
    }

    #[test]
    fn test_astro_day_clock_time_lookup() {
        let astro = AstroDayInfo {
            sunrise: Some("06:42 AM".to_string()),
            sunset: Some("06:24 PM".to_string()),
            moonrise: None,
            moonset: Some("No moonset".to_string()),
        };
        assert_eq!(astro.clock_time(CelestialKind::Sunrise), Some("06:42 AM"));
        assert_eq!(astro.clock_time(CelestialKind::Moonrise), None);
        assert_eq!(astro.clock_time(CelestialKind::Moonset), Some("No moonset"));
    }
}
