//! Command-line interface parsing for the fishly report tool
//!
//! Parses arguments with clap and merges them with the optional config file.
//! Flags always win over config values.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use thiserror::Error;

use crate::config::{Config, DEFAULT_CONFIG_PATH};
use crate::data::{ProviderError, ProviderPayload};

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// The zone name is not in the IANA database
    #[error("Invalid timezone: '{0}'. Expected an IANA name such as America/New_York")]
    InvalidTimezone(String),

    /// `--now` is not an RFC 3339 timestamp
    #[error("Invalid --now value: '{0}'. Expected RFC 3339, e.g. 2025-03-03T10:30:00-05:00")]
    InvalidNow(String),

    /// A timeline of zero entries was requested
    #[error("Invalid timeline limit: must be at least 1")]
    ZeroLimit,
}

/// Fishly - fishing favorability and forecast timeline from a provider payload
#[derive(Parser, Debug)]
#[command(name = "fishly")]
#[command(about = "Fishing favorability score and forecast timeline")]
#[command(version)]
pub struct Cli {
    /// Provider payload JSON file, or `-` to read from stdin
    #[arg(value_name = "PAYLOAD")]
    pub payload: PathBuf,

    /// Print the report as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Evaluate as of this instant instead of the current time
    #[arg(long, value_name = "RFC3339")]
    pub now: Option<String>,

    /// Maximum number of timeline entries
    #[arg(long, value_name = "N")]
    pub limit: Option<usize>,

    /// Zone used when the payload has no location timezone
    #[arg(long, value_name = "IANA")]
    pub timezone: Option<String>,

    /// Config file; a missing file means defaults
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// How the report is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Where the provider payload is read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadSource {
    Stdin,
    File(PathBuf),
}

impl PayloadSource {
    /// Reads and parses the payload.
    pub fn read(&self) -> Result<ProviderPayload, ProviderError> {
        match self {
            PayloadSource::Stdin => ProviderPayload::from_reader(io::stdin().lock()),
            PayloadSource::File(path) => {
                ProviderPayload::from_reader(BufReader::new(File::open(path)?))
            }
        }
    }
}

/// Validated settings for one run
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub payload: PayloadSource,
    pub format: OutputFormat,
    /// Instant the report is evaluated at
    pub now: DateTime<Utc>,
    /// Maximum timeline length
    pub limit: usize,
    /// Zone used when the payload carries none
    pub fallback_timezone: Option<Tz>,
}

/// Parses an IANA zone name.
pub fn parse_timezone_arg(s: &str) -> Result<Tz, CliError> {
    s.trim()
        .parse::<Tz>()
        .map_err(|_| CliError::InvalidTimezone(s.to_string()))
}

/// Parses an RFC 3339 timestamp into a UTC instant.
pub fn parse_now_arg(s: &str) -> Result<DateTime<Utc>, CliError> {
    DateTime::parse_from_rfc3339(s.trim())
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| CliError::InvalidNow(s.to_string()))
}

impl RunOptions {
    /// Creates RunOptions from parsed CLI arguments and the loaded config.
    ///
    /// `clock_now` is used when `--now` isn't given.
    pub fn from_cli(cli: &Cli, config: &Config, clock_now: DateTime<Utc>) -> Result<Self, CliError> {
        let payload = if cli.payload.as_os_str() == "-" {
            PayloadSource::Stdin
        } else {
            PayloadSource::File(cli.payload.clone())
        };

        let now = match cli.now.as_deref() {
            Some(raw) => parse_now_arg(raw)?,
            None => clock_now,
        };

        let limit = cli.limit.unwrap_or(config.timeline.limit);
        if limit == 0 {
            return Err(CliError::ZeroLimit);
        }

        let fallback_timezone = cli
            .timezone
            .as_deref()
            .or(config.location.timezone.as_deref())
            .map(parse_timezone_arg)
            .transpose()?;

        Ok(RunOptions {
            payload,
            format: if cli.json {
                OutputFormat::Json
            } else {
                OutputFormat::Text
            },
            now,
            limit,
            fallback_timezone,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LocationConfig, TimelineConfig};
    use chrono::TimeZone;

    fn clock_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_timezone_arg() {
        assert_eq!(
            parse_timezone_arg("America/New_York").unwrap(),
            chrono_tz::America::New_York
        );
        assert_eq!(parse_timezone_arg(" UTC ").unwrap(), chrono_tz::UTC);

        let err = parse_timezone_arg("Mars/Olympus_Mons").unwrap_err();
        assert!(err.to_string().contains("Invalid timezone"));
        assert!(err.to_string().contains("Mars/Olympus_Mons"));
    }

    #[test]
    fn test_parse_now_arg() {
        let expected = Utc.with_ymd_and_hms(2025, 3, 3, 15, 30, 0).unwrap();
        assert_eq!(parse_now_arg("2025-03-03T10:30:00-05:00").unwrap(), expected);
        assert_eq!(parse_now_arg("2025-03-03T15:30:00Z").unwrap(), expected);
        assert!(matches!(parse_now_arg("tomorrow"), Err(CliError::InvalidNow(_))));
        assert!(matches!(parse_now_arg("2025-03-03 10:30"), Err(CliError::InvalidNow(_))));
    }

    #[test]
    fn test_cli_parse_payload_only() {
        let cli = Cli::parse_from(["fishly", "payload.json"]);
        assert_eq!(cli.payload, PathBuf::from("payload.json"));
        assert!(!cli.json);
        assert!(!cli.verbose);
        assert!(cli.now.is_none());
        assert!(cli.limit.is_none());
        assert!(cli.timezone.is_none());
        assert_eq!(cli.config, PathBuf::from("fishly.toml"));
    }

    #[test]
    fn test_cli_parse_all_flags() {
        let cli = Cli::parse_from([
            "fishly",
            "-",
            "--json",
            "--now",
            "2025-03-03T15:30:00Z",
            "--limit",
            "5",
            "--timezone",
            "Europe/Lisbon",
            "--config",
            "/etc/fishly.toml",
            "-v",
        ]);
        assert!(cli.json);
        assert!(cli.verbose);
        assert_eq!(cli.limit, Some(5));
        assert_eq!(cli.timezone.as_deref(), Some("Europe/Lisbon"));
        assert_eq!(cli.config, PathBuf::from("/etc/fishly.toml"));
    }

    #[test]
    fn test_cli_requires_payload() {
        assert!(Cli::try_parse_from(["fishly"]).is_err());
    }

    #[test]
    fn test_run_options_defaults() {
        let cli = Cli::parse_from(["fishly", "payload.json"]);
        let options = RunOptions::from_cli(&cli, &Config::default(), clock_now()).unwrap();

        assert_eq!(options.payload, PayloadSource::File(PathBuf::from("payload.json")));
        assert_eq!(options.format, OutputFormat::Text);
        assert_eq!(options.now, clock_now());
        assert_eq!(options.limit, 12);
        assert!(options.fallback_timezone.is_none());
    }

    #[test]
    fn test_run_options_stdin_and_json() {
        let cli = Cli::parse_from(["fishly", "-", "--json"]);
        let options = RunOptions::from_cli(&cli, &Config::default(), clock_now()).unwrap();
        assert_eq!(options.payload, PayloadSource::Stdin);
        assert_eq!(options.format, OutputFormat::Json);
    }

    #[test]
    fn test_run_options_use_config_values() {
        let config = Config {
            location: LocationConfig {
                timezone: Some("Pacific/Honolulu".to_string()),
            },
            timeline: TimelineConfig { limit: 6 },
        };
        let cli = Cli::parse_from(["fishly", "payload.json"]);
        let options = RunOptions::from_cli(&cli, &config, clock_now()).unwrap();

        assert_eq!(options.limit, 6);
        assert_eq!(options.fallback_timezone, Some(chrono_tz::Pacific::Honolulu));
    }

    #[test]
    fn test_run_options_flags_override_config() {
        let config = Config {
            location: LocationConfig {
                timezone: Some("Pacific/Honolulu".to_string()),
            },
            timeline: TimelineConfig { limit: 6 },
        };
        let cli = Cli::parse_from([
            "fishly",
            "payload.json",
            "--limit",
            "20",
            "--timezone",
            "America/Chicago",
            "--now",
            "2025-03-03T15:30:00Z",
        ]);
        let options = RunOptions::from_cli(&cli, &config, clock_now()).unwrap();

        assert_eq!(options.limit, 20);
        assert_eq!(options.fallback_timezone, Some(chrono_tz::America::Chicago));
        assert_eq!(options.now, Utc.with_ymd_and_hms(2025, 3, 3, 15, 30, 0).unwrap());
    }

    #[test]
    fn test_run_options_invalid_values() {
        let config = Config::default();

        let cli = Cli::parse_from(["fishly", "p.json", "--timezone", "Nowhere/Special"]);
        assert!(matches!(
            RunOptions::from_cli(&cli, &config, clock_now()),
            Err(CliError::InvalidTimezone(_))
        ));

        let cli = Cli::parse_from(["fishly", "p.json", "--now", "noon"]);
        assert!(matches!(
            RunOptions::from_cli(&cli, &config, clock_now()),
            Err(CliError::InvalidNow(_))
        ));

        let cli = Cli::parse_from(["fishly", "p.json", "--limit", "0"]);
        assert!(matches!(
            RunOptions::from_cli(&cli, &config, clock_now()),
            Err(CliError::ZeroLimit)
        ));
    }

    #[test]
    fn test_run_options_invalid_config_timezone() {
        let config = Config {
            location: LocationConfig {
                timezone: Some("Atlantis/Capital".to_string()),
            },
            ..Config::default()
        };
        let cli = Cli::parse_from(["fishly", "payload.json"]);
        assert!(matches!(
            RunOptions::from_cli(&cli, &config, clock_now()),
            Err(CliError::InvalidTimezone(_))
        ));
    }

    #[test]
    fn test_payload_source_missing_file() {
        let source = PayloadSource::File(PathBuf::from("/nonexistent/payload.json"));
        assert!(matches!(source.read(), Err(ProviderError::Io(_))));
    }
}
