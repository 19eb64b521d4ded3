//! Fishly - fishing conditions report
//!
//! Reads a combined provider payload, scores fishing favorability and prints
//! the report with the upcoming timeline and tides.

use chrono::Utc;
use clap::Parser;
use tracing::info;

use fishly::cli::{Cli, OutputFormat, RunOptions};
use fishly::config::Config;
use fishly::logging::init_cli_logger;
use fishly::report::Report;
use fishly::score::ScoreEngine;
use fishly::timeline::TimelineAggregator;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_cli_logger(cli.verbose);

    let config = Config::load_from_path(&cli.config)?;
    let options = RunOptions::from_cli(&cli, &config, Utc::now())?;

    let payload = options.payload.read()?;
    let tz = payload.timezone(options.fallback_timezone);
    info!(
        location = payload.location_name().as_deref().unwrap_or("unknown"),
        timezone = tz.name(),
        now = %options.now,
        "Building fishing report"
    );

    let aggregator = TimelineAggregator::new(tz).with_limit(options.limit);
    let report = Report::build(&payload, &ScoreEngine::new(), &aggregator, options.now);
    info!(score = report.score, rating = report.rating.label(), "Scored conditions");

    match options.format {
        OutputFormat::Text => print!("{report}"),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }

    Ok(())
}
