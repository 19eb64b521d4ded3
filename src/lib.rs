//! Fishly Library
//!
//! Fishing favorability scoring and forecast timeline aggregation over a
//! combined weather, marine and astronomy provider payload. The `fishly`
//! binary and the integration tests use these modules.

pub mod cli;
pub mod config;
pub mod data;
pub mod logging;
pub mod report;
pub mod score;
pub mod timeline;
