#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Scoring and ranking of lifer neighborhoods.
//!
//! [`pipeline::rank_centers`] runs the full batch: species normalization,
//! lifer removal, the date window, neighborhood building, scoring, and
//! top-N ranking. [`frequency::analyze_county`] is the county-level
//! counterpart that works from pre-aggregated frequency tables instead of
//! point observations.

pub mod config;
pub mod frequency;
pub mod pipeline;
pub mod scorer;

pub use config::RunConfig;
pub use frequency::analyze_county;
pub use pipeline::rank_centers;
pub use scorer::score_neighborhood;

use thiserror::Error;

/// Invalid run parameters. Always reported before any computation starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Radius not strictly positive and finite.
    #[error("Invalid radius {radius_miles}: must be > 0 miles")]
    InvalidRadius {
        /// The rejected radius.
        radius_miles: f64,
    },

    /// Negative interval.
    #[error("Invalid interval {interval_days}: must be >= 0 days")]
    InvalidInterval {
        /// The rejected interval.
        interval_days: i64,
    },

    /// Month outside 1-12.
    #[error("Invalid month {month}: expected 1-12")]
    InvalidMonth {
        /// The rejected month.
        month: u32,
    },

    /// Day outside 1-31.
    #[error("Invalid day {day}: expected 1-31")]
    InvalidDay {
        /// The rejected day.
        day: u32,
    },

    /// Top-N of zero.
    #[error("Invalid top-N {top_n}: must be >= 1")]
    InvalidTopN {
        /// The rejected count.
        top_n: usize,
    },

    /// Scoring policy name not recognized.
    #[error("Unknown scoring policy '{value}': expected one of {expected}")]
    UnknownPolicy {
        /// The rejected name.
        value: String,
        /// Comma-separated accepted names.
        expected: String,
    },

    /// Neighborhood index name not recognized.
    #[error("Unknown neighborhood index '{value}': expected one of {expected}")]
    UnknownIndex {
        /// The rejected name.
        value: String,
        /// Comma-separated accepted names.
        expected: String,
    },

    /// Frequency threshold outside 0-1.
    #[error("Invalid frequency threshold {threshold}: expected 0-1")]
    InvalidThreshold {
        /// The rejected threshold.
        threshold: f64,
    },

    /// Seasonal parameter rejected by the date window or a week label.
    #[error(transparent)]
    Season(#[from] lifer_chaser_season::SeasonError),

    /// Config file is not valid TOML or has the wrong shape.
    #[error("Config file error: {0}")]
    Toml(#[from] toml::de::Error),
}
