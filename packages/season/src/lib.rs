#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Seasonal filtering independent of year.
//!
//! [`window`] decides whether an observation date falls within N days of a
//! reference month/day on a 365-day calendar circle. [`week`] parses the
//! `"<Month>-<n>"` week-of-month labels used by frequency tables.

pub mod week;
pub mod window;

pub use week::MonthWeek;
pub use window::{DateWindow, circular_day_distance, select_within_window};

/// Errors that can occur while building seasonal filters.
#[derive(Debug, thiserror::Error)]
pub enum SeasonError {
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

    /// Negative interval.
    #[error("Invalid interval {interval_days}: must be >= 0 days")]
    InvalidInterval {
        /// The rejected interval.
        interval_days: i64,
    },

    /// A week-of-month label that is not `"<Month>-<1..4>"`.
    #[error("Invalid week label '{label}': expected e.g. \"May-2\"")]
    InvalidWeek {
        /// The rejected label.
        label: String,
    },
}
