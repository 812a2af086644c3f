//! Circular (year-agnostic) date windows.
//!
//! Every date is projected onto a 365-day calendar by month/day, so
//! January 1 of one year and December 31 of any other year are one day
//! apart. February 29 shares a position with February 28.

use chrono::{Datelike as _, NaiveDate};
use lifer_chaser_observation_models::Observation;
use serde::Serialize;

use crate::SeasonError;

/// Length of the calendar circle in days.
pub const CALENDAR_DAYS: i64 = 365;

/// Year used to instantiate reference dates. A leap year, so that a
/// February 29 reference is representable.
const REFERENCE_YEAR: i32 = 2000;

/// Index of February 29 in a leap year's zero-based ordinal.
const LEAP_DAY_ORDINAL0: u32 = 59;

/// Zero-based position of `date` on a non-leap calendar.
fn calendar_position(date: NaiveDate) -> i64 {
    let ordinal0 = date.ordinal0();
    let leap = NaiveDate::from_ymd_opt(date.year(), 2, 29).is_some();
    let shifted = if leap && ordinal0 >= LEAP_DAY_ORDINAL0 {
        ordinal0 - 1
    } else {
        ordinal0
    };
    i64::from(shifted)
}

/// Number of days between two dates going the shorter way around the
/// calendar, ignoring the year. Always within `0..=182`.
#[must_use]
pub fn circular_day_distance(a: NaiveDate, b: NaiveDate) -> i64 {
    let forward = (calendar_position(a) - calendar_position(b)).rem_euclid(CALENDAR_DAYS);
    forward.min(CALENDAR_DAYS - forward)
}

/// A reference month/day plus a tolerance in days on either side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateWindow {
    reference: NaiveDate,
    interval_days: i64,
}

impl DateWindow {
    /// Builds a window around `month`/`day`.
    ///
    /// The day is not cross-checked against the month: a day past the end
    /// of the month (e.g. April 31) is clamped to the month's last day.
    ///
    /// # Errors
    ///
    /// Returns [`SeasonError`] if the month is not 1-12, the day is not
    /// 1-31, or the interval is negative.
    pub fn new(month: u32, day: u32, interval_days: i64) -> Result<Self, SeasonError> {
        if !(1..=12).contains(&month) {
            return Err(SeasonError::InvalidMonth { month });
        }
        if !(1..=31).contains(&day) {
            return Err(SeasonError::InvalidDay { day });
        }
        if interval_days < 0 {
            return Err(SeasonError::InvalidInterval { interval_days });
        }

        let reference = (1..=day)
            .rev()
            .find_map(|d| NaiveDate::from_ymd_opt(REFERENCE_YEAR, month, d))
            .ok_or(SeasonError::InvalidDay { day })?;

        if reference.day() != day {
            log::warn!(
                "Reference day {month}/{day} does not exist, using {month}/{}",
                reference.day()
            );
        }

        Ok(Self {
            reference,
            interval_days,
        })
    }

    /// The reference date, instantiated in a fixed year.
    #[must_use]
    pub const fn reference(&self) -> NaiveDate {
        self.reference
    }

    /// Days of tolerance on either side of the reference date.
    #[must_use]
    pub const fn interval_days(&self) -> i64 {
        self.interval_days
    }

    /// Returns `true` if `date` is within the interval of the reference
    /// date, regardless of year.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        circular_day_distance(date, self.reference) <= self.interval_days
    }
}

/// Keeps only the observations whose date falls within `window`.
#[must_use]
pub fn select_within_window(observations: Vec<Observation>, window: &DateWindow) -> Vec<Observation> {
    observations
        .into_iter()
        .filter(|observation| window.contains(observation.date))
        .collect()
}
