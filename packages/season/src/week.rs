//! Week-of-month labels (`"January-1"` .. `"December-4"`).
//!
//! Frequency tables split each month into four quarters and label rows
//! with the full month name and the quarter number.

use std::str::FromStr;

use chrono::Month;

use crate::SeasonError;

/// One quarter of a calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MonthWeek {
    /// Calendar month.
    pub month: Month,
    /// Quarter of the month, 1-4.
    pub week: u8,
}

impl MonthWeek {
    /// Creates a label, rejecting weeks outside 1-4.
    ///
    /// # Errors
    ///
    /// Returns [`SeasonError::InvalidWeek`] if `week` is not 1-4.
    pub fn new(month: Month, week: u8) -> Result<Self, SeasonError> {
        if (1..=4).contains(&week) {
            Ok(Self { month, week })
        } else {
            Err(SeasonError::InvalidWeek {
                label: format!("{}-{week}", month.name()),
            })
        }
    }

    /// All four weeks of `month`.
    #[must_use]
    pub fn all_in(month: Month) -> Vec<Self> {
        (1..=4).map(|week| Self { month, week }).collect()
    }
}

impl std::fmt::Display for MonthWeek {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.month.name(), self.week)
    }
}

impl FromStr for MonthWeek {
    type Err = SeasonError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SeasonError::InvalidWeek {
            label: s.to_string(),
        };

        let (month, week) = s.trim().rsplit_once('-').ok_or_else(invalid)?;
        let month = month.trim().parse::<Month>().map_err(|_| invalid())?;
        let week = week.trim().parse::<u8>().map_err(|_| invalid())?;

        Self::new(month, week).map_err(|_| invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_labels() {
        let week: MonthWeek = "May-2".parse().unwrap();
        assert_eq!(week.month, Month::May);
        assert_eq!(week.week, 2);
        assert_eq!(week.to_string(), "May-2");
    }

    #[test]
    fn parses_case_insensitive_month() {
        let week: MonthWeek = " september-4 ".parse().unwrap();
        assert_eq!(week.month, Month::September);
        assert_eq!(week.to_string(), "September-4");
    }

    #[test]
    fn rejects_bad_labels() {
        for label in ["May", "May-0", "May-5", "Smarch-1", "May-x", ""] {
            assert!(label.parse::<MonthWeek>().is_err(), "{label} parsed");
        }
    }

    #[test]
    fn lists_all_weeks_of_month() {
        let weeks = MonthWeek::all_in(Month::December);
        let labels: Vec<String> = weeks.iter().map(ToString::to_string).collect();
        assert_eq!(
            labels,
            vec!["December-1", "December-2", "December-3", "December-4"]
        );
    }
}
