//! County-level lifer search over frequency tables.
//!
//! A frequency table lists, for each species and week-of-month, the
//! fraction of checklists in a region that reported it. Given the weeks of
//! a planned trip this finds the lifers most likely to be seen.

use std::collections::HashMap;

use lifer_chaser_analytics_models::{FrequencyRecord, SpeciesFrequency};
use lifer_chaser_observation_models::LifeList;
use lifer_chaser_season::MonthWeek;
use lifer_chaser_taxonomy::{SpeciesRules, strip_subspecies_qualifier};

use crate::ConfigError;

/// Average frequency of each unseen species across `weeks`, keeping those
/// at or above `threshold`, most frequent first.
///
/// Rows outside `weeks`, non-species rows, and life-listed species are
/// dropped first. Averages are taken over the rows present for a species;
/// species with equal averages keep first-seen order.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidThreshold`] if `threshold` is not within
/// 0-1.
pub fn analyze_county(
    rows: Vec<FrequencyRecord>,
    life_list: &LifeList,
    weeks: &[MonthWeek],
    threshold: f64,
    rules: &SpeciesRules,
) -> Result<Vec<SpeciesFrequency>, ConfigError> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(ConfigError::InvalidThreshold { threshold });
    }

    let total = rows.len();
    let mut order: Vec<String> = Vec::new();
    let mut sums: HashMap<String, (f64, u32)> = HashMap::new();

    for row in rows {
        let in_weeks = row
            .month_week
            .parse::<MonthWeek>()
            .is_ok_and(|week| weeks.contains(&week));
        if !in_weeks || !rules.is_full_species(&row.common_name, None) {
            continue;
        }

        let species = strip_subspecies_qualifier(&row.common_name);
        if life_list.contains(species) {
            continue;
        }

        let entry = sums.entry(species.to_string()).or_insert_with(|| {
            order.push(species.to_string());
            (0.0, 0)
        });
        entry.0 += row.frequency;
        entry.1 += 1;
    }

    let mut averaged: Vec<SpeciesFrequency> = order
        .into_iter()
        .filter_map(|species| {
            let (sum, n) = sums.get(&species)?;
            let frequency = sum / f64::from(*n);
            (frequency >= threshold).then_some(SpeciesFrequency { species, frequency })
        })
        .collect();

    averaged.sort_by(|a, b| b.frequency.total_cmp(&a.frequency));

    log::info!(
        "{} of {total} frequency rows yielded {} lifers at >= {threshold} in {} week(s)",
        sums.values().map(|(_, n)| u64::from(*n)).sum::<u64>(),
        averaged.len(),
        weeks.len()
    );

    Ok(averaged)
}

#[cfg(test)]
mod tests {
    use chrono::Month;

    use super::*;

    fn row(common: &str, week: &str, frequency: f64) -> FrequencyRecord {
        FrequencyRecord {
            common_name: common.to_string(),
            month_week: week.to_string(),
            frequency,
            sample_size: Some(100),
        }
    }

    fn may_weeks() -> Vec<MonthWeek> {
        vec![
            MonthWeek::new(Month::May, 1).unwrap(),
            MonthWeek::new(Month::May, 2).unwrap(),
        ]
    }

    fn table() -> Vec<FrequencyRecord> {
        vec![
            row("Blackburnian Warbler", "May-1", 0.2),
            row("Blackburnian Warbler", "May-2", 0.4),
            row("Blackburnian Warbler", "May-3", 0.9),
            row("Cape May Warbler", "May-1", 0.1),
            row("Cape May Warbler", "May-2", 0.1),
            row("Empidonax sp.", "May-1", 0.5),
            row("Mallard", "May-1", 0.8),
            row("Bay-breasted Warbler", "May-2", 0.3),
            row("Mourning Warbler", "April-4", 0.9),
        ]
    }

    #[test]
    fn averages_filters_and_sorts() {
        let result = analyze_county(
            table(),
            &LifeList::new(["mallard"]),
            &may_weeks(),
            0.0,
            &SpeciesRules::default(),
        )
        .unwrap();

        let names: Vec<&str> = result.iter().map(|f| f.species.as_str()).collect();
        assert_eq!(
            names,
            vec!["Blackburnian Warbler", "Bay-breasted Warbler", "Cape May Warbler"]
        );
        assert!((result[0].frequency - 0.3).abs() < 1e-12);
        assert!((result[2].frequency - 0.1).abs() < 1e-12);
    }

    #[test]
    fn threshold_is_inclusive() {
        let result = analyze_county(
            table(),
            &LifeList::default(),
            &may_weeks(),
            0.3,
            &SpeciesRules::default(),
        )
        .unwrap();
        let names: Vec<&str> = result.iter().map(|f| f.species.as_str()).collect();
        assert_eq!(names, vec!["Mallard", "Blackburnian Warbler", "Bay-breasted Warbler"]);
    }

    #[test]
    fn equal_frequencies_keep_first_seen_order() {
        let rows = vec![
            row("Veery", "May-1", 0.5),
            row("Wood Thrush", "May-1", 0.5),
            row("Hermit Thrush", "May-1", 0.6),
        ];
        let result = analyze_county(
            rows,
            &LifeList::default(),
            &may_weeks(),
            0.0,
            &SpeciesRules::default(),
        )
        .unwrap();
        let names: Vec<&str> = result.iter().map(|f| f.species.as_str()).collect();
        assert_eq!(names, vec!["Hermit Thrush", "Veery", "Wood Thrush"]);
    }

    #[test]
    fn rejects_threshold_outside_unit_interval() {
        for threshold in [-0.1, 1.5, f64::NAN] {
            assert!(matches!(
                analyze_county(
                    table(),
                    &LifeList::default(),
                    &may_weeks(),
                    threshold,
                    &SpeciesRules::default()
                ),
                Err(ConfigError::InvalidThreshold { .. })
            ));
        }
    }

    #[test]
    fn no_matching_weeks_is_empty() {
        let result = analyze_county(
            table(),
            &LifeList::default(),
            &[MonthWeek::new(Month::December, 4).unwrap()],
            0.0,
            &SpeciesRules::default(),
        )
        .unwrap();
        assert!(result.is_empty());
    }
}
