//! Full-species classification.
//!
//! Community checklist exports mix full species with records that were only
//! identified to a higher group (`"Empidonax sp."`), uncertain pairs
//! (`"Mallard/American Black Duck"`), hybrids, and domestic forms. The
//! rules below are applied in order and the first match decides the class.

use std::collections::BTreeSet;

use lifer_chaser_observation_models::Observation;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Named species groups whose slash appears only inside the parenthetical
/// (e.g. `"Western Flycatcher (Pacific-slope/Cordilleran)"`). Stripping the
/// qualifier would otherwise leave a name that looks like a full species.
const DEFAULT_SPECIES_GROUPS: &[&str] = &["Traill's Flycatcher", "Western Flycatcher"];

/// What kind of taxon a reported name refers to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SpeciesClass {
    /// A countable species.
    FullSpecies,
    /// Identified only to a higher taxonomic group (`"sp."`).
    Spuh,
    /// An uncertain choice between two species.
    Slash,
    /// A hybrid between two species.
    Hybrid,
    /// A domestic form.
    Domestic,
    /// A configured named group that is not a species.
    SpeciesGroup,
}

/// Configurable parts of the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct SpeciesRules {
    /// Base names (qualifier stripped, compared case-insensitively) that
    /// denote a species group rather than a species.
    pub species_groups: BTreeSet<String>,
    /// Whether names mentioning `Domestic` are dropped.
    pub exclude_domestic: bool,
}

impl Default for SpeciesRules {
    fn default() -> Self {
        Self {
            species_groups: DEFAULT_SPECIES_GROUPS
                .iter()
                .map(ToString::to_string)
                .collect(),
            exclude_domestic: true,
        }
    }
}

/// The pieces of a reported name the rules look at.
struct ReportedName<'a> {
    common: &'a str,
    base: &'a str,
    has_qualifier: bool,
    scientific: Option<&'a str>,
}

impl<'a> ReportedName<'a> {
    fn new(common: &'a str, scientific: Option<&'a str>) -> Self {
        Self {
            common,
            base: strip_subspecies_qualifier(common),
            has_qualifier: common.contains('('),
            scientific,
        }
    }

    fn scientific_contains(&self, pattern: &str) -> bool {
        self.scientific.is_some_and(|s| s.contains(pattern))
    }
}

type Rule = fn(&SpeciesRules, &ReportedName<'_>) -> bool;

/// Ordered rule table. The first matching rule classifies the name.
const RULES: &[(SpeciesClass, Rule)] = &[
    (SpeciesClass::Hybrid, is_hybrid),
    (SpeciesClass::Spuh, is_spuh),
    (SpeciesClass::Slash, is_slash),
    (SpeciesClass::SpeciesGroup, is_species_group),
    (SpeciesClass::Domestic, is_domestic),
];

fn is_hybrid(_: &SpeciesRules, name: &ReportedName<'_>) -> bool {
    name.common.to_lowercase().contains("hybrid") || name.scientific_contains(" x ")
}

fn is_spuh(_: &SpeciesRules, name: &ReportedName<'_>) -> bool {
    name.base.is_empty() || name.common.contains('.') || name.scientific_contains(".")
}

/// A slash inside the qualifier marks a subspecies group of a real species;
/// anywhere else it is an uncertain identification.
fn is_slash(_: &SpeciesRules, name: &ReportedName<'_>) -> bool {
    name.base.contains('/') || (!name.has_qualifier && name.scientific_contains("/"))
}

fn is_species_group(rules: &SpeciesRules, name: &ReportedName<'_>) -> bool {
    rules
        .species_groups
        .iter()
        .any(|group| group.eq_ignore_ascii_case(name.base))
}

fn is_domestic(rules: &SpeciesRules, name: &ReportedName<'_>) -> bool {
    rules.exclude_domestic && name.common.contains("Domestic")
}

impl SpeciesRules {
    /// Classifies a reported name.
    #[must_use]
    pub fn classify(&self, common_name: &str, scientific_name: Option<&str>) -> SpeciesClass {
        let name = ReportedName::new(common_name, scientific_name);
        RULES
            .iter()
            .find(|(_, applies)| applies(self, &name))
            .map_or(SpeciesClass::FullSpecies, |(class, _)| *class)
    }

    /// Returns `true` if the name refers to a countable species.
    #[must_use]
    pub fn is_full_species(&self, common_name: &str, scientific_name: Option<&str>) -> bool {
        self.classify(common_name, scientific_name) == SpeciesClass::FullSpecies
    }
}

/// [`SpeciesRules::is_full_species`] with the default rules.
#[must_use]
pub fn is_full_species(common_name: &str, scientific_name: Option<&str>) -> bool {
    SpeciesRules::default().is_full_species(common_name, scientific_name)
}

/// Drops everything from the first `(` on and trims whitespace.
///
/// `"Dark-eyed Junco (Slate-colored)"` becomes `"Dark-eyed Junco"`.
#[must_use]
pub fn strip_subspecies_qualifier(name: &str) -> &str {
    name.split('(').next().unwrap_or(name).trim()
}

/// Keeps only full-species observations and rewrites their common names
/// without the subspecific qualifier.
#[must_use]
pub fn normalize_species(observations: Vec<Observation>, rules: &SpeciesRules) -> Vec<Observation> {
    observations
        .into_iter()
        .filter_map(|observation| {
            let class = rules.classify(
                &observation.common_name,
                observation.scientific_name.as_deref(),
            );
            if class != SpeciesClass::FullSpecies {
                log::trace!("Dropping {class} record '{}'", observation.common_name);
                return None;
            }
            let common_name = strip_subspecies_qualifier(&observation.common_name).to_string();
            Some(Observation {
                common_name,
                ..observation
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use lifer_chaser_observation_models::Location;

    use super::*;

    fn observation(common: &str, scientific: &str) -> Observation {
        Observation {
            submission_id: "S1".to_string(),
            common_name: common.to_string(),
            scientific_name: Some(scientific.to_string()),
            location: Location::new(40.0, -75.0),
            date: NaiveDate::from_ymd_opt(2019, 5, 1).unwrap(),
            count: 1,
        }
    }

    #[test]
    fn strips_qualifier() {
        assert_eq!(
            strip_subspecies_qualifier("Dark-eyed Junco (Slate-colored)"),
            "Dark-eyed Junco"
        );
        assert_eq!(strip_subspecies_qualifier("  Northern Flicker "), "Northern Flicker");
        assert_eq!(strip_subspecies_qualifier("(Unnamed)"), "");
    }

    #[test]
    fn rejects_spuhs_slashes_and_hybrids() {
        assert!(!is_full_species("Empidonax sp.", Some("Empidonax sp.")));
        assert!(!is_full_species("Mallard/American Black Duck", None));
        assert!(!is_full_species(
            "Mallard x American Black Duck (hybrid)",
            Some("Anas platyrhynchos x rubripes")
        ));
        assert!(is_full_species("Northern Flicker", Some("Colaptes auratus")));
    }

    #[test]
    fn classifies_each_kind() {
        let rules = SpeciesRules::default();
        assert_eq!(
            rules.classify("duck sp.", Some("Anatinae sp.")),
            SpeciesClass::Spuh
        );
        assert_eq!(
            rules.classify("Greater/Lesser Yellowlegs", Some("Tringa melanoleuca/flavipes")),
            SpeciesClass::Slash
        );
        assert_eq!(
            rules.classify("Mallard (Domestic type)", Some("Anas platyrhynchos (Domestic type)")),
            SpeciesClass::Domestic
        );
        assert_eq!(
            rules.classify("Hybrid Hummingbird", None),
            SpeciesClass::Hybrid
        );
    }

    #[test]
    fn slash_inside_qualifier_keeps_the_species() {
        assert!(is_full_species(
            "Yellow-rumped Warbler (Myrtle/Audubon's)",
            Some("Setophaga coronata coronata/auduboni")
        ));
    }

    #[test]
    fn slash_only_in_scientific_name_is_rejected_without_qualifier() {
        assert_eq!(
            SpeciesRules::default().classify("Yellowlegs", Some("Tringa melanoleuca/flavipes")),
            SpeciesClass::Slash
        );
    }

    #[test]
    fn named_species_groups_are_rejected() {
        let rules = SpeciesRules::default();
        assert_eq!(
            rules.classify(
                "Western Flycatcher (Pacific-slope/Cordilleran)",
                Some("Empidonax difficilis/occidentalis")
            ),
            SpeciesClass::SpeciesGroup
        );
        assert_eq!(
            rules.classify("Pacific-slope/Cordilleran Flycatcher (Western Flycatcher)", None),
            SpeciesClass::Slash
        );
    }

    #[test]
    fn species_groups_are_configurable() {
        let rules = SpeciesRules {
            species_groups: BTreeSet::new(),
            exclude_domestic: false,
        };
        assert!(rules.is_full_species("Western Flycatcher (Pacific-slope/Cordilleran)", None));
        assert!(rules.is_full_species("Mallard (Domestic type)", None));

        let rules = SpeciesRules {
            species_groups: BTreeSet::from(["Solitary Vireo".to_string()]),
            ..SpeciesRules::default()
        };
        assert_eq!(
            rules.classify("solitary vireo (Blue-headed/Cassin's)", None),
            SpeciesClass::SpeciesGroup
        );
    }

    #[test]
    fn normalization_strips_and_filters() {
        let observations = vec![
            observation("Dark-eyed Junco (Slate-colored)", "Junco hyemalis hyemalis"),
            observation("Empidonax sp.", "Empidonax sp."),
            observation("Mallard/American Black Duck", "Anas platyrhynchos/rubripes"),
            observation("Northern Flicker", "Colaptes auratus"),
        ];
        let normalized = normalize_species(observations, &SpeciesRules::default());
        let names: Vec<&str> = normalized.iter().map(|o| o.common_name.as_str()).collect();
        assert_eq!(names, vec!["Dark-eyed Junco", "Northern Flicker"]);
        for name in names {
            assert!(!name.contains('/'));
            assert!(!name.contains('.'));
            assert!(!name.to_lowercase().contains("hybrid"));
            assert!(!name.contains('('));
        }
    }
}
