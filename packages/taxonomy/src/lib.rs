#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Species-level normalization of raw observation names.
//!
//! [`species`] classifies reported names (full species, spuhs, slashes,
//! hybrids, domestic forms, named species groups) through an ordered rule
//! table and strips subspecific qualifiers. [`lifers`] removes species the
//! user has already seen.

pub mod lifers;
pub mod species;

pub use lifers::{common_name_of_entry, life_list_from_entries, remove_lifers};
pub use species::{
    SpeciesClass, SpeciesRules, is_full_species, normalize_species, strip_subspecies_qualifier,
};
