//! Life list loading.
//!
//! Three layouts are accepted:
//!
//! * a `Species` column of `"<Common> - <Scientific>"` entries,
//! * a `Common Name` column (the current life list export), or
//! * a header-less list with one species per line in the first column.

use std::io::Read;

use lifer_chaser_observation_models::LifeList;
use lifer_chaser_taxonomy::life_list_from_entries;

use crate::{IngestError, find_column};

const SPECIES: &[&str] = &["Species"];
const COMMON_NAME: &[&str] = &["Common Name"];

/// Loads a life list.
///
/// # Errors
///
/// Returns [`IngestError::Csv`] if the stream cannot be read.
pub fn load_life_list<R: Read>(reader: R) -> Result<LifeList, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut records = reader.records();
    let Some(first) = records.next().transpose()? else {
        log::warn!("Life list is empty");
        return Ok(LifeList::default());
    };

    let header_column = find_column(&first, SPECIES).or_else(|| find_column(&first, COMMON_NAME));
    let column = header_column.unwrap_or(0);

    let mut entries: Vec<String> = Vec::new();
    if header_column.is_none() {
        entries.extend(first.get(0).map(ToString::to_string));
    }
    for record in records {
        let record = record?;
        entries.extend(record.get(column).map(ToString::to_string));
    }

    let life_list = life_list_from_entries(&entries);
    log::info!(
        "Loaded life list with {} species ({})",
        life_list.len(),
        if header_column.is_some() {
            "header row"
        } else {
            "no header"
        }
    );

    Ok(life_list)
}
