#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! CSV loaders for the lifer-chaser pipeline.
//!
//! Reads community-database observation exports, personal life lists, and
//! county frequency tables. Files ending in `.gz` are decompressed on the
//! fly. Header problems are fatal; individual bad rows are skipped and
//! reported.

pub mod frequency;
pub mod life_list;
pub mod observations;

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

pub use frequency::load_frequency_table;
pub use life_list::load_life_list;
pub use lifer_chaser_ingest_models::{LoadReport, MalformedRecord};
pub use observations::load_observations;

/// Errors that abort a load.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The file could not be opened or read.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path that caused the error.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The CSV stream itself is unreadable.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required header column is absent.
    #[error("Missing required column '{column}' (found: {found})")]
    MissingColumn {
        /// The column that was expected.
        column: String,
        /// Comma-separated headers that were present.
        found: String,
    },
}

/// Opens `path` for reading, transparently gunzipping `.gz` files.
///
/// # Errors
///
/// Returns [`IngestError::Io`] if the file cannot be opened.
pub fn open_input(path: &Path) -> Result<Box<dyn Read>, IngestError> {
    let file = File::open(path).map_err(|e| IngestError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    let reader = BufReader::new(file);

    if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("gz")) {
        log::debug!("Decompressing {}", path.display());
        Ok(Box::new(flate2::read::GzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}

/// Finds `names` (any alias, case-insensitive) among `headers`.
fn find_column(headers: &csv::StringRecord, names: &[&str]) -> Option<usize> {
    headers.iter().position(|header| {
        let header = header.trim();
        names.iter().any(|name| header.eq_ignore_ascii_case(name))
    })
}

/// Like [`find_column`] but fatal when absent.
fn require_column(headers: &csv::StringRecord, names: &[&str]) -> Result<usize, IngestError> {
    find_column(headers, names).ok_or_else(|| IngestError::MissingColumn {
        column: names[0].to_string(),
        found: headers
            .iter()
            .map(str::trim)
            .collect::<Vec<_>>()
            .join(", "),
    })
}

/// Line number of a record, falling back to `fallback` when the reader did
/// not track positions.
fn line_of(record: &csv::StringRecord, fallback: u64) -> u64 {
    record.position().map_or(fallback, csv::Position::line)
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use flate2::Compression;
    use flate2::write::GzEncoder;

    use super::*;

    #[test]
    fn reads_gzipped_files() {
        let path = std::env::temp_dir().join(format!(
            "lifer_chaser_ingest_{}.csv.gz",
            std::process::id()
        ));
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"Species\nMallard - Anas platyrhynchos\n").unwrap();
        std::fs::write(&path, encoder.finish().unwrap()).unwrap();

        let life_list = load_life_list(open_input(&path).unwrap()).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(life_list.contains("mallard"));
        assert_eq!(life_list.len(), 1);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = open_input(Path::new("/nonexistent/lifer_chaser.csv")).err().unwrap();
        assert!(matches!(err, IngestError::Io { .. }));
    }
}
