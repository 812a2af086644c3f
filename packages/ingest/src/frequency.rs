//! Frequency table loading.
//!
//! Frequency tables have one row per species and week-of-month with the
//! columns `comName`, `monthQt`, `frequency`, and `sampleSize`, usually
//! preceded by an unnamed row-index column that is ignored.

use std::io::Read;

use lifer_chaser_analytics_models::FrequencyRecord;

use crate::{IngestError, line_of, require_column};

/// Loads a frequency table. Rows that do not deserialize are skipped with
/// a warning.
///
/// # Errors
///
/// Returns [`IngestError::MissingColumn`] if `comName`, `monthQt`, or
/// `frequency` is absent, or [`IngestError::Csv`] if the stream cannot be
/// read.
pub fn load_frequency_table<R: Read>(reader: R) -> Result<Vec<FrequencyRecord>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    for column in ["comName", "monthQt", "frequency"] {
        require_column(&headers, &[column])?;
    }

    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for (i, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                log::warn!("Skipping frequency row {}: {e}", i + 2);
                skipped += 1;
                continue;
            }
        };

        match record.deserialize::<FrequencyRecord>(Some(&headers)) {
            Ok(row) => rows.push(row),
            Err(e) => {
                log::warn!("Skipping line {}: {e}", line_of(&record, i as u64 + 2));
                skipped += 1;
            }
        }
    }

    log::info!("Loaded {} frequency rows ({skipped} skipped)", rows.len());

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_rebird_layout() {
        let csv = "\
\"\",\"comName\",\"monthQt\",\"frequency\",\"sampleSize\"
\"1\",\"Blackburnian Warbler\",\"May-1\",0.21,120
\"2\",\"Blackburnian Warbler\",\"May-2\",0.34,133
\"3\",\"Cape May Warbler\",\"May-2\",not-a-number,133
\"4\",\"Wood Thrush\",\"May-2\",0.5,
";
        let rows = load_frequency_table(csv.as_bytes()).unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].common_name, "Blackburnian Warbler");
        assert_eq!(rows[0].month_week, "May-1");
        assert!((rows[1].frequency - 0.34).abs() < f64::EPSILON);
        assert_eq!(rows[1].sample_size, Some(133));
        assert_eq!(rows[2].common_name, "Wood Thrush");
        assert_eq!(rows[2].sample_size, None);
    }

    #[test]
    fn missing_frequency_column_is_fatal() {
        let csv = "comName,monthQt\nMallard,May-1\n";
        assert!(matches!(
            load_frequency_table(csv.as_bytes()),
            Err(IngestError::MissingColumn { ref column, .. }) if column == "frequency"
        ));
    }
}
