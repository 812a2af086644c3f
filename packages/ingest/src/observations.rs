//! Observation export loading.
//!
//! Accepts the personal-data export (`Submission ID`, `Common Name`,
//! `Scientific Name`, `Count`, `Latitude`, `Longitude`, `Date`) and the
//! upper-case column names of the basic dataset. Other columns are
//! ignored.

use std::io::Read;

use chrono::NaiveDate;
use lifer_chaser_ingest_models::{LoadReport, MalformedRecord};
use lifer_chaser_observation_models::{Location, Observation};

use crate::{IngestError, find_column, line_of, require_column};

const SUBMISSION_ID: &[&str] = &["Submission ID", "SAMPLING EVENT IDENTIFIER"];
const COMMON_NAME: &[&str] = &["Common Name"];
const SCIENTIFIC_NAME: &[&str] = &["Scientific Name"];
const COUNT: &[&str] = &["Count", "OBSERVATION COUNT"];
const LATITUDE: &[&str] = &["Latitude"];
const LONGITUDE: &[&str] = &["Longitude"];
const DATE: &[&str] = &["Date", "OBSERVATION DATE"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m-%d-%Y", "%m/%d/%Y"];

/// Column positions resolved from the header row.
struct Columns {
    submission_id: usize,
    common_name: usize,
    scientific_name: Option<usize>,
    count: Option<usize>,
    latitude: usize,
    longitude: usize,
    date: usize,
}

impl Columns {
    fn resolve(headers: &csv::StringRecord) -> Result<Self, IngestError> {
        Ok(Self {
            submission_id: require_column(headers, SUBMISSION_ID)?,
            common_name: require_column(headers, COMMON_NAME)?,
            scientific_name: find_column(headers, SCIENTIFIC_NAME),
            count: find_column(headers, COUNT),
            latitude: require_column(headers, LATITUDE)?,
            longitude: require_column(headers, LONGITUDE)?,
            date: require_column(headers, DATE)?,
        })
    }
}

/// Loads an observation export.
///
/// Rows with a missing species name, location, or date, or with an
/// unparseable date, coordinate, or count, are skipped and listed in the
/// report.
///
/// # Errors
///
/// Returns [`IngestError::MissingColumn`] if a required header is absent,
/// or [`IngestError::Csv`] if the stream cannot be read.
pub fn load_observations<R: Read>(reader: R) -> Result<LoadReport, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let columns = Columns::resolve(reader.headers()?)?;
    let mut report = LoadReport::default();

    for (i, result) in reader.records().enumerate() {
        // Header is line 1.
        let fallback_line = i as u64 + 2;
        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                let line = e.position().map_or(fallback_line, csv::Position::line);
                skip(&mut report, line, e.to_string());
                continue;
            }
        };

        match parse_row(&record, &columns) {
            Ok(observation) => report.observations.push(observation),
            Err(reason) => skip(&mut report, line_of(&record, fallback_line), reason),
        }
    }

    log::info!(
        "Loaded {} observations ({} rows skipped)",
        report.observations.len(),
        report.skipped.len()
    );

    Ok(report)
}

fn skip(report: &mut LoadReport, line: u64, reason: String) {
    log::warn!("Skipping line {line}: {reason}");
    report.skipped.push(MalformedRecord { line, reason });
}

fn parse_row(record: &csv::StringRecord, columns: &Columns) -> Result<Observation, String> {
    let common_name = required(record, columns.common_name, "common name")?;
    let submission_id = required(record, columns.submission_id, "submission ID")?;
    let latitude = parse_coordinate(required(record, columns.latitude, "latitude")?, "latitude")?;
    let longitude =
        parse_coordinate(required(record, columns.longitude, "longitude")?, "longitude")?;
    let location = Location::new(latitude, longitude);
    if !location.is_valid() {
        return Err(format!("location {location} is out of range"));
    }
    let date = parse_date(required(record, columns.date, "date")?)?;
    let count = parse_count(columns.count.and_then(|i| record.get(i)).unwrap_or(""))?;
    let scientific_name = columns
        .scientific_name
        .and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToString::to_string);

    Ok(Observation {
        submission_id: submission_id.to_string(),
        common_name: common_name.to_string(),
        scientific_name,
        location,
        date,
        count,
    })
}

fn required<'a>(record: &'a csv::StringRecord, index: usize, name: &str) -> Result<&'a str, String> {
    record
        .get(index)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| format!("missing {name}"))
}

fn parse_coordinate(value: &str, name: &str) -> Result<f64, String> {
    value
        .parse::<f64>()
        .map_err(|_| format!("invalid {name} '{value}'"))
}

/// Parses a date in any of the accepted formats.
///
/// # Errors
///
/// Returns a description of the value if no format matches.
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .ok_or_else(|| format!("invalid date '{value}'"))
}

/// Parses a count. `X` (present, not counted) and an empty cell mean 1.
///
/// # Errors
///
/// Returns a description of the value if it is not a positive integer.
pub fn parse_count(value: &str) -> Result<u32, String> {
    let value = value.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("x") {
        return Ok(1);
    }
    match value.parse::<u32>() {
        Ok(count) if count >= 1 => Ok(count),
        _ => Err(format!("invalid count '{value}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = "\
Submission ID,Common Name,Scientific Name,Taxonomic Order,Count,State/Province,County,Location ID,Location,Latitude,Longitude,Date,Time
S100,Mallard,Anas platyrhynchos,300,4,US-PA,Bucks,L1,Pond,40.1,-75.1,2019-05-01,08:00 AM
S100,Gadwall,Mareca strepera,280,X,US-PA,Bucks,L1,Pond,40.1,-75.1,2019-05-01,08:00 AM
S101,Wood Duck,Aix sponsa,250,,US-PA,Bucks,L2,Creek,40.2,-75.2,05-03-2018,09:00 AM
S102,Green Heron,Butorides virescens,900,2,US-PA,Bucks,L2,Creek,40.2,-75.2,sometime,09:00 AM
S103,,Anas sp.,301,1,US-PA,Bucks,L2,Creek,40.2,-75.2,2019-05-04,09:00 AM
S104,Killdeer,Charadrius vociferus,500,0,US-PA,Bucks,L2,Creek,40.2,-75.2,2019-05-04,09:00 AM
S105,Killdeer,Charadrius vociferus,500,1,US-PA,Bucks,L2,Creek,140.2,-75.2,2019-05-04,09:00 AM
";

    #[test]
    fn loads_valid_rows_and_skips_bad_ones() {
        let report = load_observations(EXPORT.as_bytes()).unwrap();

        assert_eq!(report.observations.len(), 3);
        assert_eq!(report.rows_read(), 7);

        let mallard = &report.observations[0];
        assert_eq!(mallard.submission_id, "S100");
        assert_eq!(mallard.common_name, "Mallard");
        assert_eq!(mallard.scientific_name.as_deref(), Some("Anas platyrhynchos"));
        assert_eq!(mallard.location, Location::new(40.1, -75.1));
        assert_eq!(mallard.count, 4);

        assert_eq!(report.observations[1].count, 1);
        assert_eq!(report.observations[2].count, 1);
        assert_eq!(
            report.observations[2].date,
            NaiveDate::from_ymd_opt(2018, 5, 3).unwrap()
        );

        let lines: Vec<u64> = report.skipped.iter().map(|s| s.line).collect();
        assert_eq!(lines, vec![5, 6, 7, 8]);
        assert!(report.skipped[0].reason.contains("invalid date"));
        assert!(report.skipped[1].reason.contains("missing common name"));
        assert!(report.skipped[2].reason.contains("invalid count"));
        assert!(report.skipped[3].reason.contains("out of range"));
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let csv = "Submission ID,Common Name,Latitude,Date\nS1,Mallard,40.0,2019-05-01\n";
        let err = load_observations(csv.as_bytes()).unwrap_err();
        assert!(
            matches!(err, IngestError::MissingColumn { ref column, .. } if column == "Longitude")
        );
    }

    #[test]
    fn accepts_basic_dataset_headers() {
        let csv = "\
SAMPLING EVENT IDENTIFIER,COMMON NAME,SCIENTIFIC NAME,OBSERVATION COUNT,LATITUDE,LONGITUDE,OBSERVATION DATE
S9,Northern Flicker,Colaptes auratus,X,41.0,-74.0,2020-06-15
";
        let report = load_observations(csv.as_bytes()).unwrap();
        assert_eq!(report.observations.len(), 1);
        assert_eq!(report.observations[0].common_name, "Northern Flicker");
        assert_eq!(report.observations[0].count, 1);
    }

    #[test]
    fn count_and_date_parsing() {
        assert_eq!(parse_count("x"), Ok(1));
        assert_eq!(parse_count(" 12 "), Ok(12));
        assert!(parse_count("-1").is_err());
        assert!(parse_count("2.5").is_err());

        let expected = NaiveDate::from_ymd_opt(2019, 12, 31).unwrap();
        assert_eq!(parse_date("2019-12-31"), Ok(expected));
        assert_eq!(parse_date("12-31-2019"), Ok(expected));
        assert_eq!(parse_date("12/31/2019"), Ok(expected));
        assert!(parse_date("31.12.2019").is_err());
    }
}
