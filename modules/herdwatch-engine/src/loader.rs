//! CSV ingestion for outbreak exports.
//!
//! A row becomes an [`OutbreakRecord`] only if its occurrence date
//! parses, its coordinates are present and non-zero (zero is the
//! exports' sentinel for "location unknown"), and its region label is
//! non-empty. Everything else is dropped, not reported. Files that
//! cannot be opened are skipped with a warning; the loader only ever
//! fails on its own bugs, so an all-bad input surfaces as an empty
//! `Dataset` the caller must refuse.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use tracing::{info, warn};

use herdwatch_common::{HerdwatchError, MonthKey, OutbreakRecord};

/// Date formats seen across the WAHIS-style exports, tried in order.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Regions preselected on the dashboard when the user has not chosen any.
const DEFAULT_REGION_CHOICES: &[&str] = &["Asia", "Europe"];

// --- Dataset ---

/// Validated records sorted ascending by occurrence date, plus the
/// summary the HTTP boundary exposes. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    records: Vec<OutbreakRecord>,
    date_range: Option<(NaiveDate, NaiveDate)>,
    regions: Vec<String>,
}

impl Dataset {
    /// Sort the given records and derive the summary. The loader calls
    /// this after validation; tests use it to build fixtures directly.
    pub fn from_records(mut records: Vec<OutbreakRecord>) -> Self {
        records.sort_by_key(|r| r.occurred_on);

        let date_range = match (records.first(), records.last()) {
            (Some(first), Some(last)) => Some((first.occurred_on, last.occurred_on)),
            _ => None,
        };

        let mut regions: Vec<String> = records.iter().map(|r| r.region.clone()).collect();
        regions.sort();
        regions.dedup();

        Self { records, date_range, regions }
    }

    pub fn records(&self) -> &[OutbreakRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Min and max occurrence date; `None` for an empty dataset.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.date_range
    }

    /// Distinct region labels, sorted.
    pub fn regions(&self) -> &[String] {
        &self.regions
    }

    /// Default dashboard selection: whichever of Asia and Europe the
    /// data actually contains.
    pub fn default_regions(&self) -> Vec<String> {
        DEFAULT_REGION_CHOICES
            .iter()
            .filter(|choice| self.regions.iter().any(|r| r == *choice))
            .map(|choice| choice.to_string())
            .collect()
    }
}

// --- Loading ---

/// One raw CSV row before validation. Everything is optional text so a
/// single junk cell drops the row at validation rather than failing the
/// whole file. Aliases cover the header spellings the exports use.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(alias = "date", alias = "occurrence_date", alias = "Date")]
    occurred_on: Option<String>,
    #[serde(alias = "Lat", alias = "lat")]
    latitude: Option<String>,
    #[serde(alias = "Long", alias = "lng", alias = "lon")]
    longitude: Option<String>,
    #[serde(alias = "Region", alias = "continent")]
    region: Option<String>,
    #[serde(alias = "Country")]
    country: Option<String>,
    #[serde(alias = "Locality")]
    locality: Option<String>,
    #[serde(alias = "Species")]
    species: Option<String>,
    #[serde(alias = "Cases")]
    cases: Option<String>,
}

/// Read every configured export, concatenate what loads, validate, sort.
/// A missing file is a warning; the result may be empty.
pub fn load(paths: &[PathBuf]) -> Result<Dataset, HerdwatchError> {
    let mut records = Vec::new();

    for path in paths {
        match read_file(path) {
            Ok(mut file_records) => {
                info!(
                    path = %path.display(),
                    records = file_records.len(),
                    "Loaded outbreak export"
                );
                records.append(&mut file_records);
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping unreadable outbreak export");
            }
        }
    }

    Ok(Dataset::from_records(records))
}

/// `load`, memoized per distinct path list for the life of the process.
/// The source files do not change during a session, so repeated callers
/// share one immutable `Dataset`.
pub fn load_cached(paths: &[PathBuf]) -> Result<Arc<Dataset>, HerdwatchError> {
    static CACHE: OnceLock<Mutex<HashMap<Vec<PathBuf>, Arc<Dataset>>>> = OnceLock::new();

    let cache = CACHE.get_or_init(|| Mutex::new(HashMap::new()));
    let mut cache = cache.lock().expect("dataset cache poisoned");

    if let Some(dataset) = cache.get(paths) {
        return Ok(dataset.clone());
    }

    let dataset = Arc::new(load(paths)?);
    cache.insert(paths.to_vec(), dataset.clone());
    Ok(dataset)
}

fn read_file(path: &Path) -> Result<Vec<OutbreakRecord>, HerdwatchError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| HerdwatchError::Csv(e.to_string()))?;

    let mut records = Vec::new();
    let mut dropped = 0usize;

    for row in reader.deserialize::<RawRow>() {
        match row {
            Ok(raw) => match validate(raw) {
                Some(record) => records.push(record),
                None => dropped += 1,
            },
            Err(_) => dropped += 1,
        }
    }

    if dropped > 0 {
        warn!(path = %path.display(), dropped, "Dropped rows failing validation");
    }

    Ok(records)
}

/// Apply the record invariants; `None` means the row is dropped.
fn validate(raw: RawRow) -> Option<OutbreakRecord> {
    let occurred_on = parse_occurred(raw.occurred_on.as_deref()?)?;
    let latitude = parse_number(raw.latitude.as_deref())?;
    let longitude = parse_number(raw.longitude.as_deref())?;

    // Zero coordinates are the exports' "unknown location" sentinel.
    if latitude == 0.0 || longitude == 0.0 {
        return None;
    }

    let region = raw.region?.trim().to_string();
    if region.is_empty() {
        return None;
    }

    Some(OutbreakRecord {
        occurred_on,
        latitude,
        longitude,
        region,
        country: clean(raw.country),
        locality: clean(raw.locality),
        species: clean(raw.species),
        cases: raw.cases.as_deref().and_then(|c| c.trim().parse().ok()),
        month: MonthKey::from_date(occurred_on),
    })
}

/// Lenient occurrence-date parse: plain date formats first, then the
/// datetime spellings some exports use. Unparseable means missing.
fn parse_occurred(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    None
}

fn parse_number(raw: Option<&str>) -> Option<f64> {
    raw?.trim().parse().ok()
}

fn clean(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "occurred_on,latitude,longitude,region,country,species,cases";

    fn write_csv(rows: &[&str]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{HEADER}").unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    #[test]
    fn loads_valid_rows_sorted_by_date() {
        let file = write_csv(&[
            "2025-06-10,37.5,127.0,Asia,South Korea,Cattle,3",
            "2025-01-05,41.0,28.9,Europe,Turkey,Cattle,1",
            "2025-03-20,23.8,90.4,Asia,Bangladesh,Cattle,7",
        ]);
        let dataset = load(&[file.path().to_path_buf()]).unwrap();

        assert_eq!(dataset.len(), 3);
        let dates: Vec<_> = dataset.records().iter().map(|r| r.occurred_on).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);

        let (min, max) = dataset.date_range().unwrap();
        assert_eq!(min.to_string(), "2025-01-05");
        assert_eq!(max.to_string(), "2025-06-10");
        assert_eq!(dataset.regions(), ["Asia", "Europe"]);
    }

    #[test]
    fn drops_zero_coordinate_rows() {
        let file = write_csv(&[
            "2025-02-01,0,90.4,Asia,,Cattle,",
            "2025-02-02,23.8,0,Asia,,Cattle,",
            "2025-02-03,23.8,90.4,Asia,,Cattle,",
        ]);
        let dataset = load(&[file.path().to_path_buf()]).unwrap();
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn all_zero_coordinates_yield_empty_dataset() {
        let file = write_csv(&[
            "2025-02-01,0,90.4,Asia,,,",
            "2025-02-02,23.8,0,Europe,,,",
        ]);
        let dataset = load(&[file.path().to_path_buf()]).unwrap();
        assert!(dataset.is_empty());
        assert!(dataset.date_range().is_none());
    }

    #[test]
    fn drops_rows_with_unparseable_or_missing_essentials() {
        let file = write_csv(&[
            "not-a-date,37.5,127.0,Asia,,,",
            ",37.5,127.0,Asia,,,",
            "2025-02-03,abc,127.0,Asia,,,",
            "2025-02-04,37.5,127.0,,,,",
            "2025-02-05,37.5,127.0,Asia,,,",
        ]);
        let dataset = load(&[file.path().to_path_buf()]).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records()[0].occurred_on.to_string(), "2025-02-05");
    }

    #[test]
    fn lenient_date_formats_accepted() {
        let file = write_csv(&[
            "2025/02/01,37.5,127.0,Asia,,,",
            "2025-02-02 10:30:00,37.5,127.0,Asia,,,",
        ]);
        let dataset = load(&[file.path().to_path_buf()]).unwrap();
        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn missing_file_is_skipped_not_fatal() {
        let file = write_csv(&["2025-02-05,37.5,127.0,Asia,,,"]);
        let paths = vec![
            PathBuf::from("/nonexistent/2024.csv"),
            file.path().to_path_buf(),
        ];
        let dataset = load(&paths).unwrap();
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn multiple_files_concatenate_before_sorting() {
        let newer = write_csv(&["2025-06-01,37.5,127.0,Asia,,,"]);
        let older = write_csv(&["2024-03-01,41.0,28.9,Europe,,,"]);
        let dataset = load(&[newer.path().to_path_buf(), older.path().to_path_buf()]).unwrap();
        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[0].region, "Europe");
    }

    #[test]
    fn cache_returns_shared_dataset_for_identical_paths() {
        let file = write_csv(&["2025-02-05,37.5,127.0,Asia,,,"]);
        let paths = vec![file.path().to_path_buf()];
        let first = load_cached(&paths).unwrap();
        let second = load_cached(&paths).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn default_regions_keeps_only_present_choices() {
        let file = write_csv(&[
            "2025-02-05,37.5,127.0,Asia,,,",
            "2025-02-06,-1.3,36.8,Africa,,,",
        ]);
        let dataset = load(&[file.path().to_path_buf()]).unwrap();
        assert_eq!(dataset.default_regions(), ["Asia"]);
    }

    #[test]
    fn passthrough_columns_are_cleaned() {
        let file = write_csv(&["2025-02-05,37.5,127.0,Asia,  South Korea , Cattle ,12"]);
        let dataset = load(&[file.path().to_path_buf()]).unwrap();
        let record = &dataset.records()[0];
        assert_eq!(record.country.as_deref(), Some("South Korea"));
        assert_eq!(record.species.as_deref(), Some("Cattle"));
        assert_eq!(record.cases, Some(12));
    }
}
