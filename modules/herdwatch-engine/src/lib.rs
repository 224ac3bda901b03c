//! Outbreak analysis engine.
//!
//! The explicit pipeline behind the dashboard: load → filter → score.
//! The `Dataset` is built once and shared read-only; everything after it
//! is a pure function, so the HTTP layer calls `filter_and_score` once
//! per request and never holds state of its own.

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod risk;

pub use aggregate::{monthly_counts, MonthlyCount};
pub use filter::filter_records;
pub use loader::{load, load_cached, Dataset};
pub use risk::{assess, time_factor, FOCUS_REGION};

use herdwatch_common::{OutbreakRecord, RiskAssessment, ScenarioParams};

/// Run one full analysis pass: clamp the cutoff into the dataset's date
/// range, filter, score. Returns the filtered subset (for the map and
/// the trend chart) alongside the assessment.
///
/// An empty dataset is the caller's problem to refuse up front; this
/// still returns an empty subset and a floor assessment rather than
/// panicking.
pub fn filter_and_score(
    dataset: &Dataset,
    params: &ScenarioParams,
) -> (Vec<OutbreakRecord>, RiskAssessment) {
    let (min_date, max_date) = dataset
        .date_range()
        .unwrap_or((params.cutoff, params.cutoff));
    let cutoff = params.cutoff.clamp(min_date, max_date);

    let subset = filter::filter_records(dataset.records(), cutoff, &params.regions);
    let assessment = risk::assess(&subset, cutoff, min_date, max_date, params.enhanced);
    (subset, assessment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use herdwatch_common::Phase;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn record(occurred: &str, region: &str) -> OutbreakRecord {
        let occurred_on = date(occurred);
        OutbreakRecord {
            occurred_on,
            latitude: 37.5,
            longitude: 127.0,
            region: region.to_string(),
            country: None,
            locality: None,
            species: None,
            cases: None,
            month: herdwatch_common::MonthKey::from_date(occurred_on),
        }
    }

    #[test]
    fn cutoff_outside_range_is_clamped() {
        let dataset = Dataset::from_records(vec![
            record("2025-02-01", "Asia"),
            record("2025-06-01", "Asia"),
        ]);
        let params = ScenarioParams {
            cutoff: date("2030-01-01"),
            regions: vec!["Asia".to_string()],
            enhanced: false,
        };
        let (subset, assessment) = filter_and_score(&dataset, &params);
        assert_eq!(subset.len(), 2);
        assert!((assessment.time_factor - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_dataset_yields_floor_assessment() {
        let dataset = Dataset::from_records(vec![]);
        let params = ScenarioParams {
            cutoff: date("2025-05-01"),
            regions: vec!["Asia".to_string()],
            enhanced: true,
        };
        let (subset, assessment) = filter_and_score(&dataset, &params);
        assert!(subset.is_empty());
        assert_eq!(assessment.total_cases, 0);
        assert_eq!(assessment.phase, Phase::Latent);
    }
}
