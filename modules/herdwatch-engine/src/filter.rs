//! Scenario filtering: pure, order-preserving, no fallback behavior.

use chrono::NaiveDate;

use herdwatch_common::OutbreakRecord;

/// Keep exactly the records dated at or before `cutoff` whose region is
/// in the selection.
///
/// An empty selection yields an empty subset — there is no implicit
/// "all regions" fallback. Input order (ascending by date in a loaded
/// dataset) is preserved, which makes the function idempotent.
pub fn filter_records(
    records: &[OutbreakRecord],
    cutoff: NaiveDate,
    regions: &[String],
) -> Vec<OutbreakRecord> {
    records
        .iter()
        .filter(|r| r.occurred_on <= cutoff && regions.iter().any(|s| s == &r.region))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use herdwatch_common::MonthKey;

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
            month: MonthKey::from_date(occurred_on),
        }
    }

    fn sample() -> Vec<OutbreakRecord> {
        vec![
            record("2025-01-10", "Asia"),
            record("2025-02-14", "Europe"),
            record("2025-03-03", "Asia"),
            record("2025-04-22", "Africa"),
            record("2025-05-30", "Asia"),
        ]
    }

    fn selection(regions: &[&str]) -> Vec<String> {
        regions.iter().map(|r| r.to_string()).collect()
    }

    #[test]
    fn keeps_only_selected_regions_up_to_cutoff() {
        let subset = filter_records(&sample(), date("2025-03-31"), &selection(&["Asia"]));
        assert_eq!(subset.len(), 2);
        assert!(subset.iter().all(|r| r.region == "Asia"));
    }

    #[test]
    fn cutoff_is_inclusive() {
        let subset = filter_records(&sample(), date("2025-03-03"), &selection(&["Asia"]));
        assert_eq!(subset.len(), 2);
    }

    #[test]
    fn empty_selection_yields_empty_subset() {
        let subset = filter_records(&sample(), date("2025-12-31"), &[]);
        assert!(subset.is_empty());
    }

    #[test]
    fn preserves_input_order() {
        let subset = filter_records(
            &sample(),
            date("2025-12-31"),
            &selection(&["Asia", "Europe"]),
        );
        let dates: Vec<_> = subset.iter().map(|r| r.occurred_on).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
    }

    #[test]
    fn filter_is_idempotent() {
        let cutoff = date("2025-04-01");
        let regions = selection(&["Asia", "Europe"]);
        let once = filter_records(&sample(), cutoff, &regions);
        let twice = filter_records(&once, cutoff, &regions);
        assert_eq!(once, twice);
    }
}
