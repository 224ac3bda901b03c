//! Monthly aggregation for the trend chart.

use std::collections::BTreeMap;

use serde::Serialize;

use herdwatch_common::{MonthKey, OutbreakRecord};

/// Record count for one month bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyCount {
    pub month: MonthKey,
    pub count: u64,
}

/// Group a filtered subset by month bucket, ascending. An empty subset
/// yields an empty list, never an error.
pub fn monthly_counts(subset: &[OutbreakRecord]) -> Vec<MonthlyCount> {
    let mut buckets: BTreeMap<MonthKey, u64> = BTreeMap::new();
    for record in subset {
        *buckets.entry(record.month).or_insert(0) += 1;
    }
    buckets
        .into_iter()
        .map(|(month, count)| MonthlyCount { month, count })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(occurred: &str) -> OutbreakRecord {
        let occurred_on = NaiveDate::parse_from_str(occurred, "%Y-%m-%d").unwrap();
        OutbreakRecord {
            occurred_on,
            latitude: 37.5,
            longitude: 127.0,
            region: "Asia".to_string(),
            country: None,
            locality: None,
            species: None,
            cases: None,
            month: MonthKey::from_date(occurred_on),
        }
    }

    #[test]
    fn groups_by_month_in_ascending_order() {
        let subset = vec![
            record("2025-03-10"),
            record("2025-01-05"),
            record("2025-03-22"),
            record("2024-12-31"),
        ];
        let counts = monthly_counts(&subset);

        let rendered: Vec<_> = counts
            .iter()
            .map(|c| (c.month.to_string(), c.count))
            .collect();
        assert_eq!(
            rendered,
            [
                ("2024-12".to_string(), 1),
                ("2025-01".to_string(), 1),
                ("2025-03".to_string(), 2),
            ]
        );
    }

    #[test]
    fn empty_subset_yields_empty_counts() {
        assert!(monthly_counts(&[]).is_empty());
    }
}
