use crate::models::{ComparisonOutcome, ComparisonSummary, RainfallRelevance};
use std::collections::HashSet;

/// Summary figures for a batch of comparisons.
///
/// The average timing difference only counts records that had a
/// recommendation, so sentinel zeros do not pull it down. Crops are counted
/// by their exact `crop_type` text.
pub fn summarize(outcomes: &[ComparisonOutcome]) -> ComparisonSummary {
    let compared: Vec<_> = outcomes.iter().filter_map(|o| o.result()).collect();

    let offsets: Vec<i64> = compared
        .iter()
        .filter(|r| r.has_recommendation())
        .map(|r| r.days_difference.abs())
        .collect();

    let average_absolute_timing_difference = if offsets.is_empty() {
        0
    } else {
        (offsets.iter().sum::<i64>() as f64 / offsets.len() as f64).round() as i64
    };

    let distinct_crop_count = outcomes
        .iter()
        .map(|o| o.log().crop_type.as_str())
        .collect::<HashSet<_>>()
        .len();

    ComparisonSummary {
        total_count: outcomes.len(),
        average_absolute_timing_difference,
        high_impact_count: compared
            .iter()
            .filter(|r| r.rainfall_relevance == RainfallRelevance::High)
            .count(),
        unavailable_count: outcomes.len() - compared.len(),
        distinct_crop_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::{compare_all, RainfallIndex};
    use crate::models::{AgriculturalLog, LogKind};

    fn log(crop: &str, actual: &str, recommended: Option<&str>) -> AgriculturalLog {
        let log = AgriculturalLog::new(LogKind::Harvest, crop, actual);
        match recommended {
            Some(r) => log.with_recommended(r),
            None => log,
        }
    }

    #[test]
    fn empty_batch() {
        let summary = summarize(&[]);
        assert_eq!(summary, ComparisonSummary::default());
    }

    #[test]
    fn average_excludes_records_without_recommendation() {
        let logs = vec![
            log("RC222", "2025-06-10", None),
            log("RC222", "2025-06-05", Some("2025-06-01")),
            log("RC160", "2025-06-01", Some("2025-06-03")),
        ];
        let outcomes = compare_all(&logs, &RainfallIndex::new());
        let summary = summarize(&outcomes);
        assert_eq!(summary.total_count, 3);
        // round((4 + 2) / 2), not round((0 + 4 + 2) / 3)
        assert_eq!(summary.average_absolute_timing_difference, 3);
        assert_eq!(summary.distinct_crop_count, 2);
    }

    #[test]
    fn average_rounds_half_up() {
        let logs = vec![
            log("RC222", "2025-06-02", Some("2025-06-01")),
            log("RC222", "2025-06-03", Some("2025-06-01")),
        ];
        let summary = summarize(&compare_all(&logs, &RainfallIndex::new()));
        // 1.5 rounds to 2
        assert_eq!(summary.average_absolute_timing_difference, 2);
    }

    #[test]
    fn zero_when_no_record_has_recommendation() {
        let logs = vec![log("RC222", "2025-06-10", None), log("RC222", "2025-06-11", None)];
        let summary = summarize(&compare_all(&logs, &RainfallIndex::new()));
        assert_eq!(summary.average_absolute_timing_difference, 0);
        assert_eq!(summary.high_impact_count, 0);
    }

    #[test]
    fn counts_high_relevance_and_unavailable() {
        let mut index = RainfallIndex::new();
        index.insert(chrono::NaiveDate::from_ymd_opt(2025, 6, 3).unwrap(), 120.0);
        let logs = vec![
            log("RC222", "2025-06-10", Some("2025-06-01")),
            log("RC222", "2025-06-02", Some("2025-06-01")),
            log("RC222", "06/10/2025", Some("2025-06-01")),
        ];
        let summary = summarize(&compare_all(&logs, &index));
        assert_eq!(summary.total_count, 3);
        assert_eq!(summary.high_impact_count, 1);
        assert_eq!(summary.unavailable_count, 1);
        // Unavailable record is left out of the average: round((9 + 1) / 2)
        assert_eq!(summary.average_absolute_timing_difference, 5);
    }

    #[test]
    fn crops_are_counted_by_exact_name() {
        let logs = vec![
            log("RC222", "2025-06-10", None),
            log("RC222", "2025-06-11", None),
            log("rc222", "2025-06-12", None),
            log("RC222 ", "2025-06-13", None),
        ];
        let summary = summarize(&compare_all(&logs, &RainfallIndex::new()));
        assert_eq!(summary.distinct_crop_count, 3);
    }
}
