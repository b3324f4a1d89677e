use crate::models::{parse_calendar_date, PlantingRecommendation};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeSet;

/// Recommended planting and harvesting days that fall in one month
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecommendationCalendar {
    pub year: i32,
    pub month: u32,
    pub planting: BTreeSet<NaiveDate>,
    pub harvesting: BTreeSet<NaiveDate>,
}

impl RecommendationCalendar {
    /// Collect the recommendation dates for `month` (1-12) of `year`.
    /// Malformed or missing dates are ignored.
    pub fn for_month(recommendations: &[PlantingRecommendation], year: i32, month: u32) -> Self {
        let in_month = |value: &Option<String>| {
            value
                .as_deref()
                .and_then(|s| parse_calendar_date("recommendation", s).ok())
                .filter(|d| d.year() == year && d.month() == month)
        };

        Self {
            year,
            month,
            planting: recommendations
                .iter()
                .filter_map(|r| in_month(&r.planting_date))
                .collect(),
            harvesting: recommendations
                .iter()
                .filter_map(|r| in_month(&r.harvesting_date))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.planting.is_empty() && self.harvesting.is_empty()
    }

    pub fn is_planting_day(&self, date: NaiveDate) -> bool {
        self.planting.contains(&date)
    }

    pub fn is_harvesting_day(&self, date: NaiveDate) -> bool {
        self.harvesting.contains(&date)
    }

    /// Every recommended day in date order with what is recommended on it
    pub fn marked_days(&self) -> Vec<(NaiveDate, &'static str)> {
        self.planting
            .union(&self.harvesting)
            .map(|date| {
                let label = match (self.is_planting_day(*date), self.is_harvesting_day(*date)) {
                    (true, true) => "planting, harvesting",
                    (true, false) => "planting",
                    _ => "harvesting",
                };
                (*date, label)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn collects_only_matching_month() {
        let recs = vec![
            PlantingRecommendation::new(Some("2025-04-16"), Some("2025-08-20")),
            PlantingRecommendation::new(Some("2025-04-20T00:00:00+00:00"), None),
            PlantingRecommendation::new(Some("2024-04-18"), Some("2025-04-30")),
            PlantingRecommendation::new(Some("garbage"), None),
            PlantingRecommendation::new(Some("2025-04-16"), None),
        ];
        let cal = RecommendationCalendar::for_month(&recs, 2025, 4);
        assert_eq!(
            cal.planting.iter().copied().collect::<Vec<_>>(),
            vec![ymd(2025, 4, 16), ymd(2025, 4, 20)]
        );
        assert!(cal.is_harvesting_day(ymd(2025, 4, 30)));
        assert!(!cal.is_planting_day(ymd(2024, 4, 18)));
    }

    #[test]
    fn marked_days_merge_both_kinds() {
        let recs = vec![
            PlantingRecommendation::new(Some("2025-10-20"), Some("2025-10-02")),
            PlantingRecommendation::new(Some("2025-10-02"), None),
            PlantingRecommendation::new(None, Some("2025-10-31")),
        ];
        let cal = RecommendationCalendar::for_month(&recs, 2025, 10);
        assert_eq!(
            cal.marked_days(),
            vec![
                (ymd(2025, 10, 2), "planting, harvesting"),
                (ymd(2025, 10, 20), "planting"),
                (ymd(2025, 10, 31), "harvesting"),
            ]
        );
    }

    #[test]
    fn empty_month() {
        let recs = vec![PlantingRecommendation::new(Some("2025-04-16"), None)];
        assert!(RecommendationCalendar::for_month(&recs, 2025, 5).is_empty());
    }
}
