use super::log::AgriculturalLog;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RainfallRelevance {
    Low,
    Medium,
    High,
}

impl RainfallRelevance {
    /// Step classification of rainfall accumulated over a comparison period
    pub fn from_total(total_mm: f64) -> Self {
        if total_mm > 100.0 {
            RainfallRelevance::High
        } else if total_mm > 30.0 {
            RainfallRelevance::Medium
        } else {
            RainfallRelevance::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RainfallRelevance::Low => "Low",
            RainfallRelevance::Medium => "Medium",
            RainfallRelevance::High => "High",
        }
    }
}

impl std::fmt::Display for RainfallRelevance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherImpact {
    #[serde(rename = "High rainfall likely influenced timing")]
    HighRainfallInfluence,
    #[serde(rename = "Moderate weather influence possible")]
    ModerateInfluence,
    #[serde(rename = "Minimal impact")]
    Minimal,
}

impl WeatherImpact {
    /// Weather impact from timing deviation and period rainfall together
    pub fn classify(days_difference: i64, rainfall_mm: f64) -> Self {
        let days = days_difference.abs();
        if days > 7 && rainfall_mm > 50.0 {
            WeatherImpact::HighRainfallInfluence
        } else if days > 3 && rainfall_mm > 20.0 {
            WeatherImpact::ModerateInfluence
        } else {
            WeatherImpact::Minimal
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherImpact::HighRainfallInfluence => "High rainfall likely influenced timing",
            WeatherImpact::ModerateInfluence => "Moderate weather influence possible",
            WeatherImpact::Minimal => "Minimal impact",
        }
    }

    pub fn is_notable(&self) -> bool {
        !matches!(self, WeatherImpact::Minimal)
    }
}

impl std::fmt::Display for WeatherImpact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// How far an event landed from its recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimingStatus {
    NoRecommendation,
    OnTime,
    /// Within three days either side
    Minor,
    Major,
}

impl TimingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimingStatus::NoRecommendation => "No recommendation",
            TimingStatus::OnTime => "On time",
            TimingStatus::Minor => "Minor deviation",
            TimingStatus::Major => "Major deviation",
        }
    }
}

/// A log enriched with its timing and rainfall analysis.
///
/// When the log has no recommended date, `days_difference` and
/// `rainfall_during_period` are both 0 as sentinels, not measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    #[serde(flatten)]
    pub log: AgriculturalLog,
    pub has_recommendation: bool,
    pub days_difference: i64,
    pub rainfall_during_period: f64,
    pub rainfall_relevance: RainfallRelevance,
    pub weather_impact: WeatherImpact,
}

impl ComparisonResult {
    pub fn has_recommendation(&self) -> bool {
        self.has_recommendation
    }

    pub fn timing_status(&self) -> TimingStatus {
        if !self.has_recommendation() {
            return TimingStatus::NoRecommendation;
        }
        match self.days_difference.abs() {
            0 => TimingStatus::OnTime,
            1..=3 => TimingStatus::Minor,
            _ => TimingStatus::Major,
        }
    }

    /// "On time", "N days late" or "N days early"; "-" without a recommendation
    pub fn timing_label(&self) -> String {
        if !self.has_recommendation() {
            return "-".to_string();
        }
        match self.days_difference {
            0 => "On time".to_string(),
            d if d > 0 => format!("{} days late", d),
            d => format!("{} days early", d.abs()),
        }
    }
}

/// Result of comparing one log; a record with unreadable dates is reported
/// rather than failing the batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ComparisonOutcome {
    Compared(ComparisonResult),
    Unavailable { log: AgriculturalLog, reason: String },
}

impl ComparisonOutcome {
    pub fn log(&self) -> &AgriculturalLog {
        match self {
            ComparisonOutcome::Compared(result) => &result.log,
            ComparisonOutcome::Unavailable { log, .. } => log,
        }
    }

    pub fn result(&self) -> Option<&ComparisonResult> {
        match self {
            ComparisonOutcome::Compared(result) => Some(result),
            ComparisonOutcome::Unavailable { .. } => None,
        }
    }
}

/// Dashboard figures for a batch of comparisons
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    pub total_count: usize,
    pub average_absolute_timing_difference: i64,
    pub high_impact_count: usize,
    pub unavailable_count: usize,
    pub distinct_crop_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LogKind;

    fn result_with(days: i64, recommended: bool) -> ComparisonResult {
        let mut log = AgriculturalLog::new(LogKind::Harvest, "RC222", "2025-06-10");
        if recommended {
            log = log.with_recommended("2025-06-01");
        }
        ComparisonResult {
            log,
            has_recommendation: recommended,
            days_difference: days,
            rainfall_during_period: 0.0,
            rainfall_relevance: RainfallRelevance::Low,
            weather_impact: WeatherImpact::Minimal,
        }
    }

    #[test]
    fn relevance_boundaries() {
        assert_eq!(RainfallRelevance::from_total(0.0), RainfallRelevance::Low);
        assert_eq!(RainfallRelevance::from_total(30.0), RainfallRelevance::Low);
        assert_eq!(RainfallRelevance::from_total(30.01), RainfallRelevance::Medium);
        assert_eq!(RainfallRelevance::from_total(100.0), RainfallRelevance::Medium);
        assert_eq!(RainfallRelevance::from_total(100.01), RainfallRelevance::High);
    }

    #[test]
    fn impact_requires_both_deviation_and_rain() {
        assert_eq!(
            WeatherImpact::classify(9, 60.0),
            WeatherImpact::HighRainfallInfluence
        );
        assert_eq!(
            WeatherImpact::classify(-9, 60.0),
            WeatherImpact::HighRainfallInfluence
        );
        // Long delay but only moderate rain
        assert_eq!(WeatherImpact::classify(9, 50.0), WeatherImpact::ModerateInfluence);
        assert_eq!(WeatherImpact::classify(4, 21.0), WeatherImpact::ModerateInfluence);
        assert_eq!(WeatherImpact::classify(3, 500.0), WeatherImpact::Minimal);
        assert_eq!(WeatherImpact::classify(30, 20.0), WeatherImpact::Minimal);
        assert_eq!(WeatherImpact::classify(7, 51.0), WeatherImpact::ModerateInfluence);
    }

    #[test]
    fn impact_serializes_as_narrative() {
        let json = serde_json::to_string(&WeatherImpact::ModerateInfluence).unwrap();
        assert_eq!(json, "\"Moderate weather influence possible\"");
        let back: WeatherImpact = serde_json::from_str("\"Minimal impact\"").unwrap();
        assert_eq!(back, WeatherImpact::Minimal);
    }

    #[test]
    fn timing_labels_follow_sign() {
        assert_eq!(result_with(9, true).timing_label(), "9 days late");
        assert_eq!(result_with(-2, true).timing_label(), "2 days early");
        assert_eq!(result_with(0, true).timing_label(), "On time");
        assert_eq!(result_with(0, false).timing_label(), "-");
    }

    #[test]
    fn timing_status_tiers() {
        assert_eq!(result_with(0, true).timing_status(), TimingStatus::OnTime);
        assert_eq!(result_with(-3, true).timing_status(), TimingStatus::Minor);
        assert_eq!(result_with(4, true).timing_status(), TimingStatus::Major);
        assert_eq!(
            result_with(0, false).timing_status(),
            TimingStatus::NoRecommendation
        );
    }

    #[test]
    fn outcome_json_keeps_sentinels() {
        let outcome = ComparisonOutcome::Compared(result_with(0, false));
        let json = serde_json::to_string(&outcome).unwrap();
        assert!(json.contains("\"status\":\"compared\""));
        assert!(json.contains("\"days_difference\":0"));
        assert!(json.contains("\"recommended_date\":null"));
        assert!(json.contains("\"has_recommendation\":false"));

        let back: ComparisonOutcome = serde_json::from_str(&json).unwrap();
        assert_eq!(back, outcome);
        assert!(!back.result().unwrap().has_recommendation());
    }
}
