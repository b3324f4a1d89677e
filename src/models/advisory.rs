use super::rainfall::RainfallCategory;
use super::season::{CroppingPhase, Season};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AdviceLevel {
    Success,
    Info,
    Warning,
}

impl AdviceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdviceLevel::Success => "Go",
            AdviceLevel::Info => "Info",
            AdviceLevel::Warning => "Warning",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            AdviceLevel::Success => "✓",
            AdviceLevel::Info => "ℹ",
            AdviceLevel::Warning => "⚠",
        }
    }
}

impl std::fmt::Display for AdviceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    pub label: String,
    pub value: String,
    pub source: String,
}

impl DataPoint {
    pub fn new(label: &str, value: impl std::fmt::Display, source: &str) -> Self {
        Self {
            label: label.to_string(),
            value: value.to_string(),
            source: source.to_string(),
        }
    }
}

/// Field-work advice for one day, given the cropping phase and rainfall
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advisory {
    pub date: NaiveDate,
    pub season: Season,
    pub phase: CroppingPhase,
    pub rainfall_mm: f64,
    pub category: RainfallCategory,
    pub level: AdviceLevel,
    pub text: String,
    pub data_points: Vec<DataPoint>,
}

impl Advisory {
    pub fn new(
        date: NaiveDate,
        season: Season,
        phase: CroppingPhase,
        rainfall_mm: f64,
        level: AdviceLevel,
        text: impl Into<String>,
    ) -> Self {
        Self {
            date,
            season,
            phase,
            rainfall_mm,
            category: RainfallCategory::from_amount(rainfall_mm),
            level,
            text: text.into(),
            data_points: Vec::new(),
        }
    }

    pub fn with_data_point(
        mut self,
        label: &str,
        value: impl std::fmt::Display,
        source: &str,
    ) -> Self {
        self.data_points.push(DataPoint::new(label, value, source));
        self
    }
}
