use serde::{Deserialize, Serialize};

/// One daily rainfall reading as entered by an administrator.
///
/// A missing amount is stored as NULL and contributes nothing to sums, the
/// same as an absent day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RainfallObservation {
    pub date: String,
    #[serde(default, alias = "rainfall_amount")]
    pub amount_mm: Option<f64>,
}

impl RainfallObservation {
    pub fn new(date: &str, amount_mm: f64) -> Self {
        Self {
            date: date.to_string(),
            amount_mm: Some(amount_mm),
        }
    }
}

/// How repeated dates in a raw observation list are resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DuplicatePolicy {
    /// Later entries replace earlier ones (matches storage upsert)
    #[default]
    LastWins,
    Sum,
    Reject,
}

impl DuplicatePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DuplicatePolicy::LastWins => "last-wins",
            DuplicatePolicy::Sum => "sum",
            DuplicatePolicy::Reject => "reject",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace(['_', ' '], "-").as_str() {
            "last-wins" | "last" | "lastwins" => Some(DuplicatePolicy::LastWins),
            "sum" => Some(DuplicatePolicy::Sum),
            "reject" => Some(DuplicatePolicy::Reject),
            _ => None,
        }
    }
}

impl std::fmt::Display for DuplicatePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Coarse category of a single day's rainfall
/// One row of a yearly rainfall report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    pub month: u32,
    pub name: &'static str,
    pub days: u32,
    pub total_mm: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RainfallCategory {
    Dry,
    Normal,
    Heavy,
}

impl RainfallCategory {
    pub fn from_amount(mm: f64) -> Self {
        if mm > 50.0 {
            RainfallCategory::Heavy
        } else if mm >= 10.0 {
            RainfallCategory::Normal
        } else {
            RainfallCategory::Dry
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RainfallCategory::Dry => "Dry",
            RainfallCategory::Normal => "Normal",
            RainfallCategory::Heavy => "Heavy",
        }
    }
}

impl std::fmt::Display for RainfallCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
