use super::dates::parse_calendar_date;
use crate::error::Result;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Planting,
    #[default]
    Harvest,
}

impl LogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogKind::Planting => "Planting",
            LogKind::Harvest => "Harvest",
        }
    }

    /// Lowercase key used in storage
    pub fn key(&self) -> &'static str {
        match self {
            LogKind::Planting => "planting",
            LogKind::Harvest => "harvest",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "planting" | "plant" => Some(LogKind::Planting),
            "harvest" | "harvesting" => Some(LogKind::Harvest),
            _ => None,
        }
    }

    pub fn all() -> &'static [LogKind] {
        &[LogKind::Planting, LogKind::Harvest]
    }
}

impl std::fmt::Display for LogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn new_log_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// A logged planting or harvest event.
///
/// Dates are kept as the strings the user entered; they are parsed on demand
/// so that one malformed record can be reported without rejecting the rest.
/// Field aliases accept the per-kind column names (`actual_harvest_date`,
/// `recommended_planting_date`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgriculturalLog {
    #[serde(default = "new_log_id")]
    pub id: String,
    #[serde(default)]
    pub kind: LogKind,
    pub crop_type: String,
    #[serde(alias = "actual_harvest_date", alias = "actual_planting_date")]
    pub actual_date: String,
    #[serde(default, alias = "actual_harvest_time", alias = "actual_planting_time")]
    pub actual_time: Option<String>,
    #[serde(
        default,
        alias = "recommended_harvest_date",
        alias = "recommended_planting_date"
    )]
    pub recommended_date: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl AgriculturalLog {
    pub fn new(kind: LogKind, crop_type: &str, actual_date: &str) -> Self {
        Self {
            id: new_log_id(),
            kind,
            crop_type: crop_type.to_string(),
            actual_date: actual_date.to_string(),
            actual_time: None,
            recommended_date: None,
            notes: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn with_time(mut self, time: &str) -> Self {
        self.actual_time = Some(time.to_string());
        self
    }

    pub fn with_recommended(mut self, date: &str) -> Self {
        self.recommended_date = Some(date.to_string());
        self
    }

    pub fn with_notes(mut self, notes: &str) -> Self {
        self.notes = Some(notes.to_string());
        self
    }

    /// The recommended date, treating a blank string as absent.
    pub fn recommended(&self) -> Option<&str> {
        self.recommended_date
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn has_recommendation(&self) -> bool {
        self.recommended().is_some()
    }

    pub fn actual_naive(&self) -> Result<NaiveDate> {
        parse_calendar_date("actual_date", &self.actual_date)
    }

    pub fn recommended_naive(&self) -> Result<Option<NaiveDate>> {
        self.recommended()
            .map(|s| parse_calendar_date("recommended_date", s))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_kind_from_str() {
        assert_eq!(LogKind::from_str("Harvest"), Some(LogKind::Harvest));
        assert_eq!(LogKind::from_str(" planting "), Some(LogKind::Planting));
        assert_eq!(LogKind::from_str("plant"), Some(LogKind::Planting));
        assert_eq!(LogKind::from_str("weeding"), None);
        assert_eq!(LogKind::from_str(""), None);
    }

    #[test]
    fn log_kind_round_trip() {
        for kind in LogKind::all() {
            assert_eq!(LogKind::from_str(kind.key()), Some(*kind));
            assert_eq!(LogKind::from_str(kind.as_str()), Some(*kind));
        }
    }

    #[test]
    fn blank_recommendation_counts_as_absent() {
        let log = AgriculturalLog::new(LogKind::Harvest, "RC222", "2025-06-10").with_recommended("  ");
        assert!(!log.has_recommendation());
        assert_eq!(log.recommended_naive().unwrap(), None);
    }

    #[test]
    fn builder_pattern() {
        let log = AgriculturalLog::new(LogKind::Planting, "NSIC Rc 160", "2025-04-20")
            .with_id("log-1")
            .with_time("07:30")
            .with_recommended("2025-04-16")
            .with_notes("Transplanted after light rain");

        assert_eq!(log.id, "log-1");
        assert_eq!(log.kind, LogKind::Planting);
        assert_eq!(log.actual_time.as_deref(), Some("07:30"));
        assert_eq!(
            log.recommended_naive().unwrap(),
            NaiveDate::from_ymd_opt(2025, 4, 16)
        );
        assert_eq!(
            log.actual_naive().unwrap(),
            NaiveDate::from_ymd_opt(2025, 4, 20).unwrap()
        );
    }

    #[test]
    fn deserializes_harvest_column_names() {
        let json = r#"{
            "id": "abc",
            "crop_type": "RC222",
            "actual_harvest_date": "2025-06-10",
            "actual_harvest_time": "08:00",
            "recommended_harvest_date": "2025-06-01",
            "notes": null
        }"#;
        let log: AgriculturalLog = serde_json::from_str(json).unwrap();
        assert_eq!(log.id, "abc");
        assert_eq!(log.kind, LogKind::Harvest);
        assert_eq!(log.actual_date, "2025-06-10");
        assert_eq!(log.actual_time.as_deref(), Some("08:00"));
        assert_eq!(log.recommended(), Some("2025-06-01"));
        assert!(log.notes.is_none());
    }

    #[test]
    fn deserializes_planting_column_names_and_generates_id() {
        let json = r#"{
            "kind": "planting",
            "crop_type": "RC222",
            "actual_planting_date": "2025-04-20"
        }"#;
        let log: AgriculturalLog = serde_json::from_str(json).unwrap();
        assert_eq!(log.kind, LogKind::Planting);
        assert!(!log.id.is_empty());
        assert!(!log.has_recommendation());
    }
}
