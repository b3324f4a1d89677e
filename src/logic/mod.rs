pub mod advisory;
pub mod calendar;
pub mod comparison;
pub mod comparison_service;
pub mod import;
pub mod rainfall_index;
pub mod statistics;

pub use advisory::{advise, rainfall_for, RainfallSource};
pub use calendar::RecommendationCalendar;
pub use comparison::{compare, compare_all};
pub use comparison_service::{ComparisonReport, ComparisonService};
pub use import::{duplicate_policy, import_logs_json, import_rainfall_json, ImportSummary};
pub use rainfall_index::RainfallIndex;
pub use statistics::summarize;
