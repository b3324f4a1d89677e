use super::rainfall_index::RainfallIndex;
use crate::models::{
    format_date, AdviceLevel, Advisory, CroppingPhase, RainfallCategory, Season,
};
use chrono::NaiveDate;

/// Days looked back for the latest rainfall reading
pub const RAINFALL_LOOKBACK_DAYS: i64 = 7;

/// Where the rainfall figure behind an advisory came from
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RainfallSource {
    Manual,
    Observed(NaiveDate),
    NoData,
}

/// Rainfall to advise on: an explicit value wins, then the latest reading in
/// the lookback window ending on `date`, then 0.
pub fn rainfall_for(
    date: NaiveDate,
    manual_mm: Option<f64>,
    index: &RainfallIndex,
) -> (f64, RainfallSource) {
    if let Some(mm) = manual_mm.filter(|mm| mm.is_finite() && *mm >= 0.0) {
        return (mm, RainfallSource::Manual);
    }
    match index.latest_within(date, RAINFALL_LOOKBACK_DAYS) {
        Some((observed_on, mm)) => (mm, RainfallSource::Observed(observed_on)),
        None => (0.0, RainfallSource::NoData),
    }
}

/// Advice for `date`. The phase comes from the cropping calendar unless one
/// is given explicitly.
pub fn advise(
    date: NaiveDate,
    phase_override: Option<CroppingPhase>,
    rainfall_mm: f64,
    source: RainfallSource,
) -> Advisory {
    let (season, calendar_phase) = CroppingPhase::for_date(date);
    let phase = phase_override.unwrap_or(calendar_phase);
    let category = RainfallCategory::from_amount(rainfall_mm);
    let (level, text) = phase_guidance(phase, category);

    let source_label = match source {
        RainfallSource::Manual => "Manual entry".to_string(),
        RainfallSource::Observed(d) => format!("Observed {}", format_date(d)),
        RainfallSource::NoData => "No recent data".to_string(),
    };

    Advisory::new(date, season, phase, rainfall_mm, level, text)
        .with_data_point("Season", season, "Cropping calendar")
        .with_data_point("Phase", phase, "Cropping calendar")
        .with_data_point("Rainfall", format!("{:.1} mm ({})", rainfall_mm, category), &source_label)
}

/// Guidance table for each phase and rainfall category
pub fn phase_guidance(phase: CroppingPhase, category: RainfallCategory) -> (AdviceLevel, &'static str) {
    use AdviceLevel::{Info, Success, Warning};
    use RainfallCategory::{Dry, Heavy, Normal};

    match (phase, category) {
        (CroppingPhase::LandPreparation, Heavy) => (
            Warning,
            "Delay land preparation due to heavy rainfall expected. Wait for drier conditions.",
        ),
        (CroppingPhase::LandPreparation, Normal) => (
            Success,
            "Good conditions for land preparation. Moderate rainfall will help soften soil.",
        ),
        (CroppingPhase::LandPreparation, Dry) => (
            Success,
            "Good time for land preparation. Dry conditions allow proper soil cultivation.",
        ),
        (CroppingPhase::Planting, Heavy) => (
            Warning,
            "Delay planting/transplanting until rainfall subsides. Heavy rain can damage seedlings.",
        ),
        (CroppingPhase::Planting, Normal) => (
            Success,
            "Excellent time to plant. Normal rainfall supports growth and establishment.",
        ),
        (CroppingPhase::Planting, Dry) => (
            Info,
            "Ensure adequate irrigation before planting. Low rainfall requires water management.",
        ),
        (CroppingPhase::Growth, Heavy) => (
            Warning,
            "Monitor drainage systems. Heavy rainfall may cause waterlogging.",
        ),
        (CroppingPhase::Growth, Normal) => (
            Success,
            "Optimal growing conditions. Normal rainfall promotes healthy crop development.",
        ),
        (CroppingPhase::Growth, Dry) => (
            Info,
            "Irrigation required. Insufficient rainfall for proper crop growth.",
        ),
        (CroppingPhase::Flowering, Heavy) => (
            Warning,
            "Heavy rain may affect pollination. Monitor crop health closely.",
        ),
        (CroppingPhase::Flowering, Normal) => (
            Success,
            "Good conditions for flowering stage. Adequate moisture supports grain formation.",
        ),
        (CroppingPhase::Flowering, Dry) => (
            Info,
            "Ensure consistent irrigation during flowering for optimal grain development.",
        ),
        (CroppingPhase::Harvest, Heavy) => (
            Warning,
            "Harvest early to avoid losses. Heavy rain can damage mature crops.",
        ),
        (CroppingPhase::Harvest, Normal) => (
            Info,
            "Plan harvest carefully. Monitor weather for dry windows.",
        ),
        (CroppingPhase::Harvest, Dry) => (
            Success,
            "Excellent harvest conditions. Dry weather ideal for harvesting and drying.",
        ),
        (CroppingPhase::PostHarvest, Heavy) => (
            Warning,
            "Ensure proper storage facilities. Heavy rain may affect drying process.",
        ),
        (CroppingPhase::PostHarvest, _) => (
            Success,
            "Good conditions for post-harvest activities. Continue drying and storage.",
        ),
    }
}
