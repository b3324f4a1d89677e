use super::rainfall_index::RainfallIndex;
use crate::error::Result;
use crate::models::{
    AgriculturalLog, ComparisonOutcome, ComparisonResult, RainfallRelevance, WeatherImpact,
};
use tracing::{debug, warn};

/// Compare one log against its recommendation and the rainfall recorded
/// between the two dates.
///
/// Without a recommended date the result carries the sentinel values
/// (0 days, 0 mm, Low, Minimal impact) and neither date is read. Fails only
/// when a date it needs cannot be parsed.
pub fn compare(log: &AgriculturalLog, index: &RainfallIndex) -> Result<ComparisonResult> {
    let Some(recommended) = log.recommended_naive()? else {
        return Ok(ComparisonResult {
            log: log.clone(),
            has_recommendation: false,
            days_difference: 0,
            rainfall_during_period: 0.0,
            rainfall_relevance: RainfallRelevance::Low,
            weather_impact: WeatherImpact::Minimal,
        });
    };
    let actual = log.actual_naive()?;

    // Positive = later than recommended
    let days_difference = (actual - recommended).num_days();
    let rainfall_during_period = index.sum_between(recommended, actual);

    Ok(ComparisonResult {
        log: log.clone(),
        has_recommendation: true,
        days_difference,
        rainfall_during_period,
        rainfall_relevance: RainfallRelevance::from_total(rainfall_during_period),
        weather_impact: WeatherImpact::classify(days_difference, rainfall_during_period),
    })
}

/// Compare every log independently. Records with unreadable dates come back
/// as [`ComparisonOutcome::Unavailable`] so the rest of the batch still shows.
pub fn compare_all(logs: &[AgriculturalLog], index: &RainfallIndex) -> Vec<ComparisonOutcome> {
    let outcomes: Vec<ComparisonOutcome> = logs
        .iter()
        .map(|log| match compare(log, index) {
            Ok(result) => ComparisonOutcome::Compared(result),
            Err(e) => {
                warn!(log_id = %log.id, crop = %log.crop_type, "Comparison unavailable: {}", e);
                ComparisonOutcome::Unavailable {
                    log: log.clone(),
                    reason: e.to_string(),
                }
            }
        })
        .collect();

    debug!(
        total = outcomes.len(),
        rainfall_days = index.len(),
        "Compared logs against rainfall"
    );

    outcomes
}
