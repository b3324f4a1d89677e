use super::advisory::{advise, rainfall_for};
use super::comparison::compare_all;
use super::rainfall_index::RainfallIndex;
use super::statistics::summarize;
use crate::db::Database;
use crate::error::Result;
use crate::models::{
    Advisory, AgriculturalLog, ComparisonOutcome, ComparisonResult, ComparisonSummary,
    CroppingPhase, DuplicatePolicy, LogKind, RainfallObservation,
};
use chrono::NaiveDate;
use serde::Serialize;

/// Outcomes of one comparison run together with their aggregate figures
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ComparisonReport {
    pub outcomes: Vec<ComparisonOutcome>,
    pub summary: ComparisonSummary,
}

impl ComparisonReport {
    pub fn compared(&self) -> impl Iterator<Item = &ComparisonResult> {
        self.outcomes.iter().filter_map(ComparisonOutcome::result)
    }
}

/// Loads stored logs and rainfall, runs the comparison engine and records
/// the analysis for each compared log.
pub struct ComparisonService {
    db: Database,
    policy: DuplicatePolicy,
}

impl ComparisonService {
    pub fn new(db: Database, policy: DuplicatePolicy) -> Self {
        Self { db, policy }
    }

    pub async fn run(&self, kind: Option<LogKind>) -> Result<ComparisonReport> {
        let (logs, observations) = self.load(kind).await?;
        let index = RainfallIndex::build(&observations, self.policy)?;

        let outcomes = compare_all(&logs, &index);
        let summary = summarize(&outcomes);

        let compared: Vec<&ComparisonResult> =
            outcomes.iter().filter_map(ComparisonOutcome::result).collect();
        // A failed write still leaves the caller with a usable report
        match self.db.save_analysis(&compared) {
            Ok(saved) => tracing::debug!(saved, "Stored comparison analysis"),
            Err(e) => tracing::warn!("Failed to store comparison analysis: {}", e),
        }

        tracing::info!(
            total = summary.total_count,
            unavailable = summary.unavailable_count,
            high_impact = summary.high_impact_count,
            "Comparison complete"
        );

        Ok(ComparisonReport { outcomes, summary })
    }

    /// Advisory for `date` using the stored rainfall unless a manual amount
    /// is given.
    pub async fn advise(
        &self,
        date: NaiveDate,
        phase_override: Option<CroppingPhase>,
        manual_mm: Option<f64>,
    ) -> Result<Advisory> {
        let index = self.rainfall_index().await?;
        let (rainfall_mm, source) = rainfall_for(date, manual_mm, &index);
        Ok(advise(date, phase_override, rainfall_mm, source))
    }

    pub async fn rainfall_index(&self) -> Result<RainfallIndex> {
        let db = self.db.clone();
        let observations =
            tokio::task::spawn_blocking(move || db.get_rainfall_observations()).await??;
        RainfallIndex::build(&observations, self.policy)
    }

    async fn load(
        &self,
        kind: Option<LogKind>,
    ) -> Result<(Vec<AgriculturalLog>, Vec<RainfallObservation>)> {
        let logs_db = self.db.clone();
        let rain_db = self.db.clone();

        let (logs, observations) = tokio::try_join!(
            tokio::task::spawn_blocking(move || logs_db.get_logs(kind)),
            tokio::task::spawn_blocking(move || rain_db.get_rainfall_observations()),
        )?;

        Ok((logs?, observations?))
    }
}
