use crate::db::Database;
use crate::error::{Result, SmartRiceError};
use crate::models::{
    format_date, AgriculturalLog, ComparisonResult, LogKind, PlantingRecommendation,
    RainfallObservation,
};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rusqlite::{params, Row};
use tracing::warn;

// Rainfall Queries

impl Database {
    /// Insert or replace the reading for a date
    pub fn upsert_rainfall(&self, date: NaiveDate, amount_mm: Option<f64>) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO daily_rainfall (date, rainfall_amount, created_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(date) DO UPDATE SET
                    rainfall_amount = excluded.rainfall_amount,
                    created_at = excluded.created_at
                "#,
                params![format_date(date), amount_mm, Utc::now().to_rfc3339()],
            )?;
            Ok(())
        })
    }

    /// Upsert many readings in one transaction; `None` is stored as NULL
    pub fn upsert_rainfall_batch(&self, readings: &[(NaiveDate, Option<f64>)]) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    r#"
                    INSERT INTO daily_rainfall (date, rainfall_amount, created_at)
                    VALUES (?1, ?2, ?3)
                    ON CONFLICT(date) DO UPDATE SET
                        rainfall_amount = excluded.rainfall_amount,
                        created_at = excluded.created_at
                    "#,
                )?;
                let now = Utc::now().to_rfc3339();
                for (date, mm) in readings {
                    stmt.execute(params![format_date(*date), mm, now])?;
                }
            }
            tx.commit()?;
            Ok(readings.len())
        })
    }

    /// All readings, most recent first
    pub fn get_rainfall_observations(&self) -> Result<Vec<RainfallObservation>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT date, rainfall_amount FROM daily_rainfall ORDER BY date DESC")?;
            let rows = stmt
                .query_map([], row_to_rainfall)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }

    pub fn get_rainfall_for_year(&self, year: i32) -> Result<Vec<RainfallObservation>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT date, rainfall_amount FROM daily_rainfall WHERE substr(date, 1, 4) = ?1 ORDER BY date",
            )?;
            let rows = stmt
                .query_map([format!("{:04}", year)], row_to_rainfall)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }

    pub fn delete_rainfall(&self, date: NaiveDate) -> Result<()> {
        self.with_conn(|conn| {
            let deleted =
                conn.execute("DELETE FROM daily_rainfall WHERE date = ?1", [format_date(date)])?;
            if deleted == 0 {
                return Err(SmartRiceError::NotFound(format!(
                    "rainfall reading for {}",
                    format_date(date)
                )));
            }
            Ok(())
        })
    }
}

fn row_to_rainfall(row: &Row) -> rusqlite::Result<RainfallObservation> {
    Ok(RainfallObservation {
        date: row.get("date")?,
        amount_mm: row.get("rainfall_amount")?,
    })
}

// Log Queries

impl Database {
    pub fn insert_log(&self, log: &AgriculturalLog) -> Result<()> {
        self.insert_logs(std::slice::from_ref(log))?;
        Ok(())
    }

    /// Insert every log or none of them
    pub fn insert_logs(&self, logs: &[AgriculturalLog]) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    r#"
                    INSERT INTO agricultural_logs
                        (id, kind, crop_type, actual_date, actual_time, recommended_date, notes, created_at)
                    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                    "#,
                )?;
                for log in logs {
                    stmt.execute(params![
                        log.id,
                        log.kind.key(),
                        log.crop_type,
                        log.actual_date,
                        log.actual_time,
                        log.recommended_date,
                        log.notes,
                        log.created_at.to_rfc3339(),
                    ])?;
                }
            }
            tx.commit()?;
            Ok(logs.len())
        })
    }

    /// Logs of one kind (or all), newest first
    pub fn get_logs(&self, kind: Option<LogKind>) -> Result<Vec<AgriculturalLog>> {
        self.with_conn(|conn| {
            let logs = match kind {
                Some(kind) => {
                    let mut stmt = conn.prepare(
                        "SELECT * FROM agricultural_logs WHERE kind = ?1 ORDER BY created_at DESC",
                    )?;
                    let rows = stmt
                        .query_map([kind.key()], row_to_log)?
                        .collect::<rusqlite::Result<Vec<_>>>()?;
                    rows
                }
                None => {
                    let mut stmt =
                        conn.prepare("SELECT * FROM agricultural_logs ORDER BY created_at DESC")?;
                    let rows = stmt
                        .query_map([], row_to_log)?
                        .collect::<rusqlite::Result<Vec<_>>>()?;
                    rows
                }
            };
            Ok(logs)
        })
    }

    pub fn delete_log(&self, id: &str) -> Result<()> {
        self.with_conn(|conn| {
            let deleted = conn.execute("DELETE FROM agricultural_logs WHERE id = ?1", [id])?;
            if deleted == 0 {
                return Err(SmartRiceError::NotFound(format!("log {}", id)));
            }
            Ok(())
        })
    }
}

fn row_to_log(row: &Row) -> rusqlite::Result<AgriculturalLog> {
    let kind_str: String = row.get("kind")?;
    let created_at_str: String = row.get("created_at")?;

    let kind = LogKind::from_str(&kind_str).unwrap_or_else(|| {
        warn!(kind = %kind_str, "Unknown log kind in database, defaulting to Harvest");
        LogKind::Harvest
    });

    Ok(AgriculturalLog {
        id: row.get("id")?,
        kind,
        crop_type: row.get("crop_type")?,
        actual_date: row.get("actual_date")?,
        actual_time: row.get("actual_time")?,
        recommended_date: row.get("recommended_date")?,
        notes: row.get("notes")?,
        created_at: parse_timestamp(&created_at_str),
    })
}

// Recommendation Queries

impl Database {
    pub fn insert_recommendation(&self, rec: &PlantingRecommendation) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                r#"
                INSERT INTO planting_recommendations (id, planting_date, harvesting_date, created_at)
                VALUES (?1, ?2, ?3, ?4)
                "#,
                params![
                    rec.id,
                    rec.planting_date,
                    rec.harvesting_date,
                    rec.created_at.to_rfc3339(),
                ],
            )?;
            Ok(())
        })
    }

    pub fn get_recommendations(&self) -> Result<Vec<PlantingRecommendation>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT * FROM planting_recommendations ORDER BY created_at DESC")?;
            let rows = stmt
                .query_map([], |row| {
                    let created_at_str: String = row.get("created_at")?;
                    Ok(PlantingRecommendation {
                        id: row.get("id")?,
                        planting_date: row.get("planting_date")?,
                        harvesting_date: row.get("harvesting_date")?,
                        created_at: parse_timestamp(&created_at_str),
                    })
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(rows)
        })
    }

    pub fn delete_recommendation(&self, id: &str) -> Result<()> {
        self.with_conn(|conn| {
            let deleted =
                conn.execute("DELETE FROM planting_recommendations WHERE id = ?1", [id])?;
            if deleted == 0 {
                return Err(SmartRiceError::NotFound(format!("recommendation {}", id)));
            }
            Ok(())
        })
    }
}

// Analysis Queries

/// A comparison result as persisted in `log_analysis`.
/// Timing and rainfall are `None` when the log had no recommended date.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRecord {
    pub log_id: String,
    pub timing_difference_days: Option<i64>,
    pub rainfall_during_period: Option<f64>,
    pub rainfall_relevance: String,
    pub weather_impact: String,
    pub analyzed_at: DateTime<Utc>,
}

impl Database {
    /// Replace stored analysis for each compared log
    pub fn save_analysis(&self, results: &[&ComparisonResult]) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            let mut saved = 0;
            {
                // Logs deleted since loading are skipped
                let mut stmt = tx.prepare(
                    r#"
                    INSERT OR REPLACE INTO log_analysis
                        (log_id, timing_difference_days, rainfall_during_period,
                         rainfall_relevance, weather_impact, analyzed_at)
                    SELECT ?1, ?2, ?3, ?4, ?5, ?6
                    WHERE EXISTS (SELECT 1 FROM agricultural_logs WHERE id = ?1)
                    "#,
                )?;
                let now = Utc::now().to_rfc3339();
                for result in results {
                    saved += stmt.execute(params![
                        result.log.id,
                        result.has_recommendation.then_some(result.days_difference),
                        result
                            .has_recommendation
                            .then_some(result.rainfall_during_period),
                        result.rainfall_relevance.as_str(),
                        result.weather_impact.as_str(),
                        now,
                    ])?;
                }
            }
            tx.commit()?;
            Ok(saved)
        })
    }

    pub fn get_analysis(&self, log_id: &str) -> Result<Option<AnalysisRecord>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT * FROM log_analysis WHERE log_id = ?1",
                [log_id],
                |row| {
                    let analyzed_at_str: String = row.get("analyzed_at")?;
                    Ok(AnalysisRecord {
                        log_id: row.get("log_id")?,
                        timing_difference_days: row.get("timing_difference_days")?,
                        rainfall_during_period: row.get("rainfall_during_period")?,
                        rainfall_relevance: row.get("rainfall_relevance")?,
                        weather_impact: row.get("weather_impact")?,
                        analyzed_at: parse_timestamp(&analyzed_at_str),
                    })
                },
            )
            .optional()
            .map_err(Into::into)
        })
    }
}

/// RFC 3339 as written by this crate, or SQLite's `datetime('now')` format
fn parse_timestamp(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").map(|dt| dt.and_utc())
        })
        .unwrap_or_else(|_| {
            warn!(timestamp = %value, "Unreadable timestamp in database, using now");
            Utc::now()
        })
}

trait OptionalExt<T> {
    fn optional(self) -> rusqlite::Result<Option<T>>;
}

impl<T> OptionalExt<T> for rusqlite::Result<T> {
    fn optional(self) -> rusqlite::Result<Option<T>> {
        match self {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
