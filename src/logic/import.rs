use super::rainfall_index::resolve_observations;
use crate::db::Database;
use crate::error::{Result, SmartRiceError};
use crate::models::{AgriculturalLog, DuplicatePolicy, RainfallObservation};

/// Counts from one import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    /// Entries in the input
    pub read: usize,
    /// Rows written
    pub saved: usize,
}

/// Duplicate policy for an import: a named override, else the configured one
pub fn duplicate_policy(
    override_name: Option<&str>,
    configured: DuplicatePolicy,
) -> Result<DuplicatePolicy> {
    match override_name {
        Some(name) => DuplicatePolicy::from_str(name).ok_or_else(|| {
            SmartRiceError::InvalidData(format!("unknown duplicate policy: {}", name))
        }),
        None => Ok(configured),
    }
}

/// Store a JSON array of `{ "date", "rainfall_amount" }` readings.
///
/// Repeated dates are resolved by `policy` before anything is written, so a
/// rejected import stores nothing. Missing amounts are stored as NULL.
pub fn import_rainfall_json(
    db: &Database,
    json: &str,
    policy: DuplicatePolicy,
) -> Result<ImportSummary> {
    let observations: Vec<RainfallObservation> = serde_json::from_str(json)?;
    let readings: Vec<_> = resolve_observations(&observations, policy)?
        .into_iter()
        .collect();
    let saved = db.upsert_rainfall_batch(&readings)?;

    tracing::info!(read = observations.len(), saved, %policy, "Imported rainfall");
    Ok(ImportSummary {
        read: observations.len(),
        saved,
    })
}

/// Store a JSON array of logs in one transaction
pub fn import_logs_json(db: &Database, json: &str) -> Result<ImportSummary> {
    let logs: Vec<AgriculturalLog> = serde_json::from_str(json)?;
    let saved = db.insert_logs(&logs)?;

    tracing::info!(saved, "Imported logs");
    Ok(ImportSummary {
        read: logs.len(),
        saved,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LogKind;

    #[test]
    fn policy_override_wins_over_config() {
        assert_eq!(
            duplicate_policy(Some("sum"), DuplicatePolicy::LastWins).unwrap(),
            DuplicatePolicy::Sum
        );
        assert_eq!(
            duplicate_policy(None, DuplicatePolicy::Reject).unwrap(),
            DuplicatePolicy::Reject
        );
        assert!(matches!(
            duplicate_policy(Some("average"), DuplicatePolicy::LastWins),
            Err(SmartRiceError::InvalidData(_))
        ));
    }

    #[test]
    fn rainfall_import_keeps_missing_amounts() {
        let db = Database::open_in_memory().unwrap();
        let json = r#"[
            {"date": "2025-06-03", "rainfall_amount": 12.5},
            {"date": "2025-06-04", "rainfall_amount": null},
            {"date": "not a date", "rainfall_amount": 3.0}
        ]"#;
        let summary = import_rainfall_json(&db, json, DuplicatePolicy::LastWins).unwrap();
        assert_eq!(summary, ImportSummary { read: 3, saved: 2 });

        let stored = db.get_rainfall_observations().unwrap();
        assert_eq!(stored[0].date, "2025-06-04");
        assert!(stored[0].amount_mm.is_none());
        assert_eq!(stored[1], RainfallObservation::new("2025-06-03", 12.5));
    }

    #[test]
    fn rainfall_import_applies_policy() {
        let json = r#"[
            {"date": "2025-06-03", "rainfall_amount": 10.0},
            {"date": "2025-06-03", "rainfall_amount": 5.0}
        ]"#;

        let db = Database::open_in_memory().unwrap();
        import_rainfall_json(&db, json, DuplicatePolicy::Sum).unwrap();
        assert_eq!(db.get_rainfall_observations().unwrap()[0].amount_mm, Some(15.0));

        let db = Database::open_in_memory().unwrap();
        import_rainfall_json(&db, json, DuplicatePolicy::LastWins).unwrap();
        assert_eq!(db.get_rainfall_observations().unwrap()[0].amount_mm, Some(5.0));

        let db = Database::open_in_memory().unwrap();
        let err = import_rainfall_json(&db, json, DuplicatePolicy::Reject).unwrap_err();
        assert!(matches!(err, SmartRiceError::DuplicateObservation(_)));
        assert!(db.get_rainfall_observations().unwrap().is_empty());
    }

    #[test]
    fn log_import_with_repeated_id_stores_nothing() {
        let db = Database::open_in_memory().unwrap();
        let json = r#"[
            {"id": "a", "crop_type": "RC222", "actual_harvest_date": "2025-06-10"},
            {"id": "a", "crop_type": "RC160", "actual_harvest_date": "2025-06-12"}
        ]"#;
        assert!(import_logs_json(&db, json).is_err());
        assert!(db.get_logs(None).unwrap().is_empty());
    }

    #[test]
    fn log_import_stores_all_records() {
        let db = Database::open_in_memory().unwrap();
        let json = r#"[
            {"crop_type": "RC222", "actual_harvest_date": "2025-06-10",
             "recommended_harvest_date": "2025-06-01"},
            {"kind": "planting", "crop_type": "RC222", "actual_planting_date": "2025-04-20"}
        ]"#;
        let summary = import_logs_json(&db, json).unwrap();
        assert_eq!(summary, ImportSummary { read: 2, saved: 2 });
        assert_eq!(db.get_logs(Some(LogKind::Planting)).unwrap().len(), 1);
    }

    #[test]
    fn malformed_json_is_an_error() {
        let db = Database::open_in_memory().unwrap();
        assert!(matches!(
            import_logs_json(&db, "{not json"),
            Err(SmartRiceError::Json(_))
        ));
    }
}
