use crate::db::Database;
use crate::error::Result;

const MIGRATIONS: &[&str] = &[
    // Migration 1: Initial schema
    r#"
    CREATE TABLE IF NOT EXISTS daily_rainfall (
        date TEXT PRIMARY KEY,
        rainfall_amount REAL,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS agricultural_logs (
        id TEXT PRIMARY KEY,
        kind TEXT NOT NULL,
        crop_type TEXT NOT NULL,
        actual_date TEXT NOT NULL,
        actual_time TEXT,
        recommended_date TEXT,
        notes TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS planting_recommendations (
        id TEXT PRIMARY KEY,
        planting_date TEXT,
        harvesting_date TEXT,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS schema_migrations (
        version INTEGER PRIMARY KEY,
        applied_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    // Migration 2: Persisted comparison results
    // Timing and rainfall are NULL for logs without a recommended date
    r#"
    CREATE TABLE IF NOT EXISTS log_analysis (
        log_id TEXT PRIMARY KEY REFERENCES agricultural_logs(id) ON DELETE CASCADE,
        timing_difference_days INTEGER,
        rainfall_during_period REAL,
        rainfall_relevance TEXT NOT NULL,
        weather_impact TEXT NOT NULL,
        analyzed_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    "#,
    // Migration 3: Add indexes
    r#"
    CREATE INDEX IF NOT EXISTS idx_agricultural_logs_kind
        ON agricultural_logs(kind);
    CREATE INDEX IF NOT EXISTS idx_agricultural_logs_created_at
        ON agricultural_logs(created_at);
    "#,
];

pub fn run(db: &Database) -> Result<()> {
    db.with_conn_mut(|conn| {
        // Ensure schema_migrations table exists
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS schema_migrations (
                version INTEGER PRIMARY KEY,
                applied_at TEXT NOT NULL DEFAULT (datetime('now'))
            );
            "#,
        )?;

        let current_version: i32 = conn.query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )?;

        // Apply pending migrations, each in its own transaction
        for (i, migration) in MIGRATIONS.iter().enumerate() {
            let version = (i + 1) as i32;
            if version > current_version {
                tracing::info!("Applying migration {}", version);
                let tx = conn.transaction()?;
                tx.execute_batch(migration)?;
                tx.execute(
                    "INSERT INTO schema_migrations (version) VALUES (?1)",
                    [version],
                )?;
                tx.commit()?;
            }
        }

        Ok(())
    })
}
