//! SQLite report sink
//!
//! Records every run and its findings in one database file so results of
//! many runs (and many seeds) can be queried together.

use crate::output::traits::{OutputResult, ReportSink, RunStatus, TaskReport};
use crate::tasks::Task;
use chrono::Utc;
use rusqlite::{params, Connection};
use std::path::Path;

/// SQL schema for the report database
pub const REPORT_SCHEMA_SQL: &str = r#"
-- One row per invocation
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    seed TEXT NOT NULL,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    status TEXT NOT NULL
);

-- Flattened task results
CREATE TABLE IF NOT EXISTS findings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER NOT NULL REFERENCES runs(id),
    task INTEGER NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    recorded_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_findings_run ON findings(run_id);
CREATE INDEX IF NOT EXISTS idx_findings_task ON findings(task);
"#;

/// Writes findings into a SQLite database
pub struct SqliteSink {
    conn: Connection,
    run_id: i64,
}

impl SqliteSink {
    /// Opens (or creates) the database and starts a new run
    pub fn open(path: &Path, seed: &str, config_hash: &str) -> OutputResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;
        Self::start(conn, seed, config_hash)
    }

    /// In-memory database (for testing)
    #[cfg(test)]
    pub fn open_in_memory(seed: &str, config_hash: &str) -> OutputResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Self::start(conn, seed, config_hash)
    }

    fn start(conn: Connection, seed: &str, config_hash: &str) -> OutputResult<Self> {
        conn.execute_batch(REPORT_SCHEMA_SQL)?;
        conn.execute(
            "INSERT INTO runs (seed, started_at, config_hash, status) VALUES (?1, ?2, ?3, ?4)",
            params![
                seed,
                Utc::now().to_rfc3339(),
                config_hash,
                RunStatus::Running.to_db_string()
            ],
        )?;
        let run_id = conn.last_insert_rowid();

        tracing::debug!("Recording run {} for {}", run_id, seed);
        Ok(Self { conn, run_id })
    }

    pub fn run_id(&self) -> i64 {
        self.run_id
    }

    /// `(key, value)` rows this run recorded for `task`, in insertion order
    pub fn findings(&self, task: Task) -> OutputResult<Vec<(String, String)>> {
        let mut stmt = self.conn.prepare(
            "SELECT key, value FROM findings WHERE run_id = ?1 AND task = ?2 ORDER BY id",
        )?;
        let rows: Vec<(String, String)> = stmt
            .query_map(params![self.run_id, task.selector()], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn run_status(&self) -> OutputResult<String> {
        let status: String = self.conn.query_row(
            "SELECT status FROM runs WHERE id = ?1",
            params![self.run_id],
            |row| row.get(0),
        )?;
        Ok(status)
    }
}

impl ReportSink for SqliteSink {
    fn write(&mut self, report: &TaskReport) -> OutputResult<()> {
        let task = report.task().selector();
        let recorded_at = report.generated_at.to_rfc3339();
        let entries = report.findings.entries();

        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO findings (run_id, task, key, value, recorded_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for (key, value) in &entries {
                stmt.execute(params![self.run_id, task, key, value, recorded_at])?;
            }
        }
        tx.commit()?;

        tracing::debug!("Stored {} findings for task {}", entries.len(), task);
        Ok(())
    }

    fn finish(&mut self, status: RunStatus) -> OutputResult<()> {
        self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2 WHERE id = ?3",
            params![status.to_db_string(), Utc::now().to_rfc3339(), self.run_id],
        )?;
        Ok(())
    }
}
