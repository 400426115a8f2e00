use crate::model::ScoreRow;
use anyhow::Context;
use rusqlite::{params, Connection};
use serde::Serialize;
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Handle on the backing sheet. Cheap to clone; all components share one
/// connection behind a mutex.
#[derive(Clone)]
pub struct Store {
    pub conn: Arc<Mutex<Connection>>,
}

/// One row as appended by the recorder: ranks unset, raw score already
/// rendered to its cell text.
#[derive(Debug, Clone)]
pub struct NewScoreRow {
    pub timestamp: String,
    pub device_id: Option<String>,
    pub name: String,
    pub category: String,
    pub shift: String,
    pub email: String,
    pub attempted: u32,
    pub correct: u32,
    pub wrong: u32,
    pub raw_score: String,
}

#[derive(Debug, Serialize)]
pub struct StoreStats {
    pub rows: Option<u64>,
    pub ranked_rows: Option<u64>,
    pub unscored_rows: Option<u64>,
    pub last_row_id: Option<i64>,
    pub last_submitted_at: Option<String>,
    pub version: Option<String>,
}

impl Store {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let conn = Connection::open(path).context("failed to open sqlite db")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory sqlite db")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Idempotent; the "header row" that must exist before the first append.
    pub fn init_schema(&self) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(crate::storage::schema::DDL)?;
        Ok(())
    }

    /// Append exactly one row; rank columns start NULL. Returns the rowid the
    /// engine later uses for write-back.
    pub fn append(&self, row: &NewScoreRow) -> anyhow::Result<i64> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO scores(timestamp, device_id, name, category, shift, email,
                attempted_questions, correct_questions, wrong_questions, raw_score)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                row.timestamp,
                row.device_id,
                row.name,
                row.category,
                row.shift,
                row.email,
                row.attempted,
                row.correct,
                row.wrong,
                row.raw_score,
            ],
        )
        .context("append score row")?;
        Ok(conn.last_insert_rowid())
    }

    /// Full-table load in append order; the engine's single bounded pass.
    pub fn fetch_all(&self) -> anyhow::Result<Vec<ScoreRow>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT id, timestamp, device_id, name, category, shift, email,
                attempted_questions, correct_questions, wrong_questions,
                raw_score, overall_rank, shift_rank, category_rank
             FROM scores
             ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(ScoreRow {
                row_id: row.get(0)?,
                timestamp: row.get(1)?,
                device_id: row.get(2)?,
                name: row.get(3)?,
                category: row.get(4)?,
                shift: row.get(5)?,
                email: row.get(6)?,
                attempted: row.get(7)?,
                correct: row.get(8)?,
                wrong: row.get(9)?,
                raw_score: row.get(10)?,
                overall_rank: row.get(11)?,
                shift_rank: row.get(12)?,
                category_rank: row.get(13)?,
            })
        })?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    /// Overwrite the rank triplet of one row, located by rowid rather than a
    /// re-derived index, so a concurrent append cannot redirect the write.
    /// One UPDATE statement: the triplet lands atomically or not at all.
    pub fn update_ranks(
        &self,
        row_id: i64,
        overall: u32,
        shift: u32,
        category: u32,
    ) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        let n = conn
            .execute(
                "UPDATE scores SET overall_rank=?1, shift_rank=?2, category_rank=?3 WHERE id=?4",
                params![overall, shift, category, row_id],
            )
            .context("update rank triplet")?;
        if n != 1 {
            anyhow::bail!("rank update touched {} rows for id {}", n, row_id);
        }
        Ok(())
    }

    /// Most recent append timestamp for an email (trimmed match), if any.
    /// Matching happens in Rust so it agrees exactly with the engine's rules.
    pub fn latest_submitted_at(&self, email: &str) -> anyhow::Result<Option<String>> {
        let want = email.trim();
        let rows = self.fetch_all()?;
        Ok(rows
            .iter()
            .rev()
            .find(|r| r.email.trim() == want)
            .map(|r| r.timestamp.clone()))
    }

    pub fn count_rows(&self) -> anyhow::Result<i64> {
        let conn = self.conn.lock().unwrap();
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM scores", [], |r| r.get(0))?;
        Ok(n)
    }

    pub fn stats_best_effort(&self) -> anyhow::Result<StoreStats> {
        let (rows, ranked_rows, last, version) = {
            let conn = self.conn.lock().unwrap();

            let rows: Option<u64> = conn
                .query_row("SELECT COUNT(*) FROM scores", [], |r| {
                    r.get::<_, i64>(0).map(|x| x as u64)
                })
                .ok();
            let ranked_rows: Option<u64> = conn
                .query_row(
                    "SELECT COUNT(*) FROM scores WHERE overall_rank IS NOT NULL",
                    [],
                    |r| r.get::<_, i64>(0).map(|x| x as u64),
                )
                .ok();

            let last: Option<(i64, String)> = conn
                .query_row(
                    "SELECT id, timestamp FROM scores ORDER BY id DESC LIMIT 1",
                    [],
                    |r| Ok((r.get(0)?, r.get(1)?)),
                )
                .ok();

            let version: Option<String> = conn
                .query_row("PRAGMA user_version", [], |r| r.get(0))
                .ok()
                .map(|v: i64| v.to_string());

            (rows, ranked_rows, last, version)
        };

        // Numeric-or-not is the engine's call, so count it with the same code.
        let unscored_rows = self
            .fetch_all()
            .ok()
            .map(|rows| rows.iter().filter(|r| r.numeric_score().is_none()).count() as u64);

        let (last_row_id, last_submitted_at) = match last {
            Some((id, ts)) => (Some(id), Some(ts)),
            None => (None, None),
        };

        Ok(StoreStats {
            rows,
            ranked_rows,
            unscored_rows,
            last_row_id,
            last_submitted_at,
            version,
        })
    }
}
