//! Verdict Storage Layer
//!
//! Implements the SurveyStore trait on SQLite.
//!
//! # Architecture
//!
//! - `examples` + `example_sentences` hold the claims and their evidence
//! - `assignments` holds raw, unparsed assignment rows in insertion order
//! - `results` is append-only; batches are written in a single transaction
//! - CSV import/export (see [`csv_io`]) moves data to and from spreadsheet exports
//!
//! # Examples
//!
//! ```no_run
//! use verdict_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! // Store is now ready for survey operations
//! ```

#![warn(missing_docs)]

pub mod csv_io;

use rusqlite::{params, Connection};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::debug;
use verdict_domain::{AnswerRecord, AssignmentRow, Decision, DomainError, Example, ExampleId, SurveyStore};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// CSV read/write error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored or imported data violates a domain rule
    #[error("Invalid data: {0}")]
    Domain(#[from] DomainError),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// SQLite-based implementation of SurveyStore
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own SqliteStore instance.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use verdict_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("verdict.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        let schema = include_str!("schema.sql");
        self.conn.execute_batch(schema)?;
        Ok(())
    }

    /// Insert an example, replacing any existing example with the same id
    pub fn insert_example(&mut self, example: &Example) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        write_example(&tx, example)?;
        tx.commit()?;
        Ok(())
    }

    /// Append an assignment row
    pub fn insert_assignment(&mut self, row: &AssignmentRow) -> Result<(), StoreError> {
        write_assignment(&self.conn, row)?;
        Ok(())
    }

    /// Convert a stored decision back to the enum
    fn str_to_decision(s: &str) -> Result<Decision, StoreError> {
        s.parse().map_err(StoreError::from)
    }
}

/// Write one example and its evidence; callers own the transaction
fn write_example(conn: &Connection, example: &Example) -> Result<(), StoreError> {
    conn.execute(
        "DELETE FROM example_sentences WHERE example_id = ?1",
        params![example.id.value()],
    )?;
    conn.execute(
        "INSERT OR REPLACE INTO examples (example_id, claim) VALUES (?1, ?2)",
        params![example.id.value(), &example.claim],
    )?;

    let mut stmt = conn.prepare_cached(
        "INSERT INTO example_sentences (example_id, slot, sentence) VALUES (?1, ?2, ?3)",
    )?;
    for (slot, sentence) in example.numbered_evidence() {
        stmt.execute(params![example.id.value(), slot as i64, sentence])?;
    }

    Ok(())
}

fn write_assignment(conn: &Connection, row: &AssignmentRow) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO assignments (user_id, example_ids) VALUES (?1, ?2)",
        params![&row.user_id, &row.example_ids],
    )?;
    Ok(())
}

impl SurveyStore for SqliteStore {
    type Error = StoreError;

    fn load_examples(&self) -> Result<Vec<Example>, Self::Error> {
        let mut stmt = self
            .conn
            .prepare("SELECT example_id, claim FROM examples ORDER BY example_id")?;
        let heads = stmt
            .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = self.conn.prepare(
            "SELECT example_id, sentence FROM example_sentences ORDER BY example_id, slot",
        )?;
        let mut sentences: HashMap<i64, Vec<String>> = HashMap::new();
        let rows = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?;
        for row in rows {
            let (id, sentence) = row?;
            sentences.entry(id).or_default().push(sentence);
        }

        let examples = heads
            .into_iter()
            .map(|(id, claim)| {
                let evidence = sentences.remove(&id).unwrap_or_default();
                Example::from_slots(ExampleId::new(id), claim, evidence)
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Loaded {} examples", examples.len());
        Ok(examples)
    }

    fn load_assignments(&self) -> Result<Vec<AssignmentRow>, Self::Error> {
        let mut stmt = self
            .conn
            .prepare("SELECT user_id, example_ids FROM assignments ORDER BY id")?;
        let rows = stmt
            .query_map([], |row| {
                Ok(AssignmentRow {
                    user_id: row.get(0)?,
                    example_ids: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Loaded {} assignment rows", rows.len());
        Ok(rows)
    }

    fn append_results(&mut self, records: &[AnswerRecord]) -> Result<(), Self::Error> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO results (user_id, example_id, claim, decision, timestamp)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for record in records {
                stmt.execute(params![
                    &record.user_id,
                    record.example_id.value(),
                    &record.claim,
                    record.decision.as_str(),
                    record.timestamp as i64,
                ])?;
            }
        }
        tx.commit()?;

        debug!("Appended {} result rows", records.len());
        Ok(())
    }

    fn load_results(&self) -> Result<Vec<AnswerRecord>, Self::Error> {
        let mut stmt = self.conn.prepare(
            "SELECT user_id, example_id, claim, decision, timestamp FROM results ORDER BY id",
        )?;
        let records = stmt
            .query_map([], |row| {
                let decision_str: String = row.get(3)?;
                let decision = Self::str_to_decision(&decision_str).map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
                })?;

                Ok(AnswerRecord {
                    user_id: row.get(0)?,
                    example_id: ExampleId::new(row.get(1)?),
                    claim: row.get(2)?,
                    decision,
                    timestamp: row.get::<_, i64>(4)? as u64,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(records)
    }

    fn count_results_for_user(&self, user_id: &str) -> Result<usize, Self::Error> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM results WHERE user_id = ?1",
            params![user_id],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }
}
