//! SQLite persistence for decoded collections (cargo feature `sqlite`).
//!
//! The loader only consumes what the decoder produces: it creates one table per entity and
//! bulk-inserts a [`Snapshot`]. Foreign keys are stored as plain integers without constraints,
//! since dangling references are valid data.

use log::{debug, info};
use rusqlite::{params, Connection};

use crate::error::LoaderError;
use crate::sources::{DataSources, Snapshot};

/// Convenience result type for loader operations.
pub type LoaderResult<T> = Result<T, LoaderError>;

const SCHEMA_DDL: &str = "
CREATE TABLE IF NOT EXISTS agent (
    id                 INTEGER PRIMARY KEY,
    first_name         TEXT NOT NULL,
    last_name          TEXT NOT NULL,
    state              TEXT NOT NULL,
    region             TEXT NOT NULL,
    primary_language   TEXT NOT NULL,
    secondary_language TEXT NOT NULL DEFAULT ''
);
CREATE TABLE IF NOT EXISTS customer (
    id                 INTEGER PRIMARY KEY,
    first_name         TEXT NOT NULL,
    last_name          TEXT NOT NULL,
    age                INTEGER NOT NULL,
    state              TEXT NOT NULL,
    region             TEXT NOT NULL,
    agent_id           INTEGER NOT NULL,
    primary_language   TEXT NOT NULL,
    secondary_language TEXT NOT NULL DEFAULT ''
);
CREATE TABLE IF NOT EXISTS policy (
    id                 INTEGER PRIMARY KEY,
    customer_id        INTEGER NOT NULL,
    policy_type        TEXT NOT NULL,
    start_date         TEXT NOT NULL,
    premium_per_month  REAL NOT NULL
);
CREATE TABLE IF NOT EXISTS claim (
    id                 INTEGER PRIMARY KEY,
    policy_id          INTEGER NOT NULL,
    is_claim_open      INTEGER NOT NULL,
    claim_type         TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_customer_agent ON customer(agent_id);
CREATE INDEX IF NOT EXISTS idx_policy_customer ON policy(customer_id);
CREATE INDEX IF NOT EXISTS idx_claim_policy ON claim(policy_id);
";

/// Number of rows written per table by one load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub agents: usize,
    pub customers: usize,
    pub policies: usize,
    pub claims: usize,
}

/// Writes decoded collections into a SQLite database.
pub struct SqliteLoader {
    conn: Connection,
}

impl SqliteLoader {
    /// Open (or create) a database file.
    pub fn open(path: &str) -> LoaderResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only matters for real files; in-memory databases ignore it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        Ok(Self { conn })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> LoaderResult<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    /// Create the four entity tables if they do not exist yet.
    pub fn create_schema(&self) -> LoaderResult<()> {
        self.conn.execute_batch(SCHEMA_DDL)?;
        Ok(())
    }

    /// Insert every entity of `snapshot` in one transaction.
    ///
    /// Rows whose id already exists are replaced, so loading the same extracts twice is
    /// idempotent.
    pub fn load_snapshot(&mut self, snapshot: &Snapshot) -> LoaderResult<LoadSummary> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT OR REPLACE INTO agent
                 (id, first_name, last_name, state, region, primary_language, secondary_language)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for a in &snapshot.agents {
                stmt.execute(params![
                    a.id,
                    a.first_name,
                    a.last_name,
                    a.state,
                    a.region,
                    a.primary_language,
                    a.secondary_language
                ])?;
            }

            let mut stmt = tx.prepare_cached(
                "INSERT OR REPLACE INTO customer
                 (id, first_name, last_name, age, state, region, agent_id, primary_language, secondary_language)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for c in &snapshot.customers {
                stmt.execute(params![
                    c.id,
                    c.first_name,
                    c.last_name,
                    c.age,
                    c.state,
                    c.region,
                    c.agent_id,
                    c.primary_language,
                    c.secondary_language
                ])?;
            }

            let mut stmt = tx.prepare_cached(
                "INSERT OR REPLACE INTO policy
                 (id, customer_id, policy_type, start_date, premium_per_month)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for p in &snapshot.policies {
                stmt.execute(params![
                    p.id,
                    p.customer_id,
                    p.policy_type,
                    p.start_date,
                    p.premium_per_month
                ])?;
            }

            let mut stmt = tx.prepare_cached(
                "INSERT OR REPLACE INTO claim (id, policy_id, is_claim_open, claim_type)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;
            for c in &snapshot.claims {
                stmt.execute(params![c.id, c.policy_id, c.is_claim_open, c.claim_type])?;
            }
        }
        tx.commit()?;

        let summary = LoadSummary {
            agents: snapshot.agents.len(),
            customers: snapshot.customers.len(),
            policies: snapshot.policies.len(),
            claims: snapshot.claims.len(),
        };
        info!("loaded {summary:?}");
        Ok(summary)
    }

    /// Decode `sources` and load the result. Nothing is written if any file fails to decode.
    pub fn load_sources(&mut self, sources: &DataSources) -> LoaderResult<LoadSummary> {
        let snapshot = sources.load()?;
        debug!("decoded {} entities for loading", snapshot.entity_count());
        self.create_schema()?;
        self.load_snapshot(&snapshot)
    }

    /// Borrow the underlying connection, e.g. to run ad-hoc SQL against loaded data.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
