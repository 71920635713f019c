//! SQLite-backed fact ledger.
//!
//! Every call checks a connection out of the pool for the duration of a
//! single statement and hands it back on drop.

use crate::schema;
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::params;
use std::path::Path;
use std::time::Duration;
use user_memory_types::{Fact, FactId, FactStats};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

pub type DbConn = PooledConnection<SqliteConnectionManager>;

#[derive(Debug, thiserror::Error)]
pub enum FactStoreError {
    #[error("cannot prepare database location: {0}")]
    Io(#[from] std::io::Error),
    #[error("no database connection available: {0}")]
    Pool(#[from] r2d2::Error),
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

pub struct Db {
    pool: Pool<SqliteConnectionManager>,
}

impl Db {
    /// Open (creating if needed) the database at `path` and make sure the
    /// schema exists. `":memory:"` opens a private single-connection store.
    pub fn open(path: &str, pool_size: u32) -> Result<Self, FactStoreError> {
        let builder = Pool::<SqliteConnectionManager>::builder().connection_timeout(CONNECT_TIMEOUT);
        let (manager, builder) = if path == ":memory:" {
            // Each in-memory connection is its own database, so keep exactly one alive forever.
            (
                SqliteConnectionManager::memory(),
                builder.max_size(1).max_lifetime(None).idle_timeout(None),
            )
        } else {
            if let Some(parent) = Path::new(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            (SqliteConnectionManager::file(path), builder.max_size(pool_size.max(1)))
        };

        let manager = manager.with_init(|c| {
            c.busy_timeout(BUSY_TIMEOUT)?;
            c.execute_batch("PRAGMA journal_mode=WAL;")
        });

        let db = Self {
            pool: builder.build(manager)?,
        };
        db.ensure_schema()?;
        Ok(db)
    }

    pub fn ensure_schema(&self) -> Result<(), FactStoreError> {
        let conn = self.conn()?;
        schema::ensure_schema(&conn)?;
        Ok(())
    }

    fn conn(&self) -> Result<DbConn, FactStoreError> {
        Ok(self.pool.get()?)
    }

    /// Record a new fact for `user_id` and return its id.
    pub fn append(&self, user_id: &str, text: &str) -> Result<FactId, FactStoreError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO user_facts (user_id, fact) VALUES (?1, ?2)",
            params![user_id, text],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// All facts for `user_id`, oldest first.
    pub fn list_by_user(&self, user_id: &str) -> Result<Vec<Fact>, FactStoreError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, fact, created_at
             FROM user_facts
             WHERE user_id = ?1
             ORDER BY created_at ASC, id ASC",
        )?;
        let facts = stmt
            .query_map(params![user_id], row_to_fact)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(facts)
    }

    pub fn stats(&self) -> Result<FactStats, FactStoreError> {
        let conn = self.conn()?;
        let stats = conn.query_row(
            "SELECT COUNT(*), COUNT(DISTINCT user_id) FROM user_facts",
            [],
            |r| {
                Ok(FactStats {
                    total_facts: r.get(0)?,
                    total_users: r.get(1)?,
                })
            },
        )?;
        Ok(stats)
    }
}

fn row_to_fact(row: &rusqlite::Row) -> rusqlite::Result<Fact> {
    Ok(Fact {
        id: row.get(0)?,
        user_id: row.get(1)?,
        text: row.get(2)?,
        created_at: row.get(3)?,
    })
}
