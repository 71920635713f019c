//! DDL for the user fact ledger.

use rusqlite::Connection;

/// Everything uses `IF NOT EXISTS`, so applying it again is a no-op.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS user_facts (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id    TEXT NOT NULL DEFAULT 'default',
    fact       TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_user_id ON user_facts(user_id);
"#;

/// Create the fact table and its user index if they are missing.
pub fn ensure_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    log::info!("User memory schema ready");
    Ok(())
}
