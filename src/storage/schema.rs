//! Database schema definitions
//!
//! This module contains all SQL schema definitions for the Ensun-Scout database.

use rusqlite::Connection;

/// SQL schema for the database
pub const SCHEMA_SQL: &str = r#"
-- One row per scrape invocation
CREATE TABLE IF NOT EXISTS runs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    query TEXT NOT NULL,
    started_at TEXT NOT NULL,
    finished_at TEXT,
    config_hash TEXT NOT NULL,
    status TEXT NOT NULL,
    title TEXT NOT NULL DEFAULT '',
    urls TEXT NOT NULL DEFAULT '[]',
    pages_requested INTEGER NOT NULL DEFAULT 0,
    pages_succeeded INTEGER NOT NULL DEFAULT 0,
    companies_count INTEGER NOT NULL DEFAULT 0,
    error TEXT
);

-- Extracted companies, one column per record field
CREATE TABLE IF NOT EXISTS companies (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER NOT NULL REFERENCES runs(id),
    position INTEGER NOT NULL,
    company_name TEXT NOT NULL,
    location TEXT NOT NULL,
    employee TEXT NOT NULL,
    founding_year TEXT NOT NULL,
    esg_country_risk TEXT NOT NULL,
    description TEXT NOT NULL,
    detail_url TEXT NOT NULL,
    UNIQUE(run_id, position)
);

CREATE INDEX IF NOT EXISTS idx_companies_run ON companies(run_id);
CREATE INDEX IF NOT EXISTS idx_companies_name ON companies(company_name);

-- Page-level diagnostics
CREATE TABLE IF NOT EXISTS page_errors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    run_id INTEGER NOT NULL REFERENCES runs(id),
    position INTEGER NOT NULL,
    message TEXT NOT NULL,
    UNIQUE(run_id, position)
);

CREATE INDEX IF NOT EXISTS idx_page_errors_run ON page_errors(run_id);
"#;

/// Initializes the database schema
///
/// Safe to call on an existing database; every statement is `IF NOT EXISTS`.
pub fn initialize_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)
}
