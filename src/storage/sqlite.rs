//! SQLite storage implementation
//!
//! This module provides a SQLite-based implementation of the Storage trait.

use crate::record::{CompanyRecord, ScrapeResult};
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{Storage, StorageError, StorageResult};
use crate::storage::{RunRecord, RunStatus};
use crate::ScoutError;
use chrono::Utc;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

const RUN_COLUMNS: &str = "id, query, started_at, finished_at, config_hash, status, title, urls, \
pages_requested, pages_succeeded, companies_count, error";

/// SQLite storage backend
pub struct SqliteStorage {
    conn: Connection,
}

impl SqliteStorage {
    /// Creates a new SqliteStorage instance
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteStorage)` - Successfully opened/created database
    /// * `Err(ScoutError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, ScoutError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> Result<Self, ScoutError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

/// Maps a row selected with [`RUN_COLUMNS`]
///
/// A `urls` column that is not a JSON string array is a conversion error.
fn run_from_row(row: &Row<'_>) -> rusqlite::Result<RunRecord> {
    let urls: String = row.get(7)?;
    let urls: Vec<String> = serde_json::from_str(&urls)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e)))?;
    Ok(RunRecord {
        id: row.get(0)?,
        query: row.get(1)?,
        started_at: row.get(2)?,
        finished_at: row.get(3)?,
        config_hash: row.get(4)?,
        status: RunStatus::from_db_string(&row.get::<_, String>(5)?).unwrap_or(RunStatus::Running),
        title: row.get(6)?,
        urls,
        pages_requested: row.get(8)?,
        pages_succeeded: row.get(9)?,
        companies_count: row.get(10)?,
        error: row.get(11)?,
    })
}

impl Storage for SqliteStorage {
    // ===== Run Management =====

    fn create_run(&mut self, query: &str, config_hash: &str) -> StorageResult<i64> {
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO runs (query, started_at, config_hash, status) VALUES (?1, ?2, ?3, ?4)",
            params![query, now, config_hash, RunStatus::Running.to_db_string()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn get_run(&self, run_id: i64) -> StorageResult<RunRecord> {
        let sql = format!("SELECT {} FROM runs WHERE id = ?1", RUN_COLUMNS);
        self.conn
            .query_row(&sql, params![run_id], run_from_row)
            .optional()?
            .ok_or(StorageError::RunNotFound(run_id))
    }

    fn get_latest_run(&self) -> StorageResult<Option<RunRecord>> {
        let sql = format!("SELECT {} FROM runs ORDER BY id DESC LIMIT 1", RUN_COLUMNS);
        let run = self.conn.query_row(&sql, [], run_from_row).optional()?;
        Ok(run)
    }

    fn complete_run(&mut self, run_id: i64, status: RunStatus) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2 WHERE id = ?3",
            params![status.to_db_string(), now, run_id],
        )?;
        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    fn fail_run(&mut self, run_id: i64, error: &str) -> StorageResult<()> {
        let now = Utc::now().to_rfc3339();
        let updated = self.conn.execute(
            "UPDATE runs SET status = ?1, finished_at = ?2, error = ?3 WHERE id = ?4",
            params![RunStatus::Failed.to_db_string(), now, error, run_id],
        )?;
        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }
        Ok(())
    }

    // ===== Results =====

    fn record_result(&mut self, run_id: i64, result: &ScrapeResult) -> StorageResult<()> {
        let urls = serde_json::to_string(&result.urls)?;
        let tx = self.conn.transaction()?;

        let updated = tx.execute(
            "UPDATE runs SET title = ?1, urls = ?2, pages_requested = ?3, pages_succeeded = ?4,
                 companies_count = ?5, error = ?6
             WHERE id = ?7",
            params![
                result.title,
                urls,
                result.pages_requested as i64,
                result.pages_succeeded as i64,
                result.companies_count as i64,
                result.error,
                run_id
            ],
        )?;
        if updated == 0 {
            return Err(StorageError::RunNotFound(run_id));
        }

        tx.execute("DELETE FROM companies WHERE run_id = ?1", params![run_id])?;
        tx.execute("DELETE FROM page_errors WHERE run_id = ?1", params![run_id])?;

        {
            let mut insert_company = tx.prepare(
                "INSERT INTO companies (run_id, position, company_name, location, employee,
                     founding_year, esg_country_risk, description, detail_url)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;
            for (position, company) in result.companies.iter().enumerate() {
                insert_company.execute(params![
                    run_id,
                    position as i64,
                    company.company_name,
                    company.location,
                    company.employee,
                    company.founding_year,
                    company.esg_country_risk,
                    company.description,
                    company.detail_url
                ])?;
            }

            let mut insert_error = tx.prepare(
                "INSERT INTO page_errors (run_id, position, message) VALUES (?1, ?2, ?3)",
            )?;
            for (position, message) in result.page_errors.iter().enumerate() {
                insert_error.execute(params![run_id, position as i64, message])?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    fn load_companies(&self, run_id: i64) -> StorageResult<Vec<CompanyRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT company_name, location, employee, founding_year, esg_country_risk,
                    description, detail_url
             FROM companies WHERE run_id = ?1 ORDER BY position",
        )?;

        let companies = stmt
            .query_map(params![run_id], |row| {
                Ok(CompanyRecord {
                    company_name: row.get(0)?,
                    location: row.get(1)?,
                    employee: row.get(2)?,
                    founding_year: row.get(3)?,
                    esg_country_risk: row.get(4)?,
                    description: row.get(5)?,
                    detail_url: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(companies)
    }

    fn load_page_errors(&self, run_id: i64) -> StorageResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT message FROM page_errors WHERE run_id = ?1 ORDER BY position")?;

        let errors = stmt
            .query_map(params![run_id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;

        Ok(errors)
    }

    fn load_result(&self, run_id: i64) -> StorageResult<ScrapeResult> {
        let run = self.get_run(run_id)?;
        let companies = self.load_companies(run_id)?;
        let page_errors = self.load_page_errors(run_id)?;

        Ok(ScrapeResult {
            companies_count: companies.len(),
            companies,
            query: run.query,
            urls: run.urls,
            title: run.title,
            pages_requested: run.pages_requested as usize,
            pages_succeeded: run.pages_succeeded as usize,
            page_errors,
            error: run.error,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::PartialCompany;

    fn company(name: &str, location: &str) -> CompanyRecord {
        PartialCompany {
            company_name: Some(name.to_string()),
            location: Some(location.to_string()),
            ..Default::default()
        }
        .into_record()
        .unwrap()
    }

    fn sample_result() -> ScrapeResult {
        ScrapeResult {
            companies: vec![company("Alpha", "Berlin"), company("Beta", "Hamburg")],
            query: "Tokenization".to_string(),
            urls: vec![
                "https://ensun.io/search?threshold=VERY_LOW&q=Tokenization".to_string(),
                "https://ensun.io/search?threshold=VERY_LOW&q=Tokenization&page=2".to_string(),
            ],
            title: "Tokenization companies".to_string(),
            companies_count: 2,
            pages_requested: 2,
            pages_succeeded: 1,
            page_errors: vec!["page 2: connection reset".to_string()],
            error: Some("some pages could not be processed".to_string()),
        }
    }

    #[test]
    fn test_create_and_get_run() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let run_id = storage.create_run("Tokenization", "abc123").unwrap();

        let run = storage.get_run(run_id).unwrap();
        assert_eq!(run.query, "Tokenization");
        assert_eq!(run.config_hash, "abc123");
        assert_eq!(run.status, RunStatus::Running);
        assert!(run.finished_at.is_none());
        assert!(run.urls.is_empty());
    }

    #[test]
    fn test_get_missing_run() {
        let storage = SqliteStorage::new_in_memory().unwrap();
        assert!(matches!(
            storage.get_run(42),
            Err(StorageError::RunNotFound(42))
        ));
        assert!(storage.get_latest_run().unwrap().is_none());
    }

    #[test]
    fn test_record_and_load_result() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let run_id = storage.create_run("Tokenization", "").unwrap();
        let result = sample_result();

        storage.record_result(run_id, &result).unwrap();

        assert_eq!(storage.load_companies(run_id).unwrap(), result.companies);
        assert_eq!(storage.load_page_errors(run_id).unwrap(), result.page_errors);
        assert_eq!(storage.load_result(run_id).unwrap(), result);
    }

    #[test]
    fn test_record_result_replaces_previous() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let run_id = storage.create_run("Tokenization", "").unwrap();

        storage.record_result(run_id, &sample_result()).unwrap();

        let mut smaller = sample_result();
        smaller.companies.truncate(1);
        smaller.companies_count = 1;
        smaller.page_errors.clear();
        storage.record_result(run_id, &smaller).unwrap();

        assert_eq!(storage.load_companies(run_id).unwrap().len(), 1);
        assert!(storage.load_page_errors(run_id).unwrap().is_empty());
    }

    #[test]
    fn test_complete_run() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let first = storage.create_run("a", "").unwrap();
        let second = storage.create_run("b", "").unwrap();

        storage.complete_run(second, RunStatus::Partial).unwrap();

        let latest = storage.get_latest_run().unwrap().unwrap();
        assert_eq!(latest.id, second);
        assert_eq!(latest.status, RunStatus::Partial);
        assert!(latest.finished_at.is_some());
        assert_eq!(storage.get_run(first).unwrap().status, RunStatus::Running);

        assert!(storage.complete_run(99, RunStatus::Completed).is_err());
    }

    #[test]
    fn test_fail_run() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let run_id = storage.create_run("Tokenization", "").unwrap();

        storage.fail_run(run_id, "invalid selector").unwrap();

        let run = storage.get_run(run_id).unwrap();
        assert_eq!(run.status, RunStatus::Failed);
        assert_eq!(run.error.as_deref(), Some("invalid selector"));
        assert!(run.finished_at.is_some());
    }

    #[test]
    fn test_malformed_urls_column_is_an_error() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        let run_id = storage.create_run("Tokenization", "").unwrap();
        storage
            .conn
            .execute(
                "UPDATE runs SET urls = 'not json' WHERE id = ?1",
                params![run_id],
            )
            .unwrap();

        assert!(matches!(
            storage.get_run(run_id),
            Err(StorageError::Sqlite(
                rusqlite::Error::FromSqlConversionFailure(7, Type::Text, _)
            ))
        ));
    }

    #[test]
    fn test_record_result_unknown_run() {
        let mut storage = SqliteStorage::new_in_memory().unwrap();
        assert!(matches!(
            storage.record_result(7, &sample_result()),
            Err(StorageError::RunNotFound(7))
        ));
    }
}
