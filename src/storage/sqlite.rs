//! SQLite sink implementation
//!
//! Stores one row per URL in the `pages` table (upserted on every save) and one row per
//! completed crawl in the `runs` table.

use crate::classify::PageType;
use crate::storage::schema::initialize_schema;
use crate::storage::traits::{PageSink, SaveOutcome};
use crate::storage::{richness_gate, PageRecord};
use crate::{GleanerError, PersistenceError};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// Separator for list columns; never appears in extracted text
const LIST_SEPARATOR: char = '\u{1f}';

/// A stored crawl run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummaryRow {
    pub id: i64,
    pub started_at: String,
    pub finished_at: String,
    pub config_hash: String,
    pub pages_visited: u64,
    pub pages_failed: u64,
    pub records_kept: u64,
}

/// SQLite storage backend
pub struct SqliteSink {
    conn: Mutex<Connection>,
}

impl SqliteSink {
    /// Opens or creates the database at `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteSink)` - Successfully opened/created database
    /// * `Err(GleanerError)` - Failed to open database
    pub fn new(path: &Path) -> Result<Self, GleanerError> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database (for testing)
    #[cfg(test)]
    pub fn new_in_memory() -> Result<Self, GleanerError> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Loads the stored record for `url`, if any
    pub fn get_page(&self, url: &str) -> Result<Option<PageRecord>, PersistenceError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT url, title, section_title, page_type, keywords, headings, paragraphs, scraped_at
             FROM pages WHERE url = ?1",
        )?;

        let record = stmt
            .query_row(params![url], |row| {
                let page_type: String = row.get(3)?;
                let scraped_at: String = row.get(7)?;
                Ok(PageRecord {
                    url: row.get(0)?,
                    title: row.get(1)?,
                    section_title: row.get(2)?,
                    page_type: page_type.parse().unwrap_or(PageType::General),
                    keywords: split_list(&row.get::<_, String>(4)?).into_iter().collect(),
                    headings: split_list(&row.get::<_, String>(5)?),
                    paragraphs: split_list(&row.get::<_, String>(6)?),
                    scraped_at: DateTime::parse_from_rfc3339(&scraped_at)
                        .map(|t| t.with_timezone(&Utc))
                        .unwrap_or_else(|_| Utc::now()),
                })
            })
            .optional()?;

        Ok(record)
    }

    /// Counts stored pages
    pub fn count_pages(&self) -> Result<u64, PersistenceError> {
        let count: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM pages", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Counts stored pages per page type
    pub fn count_by_page_type(&self) -> Result<BTreeMap<PageType, u64>, PersistenceError> {
        let conn = self.conn();
        let mut stmt =
            conn.prepare("SELECT page_type, COUNT(*) FROM pages GROUP BY page_type")?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })?;

        let mut counts = BTreeMap::new();
        for row in rows {
            let (page_type, count) = row?;
            if let Ok(page_type) = page_type.parse::<PageType>() {
                *counts.entry(page_type).or_insert(0) += count as u64;
            }
        }

        Ok(counts)
    }

    /// Records a finished crawl run
    pub fn record_run(
        &self,
        config_hash: &str,
        started_at: DateTime<Utc>,
        pages_visited: u64,
        pages_failed: u64,
        records_kept: u64,
    ) -> Result<i64, PersistenceError> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO runs (started_at, finished_at, config_hash, pages_visited, pages_failed, records_kept)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                started_at.to_rfc3339(),
                Utc::now().to_rfc3339(),
                config_hash,
                pages_visited as i64,
                pages_failed as i64,
                records_kept as i64
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Gets the most recent run
    pub fn latest_run(&self) -> Result<Option<RunSummaryRow>, PersistenceError> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, started_at, finished_at, config_hash, pages_visited, pages_failed, records_kept
             FROM runs ORDER BY id DESC LIMIT 1",
        )?;

        let run = stmt
            .query_row([], |row| {
                Ok(RunSummaryRow {
                    id: row.get(0)?,
                    started_at: row.get(1)?,
                    finished_at: row.get(2)?,
                    config_hash: row.get(3)?,
                    pages_visited: row.get::<_, i64>(4)? as u64,
                    pages_failed: row.get::<_, i64>(5)? as u64,
                    records_kept: row.get::<_, i64>(6)? as u64,
                })
            })
            .optional()?;

        Ok(run)
    }
}

fn join_list<'a>(items: impl IntoIterator<Item = &'a String>) -> String {
    items
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(&LIST_SEPARATOR.to_string())
}

fn split_list(value: &str) -> Vec<String> {
    if value.is_empty() {
        return Vec::new();
    }
    value.split(LIST_SEPARATOR).map(str::to_string).collect()
}

impl PageSink for SqliteSink {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn save(&self, record: &PageRecord) -> Result<SaveOutcome, PersistenceError> {
        if let Some(reason) = richness_gate(record) {
            return Ok(SaveOutcome::Skipped(reason));
        }

        self.conn().execute(
            "INSERT INTO pages (url, title, section_title, page_type, keywords, headings, paragraphs, scraped_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
             ON CONFLICT(url) DO UPDATE SET
                title = excluded.title,
                section_title = excluded.section_title,
                page_type = excluded.page_type,
                keywords = excluded.keywords,
                headings = excluded.headings,
                paragraphs = excluded.paragraphs,
                scraped_at = excluded.scraped_at",
            params![
                record.url,
                record.title,
                record.section_title,
                record.page_type.as_str(),
                join_list(&record.keywords),
                join_list(&record.headings),
                join_list(&record.paragraphs),
                record.scraped_at.to_rfc3339(),
            ],
        )?;

        Ok(SaveOutcome::Written(format!("pages[{}]", record.url)))
    }

    fn discard(&self, url: &str) -> Result<(), PersistenceError> {
        self.conn()
            .execute("DELETE FROM pages WHERE url = ?1", params![url])?;
        Ok(())
    }
}
