use std::fs;
use std::path::Path;

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Row;

use crate::config::DatabaseConfig;
use crate::error::{FeedbackError, Result};
use crate::keywords::KeywordSource;
use crate::models::{
    ClassificationResult, FeedbackRecord, KeywordEntry, KeywordRecord, NewFeedback, Polarity,
    Sentiment,
};
use crate::repository::FeedbackStore;
use crate::schema::{comments, keywords};

/// Type alias for the database connection pool
pub type DbPool = Pool<SqliteConnectionManager>;
/// Type alias for one pooled connection
pub type DbConnection = r2d2::PooledConnection<SqliteConnectionManager>;

/// SQLite-backed feedback store and keyword source
pub struct Database {
    pool: DbPool,
}

impl Database {
    /// Create a new database connection pool and run migrations
    pub fn new(database_path: &str) -> Result<Self> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = Path::new(database_path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let manager = SqliteConnectionManager::file(database_path);
        let pool = Pool::builder()
            .build(manager)
            .map_err(|e| FeedbackError::Persistence(e.to_string()))?;

        let database = Self { pool };
        database.run_migrations()?;
        Ok(database)
    }

    /// Create a database from the application configuration
    pub fn from_config(config: &DatabaseConfig) -> Result<Self> {
        if let Some(parent) = Path::new(&config.path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let manager = SqliteConnectionManager::file(&config.path);
        let pool = Pool::builder()
            .max_size(config.max_connections)
            .connection_timeout(std::time::Duration::from_secs(config.connection_timeout_secs))
            .build(manager)
            .map_err(|e| FeedbackError::Persistence(e.to_string()))?;

        let database = Self { pool };
        database.run_migrations()?;
        Ok(database)
    }

    fn run_migrations(&self) -> Result<()> {
        let conn = self.get_connection()?;
        conn.execute_batch(include_str!(
            "../migrations/2025-07-20-000000_create_feedback_tables/up.sql"
        ))?;
        Ok(())
    }

    /// Get a connection from the pool
    pub fn get_connection(&self) -> Result<DbConnection> {
        self.pool
            .get()
            .map_err(|e| FeedbackError::Persistence(e.to_string()))
    }

    /// Add a keyword to the corpus, normalizing text and polarity.
    ///
    /// The keyword is trimmed and lower-cased; any polarity other than
    /// "negative" is stored as positive.
    pub fn add_keyword(
        &self,
        keyword: &str,
        polarity: &str,
        benchmark: Option<&str>,
        sub_benchmark: Option<&str>,
    ) -> Result<KeywordRecord> {
        let normalized = keyword.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(FeedbackError::Validation("keyword is required".to_string()));
        }
        let polarity = Polarity::parse_lenient(polarity);
        let created_at = Utc::now().naive_utc();

        let conn = self.get_connection()?;
        conn.execute(
            &format!(
                "INSERT INTO {} ({}, {}, {}, {}, {}) VALUES (?, ?, ?, ?, ?)",
                keywords::TABLE,
                keywords::KEYWORD,
                keywords::POLARITY,
                keywords::BENCHMARK_NAME,
                keywords::SUB_BENCHMARK_NAME,
                keywords::CREATED_AT
            ),
            rusqlite::params![
                normalized,
                polarity.as_str(),
                benchmark,
                sub_benchmark,
                created_at
            ],
        )?;

        Ok(KeywordRecord {
            id: conn.last_insert_rowid(),
            keyword: normalized,
            polarity,
            benchmark: benchmark.map(ToString::to_string),
            sub_benchmark: sub_benchmark.map(ToString::to_string),
            created_at: Some(created_at),
        })
    }

    /// List the keyword corpus, newest first
    pub fn list_keywords(&self) -> Result<Vec<KeywordRecord>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT * FROM {} ORDER BY {} DESC",
            keywords::TABLE,
            keywords::CREATED_AT
        ))?;

        let rows = stmt.query_map([], Self::map_keyword_row)?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }

    /// Remove a keyword by id; true when a row was removed
    pub fn remove_keyword(&self, id: i64) -> Result<bool> {
        let conn = self.get_connection()?;
        let affected = conn.execute(
            &format!("DELETE FROM {} WHERE {} = ?", keywords::TABLE, keywords::ID),
            rusqlite::params![id],
        )?;
        Ok(affected > 0)
    }

    fn map_keyword_row(row: &Row<'_>) -> rusqlite::Result<KeywordRecord> {
        let polarity: String = row.get(keywords::POLARITY)?;
        Ok(KeywordRecord {
            id: row.get(keywords::ID)?,
            keyword: row.get(keywords::KEYWORD)?,
            polarity: Polarity::parse_lenient(&polarity),
            benchmark: row.get(keywords::BENCHMARK_NAME)?,
            sub_benchmark: row.get(keywords::SUB_BENCHMARK_NAME)?,
            created_at: row.get(keywords::CREATED_AT)?,
        })
    }

    fn map_comment_row(row: &Row<'_>) -> rusqlite::Result<FeedbackRecord> {
        let sentiment: Option<String> = row.get(comments::SENTIMENT)?;
        let confidence: Option<f64> = row.get(comments::SENTIMENT_CONFIDENCE)?;
        let reason: Option<String> = row.get(comments::SENTIMENT_REASON)?;

        Ok(FeedbackRecord {
            id: row.get(comments::ID)?,
            guest_name: row.get(comments::GUEST_NAME)?,
            outlet_id: row.get(comments::OUTLET_ID)?,
            rating: row.get(comments::RATING)?,
            comment_text: row.get(comments::COMMENT_TEXT)?,
            phone: row.get(comments::PHONE)?,
            email: row.get(comments::EMAIL)?,
            address: row.get(comments::ADDRESS)?,
            sentiment: sentiment.as_deref().and_then(Sentiment::parse),
            sentiment_confidence: confidence.unwrap_or(0.0),
            sentiment_reason: reason.unwrap_or_default(),
            matched_keywords: parse_json_list(row.get(comments::MATCHED_KEYWORDS)?),
            benchmarks: parse_json_list(row.get(comments::BENCHMARKS)?),
            sub_benchmarks: parse_json_list(row.get(comments::SUB_BENCHMARKS)?),
            created_at: row.get(comments::CREATED_AT)?,
        })
    }

    fn query_comments(
        &self,
        outlet_id: Option<&str>,
        newest_first: bool,
        limit: Option<usize>,
    ) -> Result<Vec<FeedbackRecord>> {
        let conn = self.get_connection()?;

        let limit = limit.map(|value| value as i64);
        let mut sql = format!("SELECT * FROM {}", comments::TABLE);
        let mut params: Vec<&dyn rusqlite::ToSql> = Vec::new();

        if let Some(outlet) = &outlet_id {
            sql.push_str(&format!(" WHERE {} = ?", comments::OUTLET_ID));
            params.push(outlet);
        }

        if newest_first {
            sql.push_str(&format!(" ORDER BY {} DESC", comments::CREATED_AT));
        }

        if let Some(limit) = &limit {
            sql.push_str(" LIMIT ?");
            params.push(limit);
        }

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params.as_slice(), Self::map_comment_row)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}

#[async_trait]
impl FeedbackStore for Database {
    async fn insert_feedback(
        &self,
        submission: NewFeedback,
        classification: ClassificationResult,
    ) -> anyhow::Result<FeedbackRecord> {
        let created_at: NaiveDateTime = Utc::now().naive_utc();
        let matched_keywords = serde_json::to_string(&classification.matched_keywords)?;
        let benchmarks = serde_json::to_string(&classification.benchmarks)?;
        let sub_benchmarks = serde_json::to_string(&classification.sub_benchmarks)?;

        let conn = self.get_connection()?;
        conn.execute(
            &format!(
                "INSERT INTO {} ({}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}, {}) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                comments::TABLE,
                comments::GUEST_NAME,
                comments::OUTLET_ID,
                comments::RATING,
                comments::COMMENT_TEXT,
                comments::PHONE,
                comments::EMAIL,
                comments::ADDRESS,
                comments::SENTIMENT,
                comments::SENTIMENT_CONFIDENCE,
                comments::SENTIMENT_REASON,
                comments::MATCHED_KEYWORDS,
                comments::BENCHMARKS,
                comments::SUB_BENCHMARKS,
                comments::CREATED_AT
            ),
            rusqlite::params![
                submission.guest_name,
                submission.outlet_id,
                submission.rating,
                submission.comment_text,
                submission.phone,
                submission.email,
                submission.address,
                classification.sentiment.as_str(),
                classification.confidence,
                classification.reason,
                matched_keywords,
                benchmarks,
                sub_benchmarks,
                created_at
            ],
        )?;

        Ok(FeedbackRecord {
            id: conn.last_insert_rowid(),
            guest_name: submission.guest_name,
            outlet_id: submission.outlet_id,
            rating: submission.rating,
            comment_text: submission.comment_text,
            phone: submission.phone,
            email: submission.email,
            address: submission.address,
            sentiment: Some(classification.sentiment),
            sentiment_confidence: classification.confidence,
            sentiment_reason: classification.reason,
            matched_keywords: classification.matched_keywords,
            benchmarks: classification.benchmarks,
            sub_benchmarks: classification.sub_benchmarks,
            created_at: Some(created_at),
        })
    }

    async fn fetch_all(&self) -> anyhow::Result<Vec<FeedbackRecord>> {
        Ok(self.query_comments(None, false, None)?)
    }

    async fn fetch_by_outlet(&self, outlet_id: &str) -> anyhow::Result<Vec<FeedbackRecord>> {
        Ok(self.query_comments(Some(outlet_id), false, None)?)
    }

    async fn fetch_recent(
        &self,
        outlet_id: Option<&str>,
        limit: Option<usize>,
    ) -> anyhow::Result<Vec<FeedbackRecord>> {
        Ok(self.query_comments(outlet_id, true, limit)?)
    }

    async fn delete_feedback(&self, id: i64) -> anyhow::Result<bool> {
        let conn = self.get_connection()?;
        let affected = conn.execute(
            &format!("DELETE FROM {} WHERE {} = ?", comments::TABLE, comments::ID),
            rusqlite::params![id],
        )?;
        Ok(affected > 0)
    }
}

#[async_trait]
impl KeywordSource for Database {
    async fn load_keywords(&self) -> anyhow::Result<Vec<KeywordEntry>> {
        let conn = self.get_connection()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {}, {}, {}, {} FROM {}",
            keywords::KEYWORD,
            keywords::POLARITY,
            keywords::BENCHMARK_NAME,
            keywords::SUB_BENCHMARK_NAME,
            keywords::TABLE
        ))?;

        let rows = stmt.query_map([], |row| {
            let keyword: String = row.get(0)?;
            let polarity: String = row.get(1)?;
            let benchmark: Option<String> = row.get(2)?;
            let sub_benchmark: Option<String> = row.get(3)?;
            Ok(
                KeywordEntry::new(&keyword, Polarity::parse_lenient(&polarity))
                    .with_benchmarks(benchmark, sub_benchmark),
            )
        })?;

        let mut entries = Vec::new();
        for row in rows {
            entries.push(row?);
        }
        Ok(entries)
    }
}

fn parse_json_list(value: Option<String>) -> Vec<String> {
    value
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default()
}
