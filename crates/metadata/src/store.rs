//! Metadata store trait and the SQLite implementation.

use crate::error::{MetadataError, MetadataResult};
use crate::models::{DocumentOptions, DocumentRow};
use crate::repos::DocumentRepo;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use time::OffsetDateTime;
use tracing::instrument;
use uuid::Uuid;

/// Combined metadata store trait.
#[async_trait]
pub trait MetadataStore: DocumentRepo + Send + Sync {
    /// Run database migrations.
    async fn migrate(&self) -> MetadataResult<()>;

    /// Check database connectivity and health.
    async fn health_check(&self) -> MetadataResult<()>;
}

/// SQLite-based home database.
pub struct SqliteStore {
    pool: Pool<Sqlite>,
}

impl SqliteStore {
    /// Open (creating if missing) the database at `path` and apply the schema.
    pub async fn new(
        path: impl AsRef<Path>,
        query_timeout_secs: Option<u64>,
    ) -> MetadataResult<Self> {
        let path = path.as_ref();
        let query_timeout = Duration::from_secs(query_timeout_secs.unwrap_or(60));

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}?mode=rwc", path.display()))?
            .create_if_missing(true)
            .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
            .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            // The desktop app and this process may share the file; one writer avoids
            // "database is locked" churn.
            .max_connections(1)
            .acquire_timeout(query_timeout)
            .connect_with(opts)
            .await?;

        let store = Self { pool };
        store.migrate().await?;

        tracing::debug!(
            path = %path.display(),
            query_timeout_secs = query_timeout.as_secs(),
            "Opened home database"
        );

        Ok(store)
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}

fn encode_options(options: Option<&DocumentOptions>) -> MetadataResult<Option<String>> {
    options
        .map(serde_json::to_string)
        .transpose()
        .map_err(MetadataError::from)
}

#[async_trait]
impl MetadataStore for SqliteStore {
    async fn migrate(&self) -> MetadataResult<()> {
        sqlx::query(SCHEMA_SQL).execute(&self.pool).await?;
        Ok(())
    }

    async fn health_check(&self) -> MetadataResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl DocumentRepo for SqliteStore {
    #[instrument(skip(self, options))]
    async fn create_document(
        &self,
        name: &str,
        options: Option<&DocumentOptions>,
    ) -> MetadataResult<DocumentRow> {
        let now = OffsetDateTime::now_utc();
        let row = DocumentRow {
            doc_id: Uuid::new_v4().simple().to_string(),
            name: name.to_string(),
            options: encode_options(options)?,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO docs (doc_id, name, options, created_at, updated_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&row.doc_id)
        .bind(&row.name)
        .bind(&row.options)
        .bind(row.created_at)
        .bind(row.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(row)
    }

    async fn get_document(&self, doc_id: &str) -> MetadataResult<Option<DocumentRow>> {
        let row = sqlx::query_as::<_, DocumentRow>("SELECT * FROM docs WHERE doc_id = ?")
            .bind(doc_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    #[instrument(skip(self))]
    async fn list_documents(&self) -> MetadataResult<Vec<DocumentRow>> {
        let rows =
            sqlx::query_as::<_, DocumentRow>("SELECT * FROM docs ORDER BY created_at, doc_id")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows)
    }

    #[instrument(skip(self, options))]
    async fn set_document_options(
        &self,
        doc_id: &str,
        options: Option<&DocumentOptions>,
    ) -> MetadataResult<()> {
        let result = sqlx::query("UPDATE docs SET options = ?, updated_at = ? WHERE doc_id = ?")
            .bind(encode_options(options)?)
            .bind(OffsetDateTime::now_utc())
            .bind(doc_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(MetadataError::NotFound(format!("doc_id {doc_id} not found")));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_document(&self, doc_id: &str) -> MetadataResult<()> {
        let result = sqlx::query("DELETE FROM docs WHERE doc_id = ?")
            .bind(doc_id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(MetadataError::NotFound(format!("doc_id {doc_id} not found")));
        }
        Ok(())
    }
}

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS docs (
    doc_id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    options TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_docs_created ON docs(created_at);
"#;
