use async_trait::async_trait;
use pinhole_core::error::StorageError;
use pinhole_core::repository::{ReadRepository, Repository, Result, UrlRecord};
use pinhole_core::shortcode::ShortCode;
use sqlx::{MySqlPool, Row};
use tracing::debug;

const SCHEMA: &str = include_str!("../ddl/mysql/short_urls.sql");

/// MySQL implementation of the repository contract.
///
/// One row per mapping in `short_urls`. The short code is the primary key,
/// so a second insert of the same code is reported as a conflict instead of
/// silently producing a duplicate.
#[derive(Debug, Clone)]
pub struct MySqlRepository {
    pool: MySqlPool,
}

impl MySqlRepository {
    /// Creates a repository from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Creates a repository by opening a new MySQL connection pool.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPool::connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }

    /// Creates the `short_urls` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(SCHEMA)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        debug!("short_urls schema ready");
        Ok(())
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

fn map_sqlx_error(err: sqlx::Error) -> StorageError {
    let message = err.to_string();

    match err {
        sqlx::Error::PoolTimedOut => StorageError::Timeout(message),
        sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::Io(_)
        | sqlx::Error::Tls(_) => StorageError::Unavailable(message),
        sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnDecode { .. }
        | sqlx::Error::TypeNotFound { .. }
        | sqlx::Error::Decode(_)
        | sqlx::Error::RowNotFound => StorageError::InvalidData(message),
        _ => StorageError::Query(message),
    }
}

#[async_trait]
impl ReadRepository for MySqlRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<UrlRecord>> {
        let row = sqlx::query(
            r#"
            SELECT long_url
            FROM short_urls
            WHERE short_url = ?
            LIMIT 1
            "#,
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Ok(None);
        };

        let long_url: String = row.try_get("long_url").map_err(map_sqlx_error)?;

        Ok(Some(UrlRecord { long_url }))
    }
}

#[async_trait]
impl Repository for MySqlRepository {
    async fn insert(&self, code: &ShortCode, record: UrlRecord) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO short_urls (short_url, long_url)
            VALUES (?, ?)
            "#,
        )
        .bind(code.as_str())
        .bind(record.long_url)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => Err(StorageError::Conflict(code.to_string())),
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn count(&self) -> Result<u64> {
        let row = sqlx::query("SELECT COUNT(*) AS total FROM short_urls")
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let total: i64 = row.try_get("total").map_err(map_sqlx_error)?;
        u64::try_from(total)
            .map_err(|_| StorageError::InvalidData(format!("negative row count: {total}")))
    }
}
