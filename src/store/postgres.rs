use super::{CredentialRecord, CredentialStore, NewCredential};
use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::{
    postgres::{PgPoolOptions, PgRow},
    Connection, PgPool, Row,
};
use std::time::Duration;
use tracing::{info_span, Instrument};

const SCHEMA_SQL: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/schema.sql"));

/// `PostgreSQL` backed store over the `credentials` table.
#[derive(Debug, Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    /// Wrap an existing pool. The schema is not touched.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool against `dsn` and make sure the table exists.
    ///
    /// # Errors
    /// Returns an error if the database is unreachable or the schema cannot be created.
    pub async fn connect(dsn: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .min_connections(1)
            .max_connections(5)
            .max_lifetime(Duration::from_secs(60 * 2))
            .test_before_acquire(true)
            .connect(dsn)
            .await
            .context("Failed to connect to database")?;

        let store = Self::new(pool);
        store.ensure_schema().await?;

        Ok(store)
    }

    /// Create the `credentials` table and its lookup index if missing.
    ///
    /// # Errors
    /// Returns an error if the DDL fails.
    pub async fn ensure_schema(&self) -> Result<()> {
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "CREATE",
            db.statement = SCHEMA_SQL
        );
        sqlx::raw_sql(SCHEMA_SQL)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to create credentials schema")?;

        Ok(())
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn record_from_row(row: &PgRow) -> Result<CredentialRecord, sqlx::Error> {
    Ok(CredentialRecord {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        password: row.try_get("password")?,
    })
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    fn kind(&self) -> &'static str {
        "postgres"
    }

    async fn create(&self, credential: NewCredential) -> Result<Option<CredentialRecord>> {
        // No target on ON CONFLICT: any uniqueness constraint added by an
        // operator turns a duplicate into "no row" instead of an error.
        let query = r"
            INSERT INTO credentials (id, username, password)
            VALUES ($1, $2, $3)
            ON CONFLICT DO NOTHING
            RETURNING id, username, password
        ";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        let record = credential.into_record();
        let row = sqlx::query(query)
            .bind(record.id)
            .bind(&record.username)
            .bind(&record.password)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to insert credential")?;

        row.as_ref()
            .map(record_from_row)
            .transpose()
            .context("failed to decode inserted credential")
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<CredentialRecord>> {
        let query = r"
            SELECT id, username, password
            FROM credentials
            WHERE username = $1
            ORDER BY seq
            LIMIT 1
        ";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(username)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to lookup credential")?;

        row.as_ref()
            .map(record_from_row)
            .transpose()
            .context("failed to decode credential")
    }

    async fn ping(&self) -> Result<()> {
        let acquire_span = info_span!(
            "db.acquire",
            db.system = "postgresql",
            db.operation = "ACQUIRE"
        );
        let mut conn = self
            .pool
            .acquire()
            .instrument(acquire_span)
            .await
            .context("Failed to acquire database connection")?;

        let ping_span = info_span!("db.ping", db.system = "postgresql", db.operation = "PING");
        conn.ping()
            .instrument(ping_span)
            .await
            .context("Failed to ping database")
    }
}
