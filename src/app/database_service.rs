//! Database access for the back office.
//!
//! Owns the connection pool and is responsible for:
//! 1.  Connecting to PostgreSQL with the configured pool size.
//! 2.  Bootstrapping the seller schema and its lookup rows.
//! 3.  Answering liveness pings for the health endpoint.

use crate::app::seller_store::SellerStore;
use crate::infra::config;
use crate::storage::schema;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

pub struct DatabaseService {
    pool: PgPool,
}

impl DatabaseService {
    /// Connects using `DATABASE_URL` and `DB_MAX_CONNECTIONS`.
    pub async fn new() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        let database_url = config::database_url()?;
        Self::connect(&database_url, config::max_connections()).await
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        tracing::debug!(max_connections, "Connected to PostgreSQL");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Creates missing tables and seeds lookup rows.
    pub async fn apply_schema(&self) -> anyhow::Result<()> {
        schema::apply(&self.pool).await
    }

    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    pub fn seller_store(&self) -> SellerStore {
        SellerStore::new(self.pool.clone())
    }
}
