//! `ProductStore` implementation using PostgreSQL.

use crate::domain::schema::PRODUCTS;
use crate::domain::Product;
use crate::infra::config::Config;
use crate::storage::store::{Change, ProductStore};
use anyhow::Context;
use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// A product store that uses a PostgreSQL connection pool.
#[derive(Clone)]
pub struct PgProductStore {
    pool: PgPool,
}

fn product_from_row(row: &PgRow) -> anyhow::Result<Product> {
    Ok(Product {
        id: row.try_get("Id")?,
        name: row.try_get("Name")?,
    })
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool against `config.database_url`.
    pub async fn connect(config: &Config) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await
            .context("Failed to connect to the database")?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn ensure_schema(&self) -> anyhow::Result<()> {
        sqlx::query(&PRODUCTS.create_table_sql())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list(&self) -> anyhow::Result<Vec<Product>> {
        let rows = sqlx::query(&PRODUCTS.select_all_sql())
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(product_from_row).collect()
    }

    async fn find(&self, id: Uuid) -> anyhow::Result<Option<Product>> {
        let row = sqlx::query(&PRODUCTS.select_by_key_sql())
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(product_from_row).transpose()
    }

    async fn apply(&self, changes: &[Change]) -> anyhow::Result<u64> {
        if changes.is_empty() {
            return Ok(0);
        }

        let insert_sql = PRODUCTS.insert_sql();
        let update_sql = PRODUCTS.update_by_key_sql();
        let delete_sql = PRODUCTS.delete_by_key_sql();

        // Dropping the transaction on an early return rolls it back.
        let mut tx = self.pool.begin().await?;
        let mut affected: u64 = 0;

        for change in changes {
            let result = match change {
                Change::Insert(p) => {
                    sqlx::query(&insert_sql)
                        .bind(p.id)
                        .bind(&p.name)
                        .execute(&mut *tx)
                        .await
                }
                Change::Update(p) => {
                    sqlx::query(&update_sql)
                        .bind(p.id)
                        .bind(&p.name)
                        .execute(&mut *tx)
                        .await
                }
                Change::Delete(id) => sqlx::query(&delete_sql).bind(*id).execute(&mut *tx).await,
            }
            .with_context(|| format!("Failed to apply change for product {}", change.key()))?;
            affected += result.rows_affected();
        }

        tx.commit().await?;
        Ok(affected)
    }
}
