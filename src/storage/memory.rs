//! In-process `ProductStore` used by tests and local runs without Postgres.

use crate::domain::{schema, Product};
use crate::storage::store::{Change, ProductStore};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct InMemoryProductStore {
    rows: RwLock<HashMap<Uuid, Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn ensure_schema(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn list(&self) -> anyhow::Result<Vec<Product>> {
        Ok(self.rows.read().await.values().cloned().collect())
    }

    async fn find(&self, id: Uuid) -> anyhow::Result<Option<Product>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn apply(&self, changes: &[Change]) -> anyhow::Result<u64> {
        let mut rows = self.rows.write().await;
        // Work on a copy so a failing change leaves the table untouched.
        let mut next = rows.clone();
        let mut affected: u64 = 0;

        for change in changes {
            match change {
                Change::Insert(p) => {
                    schema::enforce(p)?;
                    if next.contains_key(&p.id) {
                        return Err(anyhow::anyhow!(
                            "duplicate key value violates unique constraint \"PK_Products\": Id={}",
                            p.id
                        ));
                    }
                    next.insert(p.id, p.clone());
                    affected += 1;
                }
                Change::Update(p) => {
                    schema::enforce(p)?;
                    if let Some(row) = next.get_mut(&p.id) {
                        *row = p.clone();
                        affected += 1;
                    }
                }
                Change::Delete(id) => {
                    if next.remove(id).is_some() {
                        affected += 1;
                    }
                }
            }
        }

        *rows = next;
        Ok(affected)
    }
}
