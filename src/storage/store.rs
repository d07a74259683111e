//! The storage contract behind the persistence context.

use crate::domain::Product;
use async_trait::async_trait;
use uuid::Uuid;

/// A staged write, flushed by `ProductStore::apply`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Insert(Product),
    /// Full replacement of the row keyed by `product.id`.
    Update(Product),
    Delete(Uuid),
}

impl Change {
    pub fn key(&self) -> Uuid {
        match self {
            Change::Insert(p) | Change::Update(p) => p.id,
            Change::Delete(id) => *id,
        }
    }
}

/// Trait that defines the contract for any backing store of the `Products` table.
///
/// Implementations must be safe to share between concurrent requests.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Creates the `Products` table if it does not exist yet.
    async fn ensure_schema(&self) -> anyhow::Result<()>;

    /// Cheap connectivity check used by `/health`.
    async fn ping(&self) -> anyhow::Result<()>;

    /// Returns every stored product. Order is unspecified.
    async fn list(&self) -> anyhow::Result<Vec<Product>>;

    async fn find(&self, id: Uuid) -> anyhow::Result<Option<Product>>;

    /// Applies `changes` in order inside one transaction and returns the number of
    /// affected rows.
    ///
    /// Updates and deletes of missing rows affect 0 rows and are not errors. If any
    /// change fails, none of them is applied.
    async fn apply(&self, changes: &[Change]) -> anyhow::Result<u64>;
}
