//! The per-request persistence context.
//!
//! A `ProductContext` is created for every request. It:
//! 1.  Reads products from the shared `ProductStore`.
//! 2.  Tracks the entities it has loaded or added (an identity map keyed by id).
//! 3.  Stages inserts, updates and deletes until `save_changes` flushes them in
//!     one transaction and reports the affected-row count.

use crate::domain::Product;
use crate::storage::{Change, ProductStore};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

pub struct ProductContext {
    store: Arc<dyn ProductStore>,
    tracked: HashMap<Uuid, Product>,
    pending: Vec<Change>,
}

impl ProductContext {
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self {
            store,
            tracked: HashMap::new(),
            pending: Vec::new(),
        }
    }

    /// Returns every committed product. Staged changes are not included.
    pub async fn list(&self) -> anyhow::Result<Vec<Product>> {
        self.store.list().await
    }

    /// Looks the product up in the identity map first, then in the store.
    /// A product loaded from the store becomes tracked.
    pub async fn find(&mut self, id: Uuid) -> anyhow::Result<Option<Product>> {
        if let Some(p) = self.tracked.get(&id) {
            return Ok(Some(p.clone()));
        }
        let found = self.store.find(id).await?;
        if let Some(p) = &found {
            self.tracked.insert(id, p.clone());
        }
        Ok(found)
    }

    /// Store lookup that leaves the identity map alone.
    pub async fn find_untracked(&self, id: Uuid) -> anyhow::Result<Option<Product>> {
        self.store.find(id).await
    }

    pub fn add(&mut self, product: Product) {
        self.tracked.insert(product.id, product.clone());
        self.pending.push(Change::Insert(product));
    }

    /// Stages a full replacement of the row with `product.id`.
    pub fn update(&mut self, product: Product) {
        self.tracked.insert(product.id, product.clone());
        self.pending.push(Change::Update(product));
    }

    /// Stages a delete. Removing an entity that was added in this context and
    /// not saved yet just cancels the insert.
    pub fn remove(&mut self, product: &Product) {
        self.tracked.remove(&product.id);
        let staged_insert = self
            .pending
            .iter()
            .position(|c| matches!(c, Change::Insert(p) if p.id == product.id));
        match staged_insert {
            Some(idx) => {
                self.pending.remove(idx);
                self.pending.retain(|c| c.key() != product.id);
            }
            None => self.pending.push(Change::Delete(product.id)),
        }
    }

    pub fn has_changes(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Flushes every staged change in one transaction and returns the number of
    /// affected rows. Staged changes are kept if the store fails.
    pub async fn save_changes(&mut self) -> anyhow::Result<u64> {
        if self.pending.is_empty() {
            return Ok(0);
        }
        let affected = self.store.apply(&self.pending).await?;
        self.pending.clear();
        Ok(affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemoryProductStore;

    fn product(name: &str) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
        }
    }

    fn context() -> (Arc<InMemoryProductStore>, ProductContext) {
        let store = Arc::new(InMemoryProductStore::new());
        let ctx = ProductContext::new(store.clone());
        (store, ctx)
    }

    #[tokio::test]
    async fn added_products_are_invisible_until_saved() {
        let (store, mut ctx) = context();
        let p = product("Widget");
        ctx.add(p.clone());

        assert!(ctx.has_changes());
        assert!(ctx.list().await.unwrap().is_empty());
        assert_eq!(ProductContext::new(store.clone()).find(p.id).await.unwrap(), None);
        // The adding context sees its own entity through the identity map.
        assert_eq!(ctx.find(p.id).await.unwrap(), Some(p.clone()));

        assert_eq!(ctx.save_changes().await.unwrap(), 1);
        assert!(!ctx.has_changes());
        assert_eq!(store.find(p.id).await.unwrap(), Some(p));
    }

    #[tokio::test]
    async fn save_without_changes_reports_zero() {
        let (_store, mut ctx) = context();
        assert_eq!(ctx.save_changes().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn update_and_remove_flush_together() {
        let (store, mut ctx) = context();
        let a = product("a");
        let b = product("b");
        ctx.add(a.clone());
        ctx.add(b.clone());
        ctx.save_changes().await.unwrap();

        let mut ctx = ProductContext::new(store.clone());
        let loaded = ctx.find(b.id).await.unwrap().unwrap();
        ctx.update(Product { id: a.id, name: "a2".into() });
        ctx.remove(&loaded);
        assert_eq!(ctx.save_changes().await.unwrap(), 2);

        let rows = store.list().await.unwrap();
        assert_eq!(rows, vec![Product { id: a.id, name: "a2".into() }]);
    }

    #[tokio::test]
    async fn removing_an_unsaved_insert_cancels_it() {
        let (store, mut ctx) = context();
        let p = product("temp");
        ctx.add(p.clone());
        ctx.remove(&p);

        assert!(!ctx.has_changes());
        assert_eq!(ctx.save_changes().await.unwrap(), 0);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn untracked_lookup_does_not_populate_identity_map() {
        let (store, mut ctx) = context();
        let p = product("Widget");
        store.apply(&[Change::Insert(p.clone())]).await.unwrap();

        assert_eq!(ctx.find_untracked(p.id).await.unwrap(), Some(p.clone()));
        assert!(ctx.tracked.is_empty());

        assert_eq!(ctx.find(p.id).await.unwrap(), Some(p.clone()));
        assert!(ctx.tracked.contains_key(&p.id));
    }

    #[tokio::test]
    async fn failed_save_keeps_staged_changes() {
        let (store, mut ctx) = context();
        let p = product("dup");
        store.apply(&[Change::Insert(p.clone())]).await.unwrap();

        ctx.add(p);
        assert!(ctx.save_changes().await.is_err());
        assert!(ctx.has_changes());
    }
}
