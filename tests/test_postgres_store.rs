//! Postgres-backed store test. Runs only when `DATABASE_URL` points at a database;
//! otherwise it returns early.

use product_api::{Change, Config, PgProductStore, Product, ProductContext, ProductStore};
use std::sync::Arc;
use uuid::Uuid;

async fn connect() -> Result<Option<PgProductStore>, Box<dyn std::error::Error>> {
    let config = match Config::from_env() {
        Ok(c) => c,
        Err(_) => {
            println!("DATABASE_URL not set, skipping Postgres test");
            return Ok(None);
        }
    };
    let store = PgProductStore::connect(&config).await?;
    store.ensure_schema().await?;
    Ok(Some(store))
}

#[tokio::test]
async fn test_postgres_store_crud() -> Result<(), Box<dyn std::error::Error>> {
    let Some(store) = connect().await? else {
        return Ok(());
    };
    store.ping().await?;
    let columns: Vec<String> = sqlx::query_scalar(
        "SELECT column_name::text FROM information_schema.columns
         WHERE table_schema = current_schema() AND table_name = 'Products'
         ORDER BY ordinal_position",
    )
    .fetch_all(store.pool())
    .await?;
    assert_eq!(columns, vec!["Id".to_string(), "Name".to_string()]);
    // Running the DDL twice must be harmless.
    store.ensure_schema().await?;

    let product = Product {
        id: Uuid::new_v4(),
        name: "pg-widget".to_string(),
    };

    let inserted = store.apply(&[Change::Insert(product.clone())]).await?;
    assert_eq!(inserted, 1);
    assert_eq!(store.find(product.id).await?, Some(product.clone()));
    assert!(store.list().await?.contains(&product));

    let renamed = Product {
        id: product.id,
        name: "pg-widget-v2".to_string(),
    };
    assert_eq!(store.apply(&[Change::Update(renamed.clone())]).await?, 1);
    assert_eq!(store.find(product.id).await?, Some(renamed));

    assert_eq!(store.apply(&[Change::Delete(product.id)]).await?, 1);
    assert_eq!(store.find(product.id).await?, None);

    // Missing rows: zero affected, no error.
    assert_eq!(store.apply(&[Change::Delete(product.id)]).await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_postgres_commit_is_atomic() -> Result<(), Box<dyn std::error::Error>> {
    let Some(store) = connect().await? else {
        return Ok(());
    };
    let store = Arc::new(store);

    let existing = Product {
        id: Uuid::new_v4(),
        name: "pg-existing".to_string(),
    };
    store.apply(&[Change::Insert(existing.clone())]).await?;

    let fresh = Product {
        id: Uuid::new_v4(),
        name: "pg-fresh".to_string(),
    };
    let mut context = ProductContext::new(store.clone());
    context.add(fresh.clone());
    context.add(existing.clone());
    assert!(context.save_changes().await.is_err());
    assert_eq!(store.find(fresh.id).await?, None);

    // The database enforces the 200 character limit.
    let too_long = Product {
        id: Uuid::new_v4(),
        name: "x".repeat(201),
    };
    assert!(store.apply(&[Change::Insert(too_long)]).await.is_err());

    store.apply(&[Change::Delete(existing.id)]).await?;
    Ok(())
}
