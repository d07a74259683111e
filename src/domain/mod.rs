//! Domain types: the `Product` entity, its payload validation, and its storage mapping.

pub mod product;
pub mod schema;

pub use product::{Product, ProductPayload};
pub use schema::{ColumnSpec, ColumnType, TableSpec, PRODUCTS};
