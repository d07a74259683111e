pub mod app;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::ProductContext;
pub use domain::{Product, ProductPayload};
pub use infra::config::Config;
pub use storage::{Change, InMemoryProductStore, PgProductStore, ProductStore};
