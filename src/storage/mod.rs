pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::InMemoryProductStore;
pub use postgres::PgProductStore;
pub use store::{Change, ProductStore};
