pub mod product_context;

pub use product_context::ProductContext;
