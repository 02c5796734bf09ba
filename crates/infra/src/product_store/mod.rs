//! Product store backends.
//!
//! The in-memory store lives next to the `ProductStore` port in
//! `catalog-products`; this module adds the database-backed one.

pub mod postgres;

pub use catalog_products::{InMemoryProductStore, ProductStore};
pub use postgres::PostgresProductStore;
