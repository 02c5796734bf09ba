//! Infrastructure layer: configuration, database wiring, store backends.

pub mod config;
pub mod db;
pub mod error;
pub mod product_store;

pub use config::{ConfigError, DEFAULT_DATABASE_URI, DatabaseConfig};
pub use db::init_db;
pub use error::StoreError;
pub use product_store::{InMemoryProductStore, PostgresProductStore, ProductStore};
