//! Database initialization.

use crate::config::DatabaseConfig;
use crate::error::StoreError;
use crate::product_store::PostgresProductStore;

/// Connect to the configured database and make sure the product schema exists.
///
/// Returns the store handle the caller injects into repository operations and
/// closes at shutdown. Schema creation is idempotent, so calling this again
/// (e.g. once per test binary) is harmless.
pub fn init_db(config: &DatabaseConfig) -> Result<PostgresProductStore, StoreError> {
    let store = PostgresProductStore::connect(config)?;
    store.ensure_schema()?;
    tracing::info!(uri = %config.redacted_uri(), "product schema ready");
    Ok(store)
}
