//! Postgres-backed product store.
//!
//! Each call is a blocking round trip: the store owns a private current-thread
//! tokio runtime and drives every sqlx future to completion on it. Writes run
//! in their own transaction (begin → statement → commit); a failed statement
//! rolls back when the transaction is dropped.
//!
//! The blocking methods must not be called from inside another async runtime;
//! doing so returns [`StoreError::Runtime`] instead of panicking. Dropping the
//! store is safe anywhere: the private runtime is shut down in the background.

use std::future::Future;

use rust_decimal::Decimal;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use tokio::runtime::{Builder, Runtime};
use tracing::instrument;

use catalog_core::{DomainResult, ProductId};
use catalog_products::{Category, Product, ProductFilter, ProductStore};

use crate::config::DatabaseConfig;
use crate::error::{StoreError, map_sqlx_error};

const SELECT_COLUMNS: &str =
    "SELECT id, name, description, price, available, category::text AS category FROM products";

/// Postgres product store.
///
/// `Send + Sync`; the pool handles connection sharing, the runtime is entered
/// only through `block_on`.
#[derive(Debug)]
pub struct PostgresProductStore {
    pool: PgPool,
    // Always `Some` until `Drop` takes it.
    runtime: Option<Runtime>,
}

impl PostgresProductStore {
    /// Build a runtime and connect a pool according to `config`.
    #[instrument(skip(config), fields(uri = %config.redacted_uri()), err)]
    pub fn connect(config: &DatabaseConfig) -> Result<Self, StoreError> {
        ensure_outside_runtime()?;
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| StoreError::Runtime(format!("failed to build runtime: {e}")))?;

        let options = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout);
        let pool = runtime
            .block_on(options.connect(&config.uri))
            .map_err(|e| map_sqlx_error("connect", e))?;

        tracing::info!(uri = %config.redacted_uri(), "connected to database");
        Ok(Self {
            pool,
            runtime: Some(runtime),
        })
    }

    fn block_on<F: Future>(&self, fut: F) -> Result<F::Output, StoreError> {
        ensure_outside_runtime()?;
        let runtime = self
            .runtime
            .as_ref()
            .ok_or_else(|| StoreError::Runtime("store runtime already shut down".to_string()))?;
        Ok(runtime.block_on(fut))
    }

    /// Create the `product_category` type and the `products` table if they do
    /// not exist yet. Safe to run repeatedly.
    #[instrument(skip(self), fields(operation = "ensure_schema"), err)]
    pub fn ensure_schema(&self) -> Result<(), StoreError> {
        self.block_on(async {
            let mut tx = self
                .pool
                .begin()
                .await
                .map_err(|e| map_sqlx_error("begin_transaction", e))?;

            sqlx::query(
                r#"
                DO $$
                BEGIN
                    CREATE TYPE product_category AS ENUM (
                        'UNKNOWN', 'CLOTHS', 'FOOD', 'HOUSEWARES', 'AUTOMOTIVE', 'TOOLS'
                    );
                EXCEPTION
                    WHEN duplicate_object THEN NULL;
                END
                $$
                "#,
            )
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("create_category_type", e))?;

            sqlx::query(
                r#"
                CREATE TABLE IF NOT EXISTS products (
                    id          BIGSERIAL PRIMARY KEY,
                    name        VARCHAR(100) NOT NULL,
                    description VARCHAR(250) NOT NULL,
                    price       NUMERIC(10, 2) NOT NULL,
                    available   BOOLEAN NOT NULL DEFAULT TRUE,
                    category    product_category NOT NULL DEFAULT 'UNKNOWN'
                )
                "#,
            )
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("create_products_table", e))?;

            tx.commit()
                .await
                .map_err(|e| map_sqlx_error("commit_transaction", e))
        })?
    }

    #[instrument(skip(self, product), fields(operation = "insert_product", name = %product.name), err)]
    pub fn insert_product(&self, product: &Product) -> Result<ProductId, StoreError> {
        self.block_on(async {
            let mut tx = self
                .pool
                .begin()
                .await
                .map_err(|e| map_sqlx_error("begin_transaction", e))?;

            let id: i64 = sqlx::query_scalar(
                r#"
                INSERT INTO products (name, description, price, available, category)
                VALUES ($1, $2, $3, $4, $5::product_category)
                RETURNING id
                "#,
            )
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(product.available)
            .bind(product.category.as_str())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("insert_product", e))?;

            tx.commit()
                .await
                .map_err(|e| map_sqlx_error("commit_transaction", e))?;

            Ok::<_, StoreError>(ProductId::from_i64(id))
        })?
    }

    #[instrument(skip(self, product), fields(operation = "update_product", %id), err)]
    pub fn update_product(&self, id: ProductId, product: &Product) -> Result<(), StoreError> {
        self.block_on(async {
            let mut tx = self
                .pool
                .begin()
                .await
                .map_err(|e| map_sqlx_error("begin_transaction", e))?;

            let result = sqlx::query(
                r#"
                UPDATE products
                SET name = $2,
                    description = $3,
                    price = $4,
                    available = $5,
                    category = $6::product_category
                WHERE id = $1
                "#,
            )
            .bind(id.as_i64())
            .bind(&product.name)
            .bind(&product.description)
            .bind(product.price)
            .bind(product.available)
            .bind(product.category.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("update_product", e))?;

            if result.rows_affected() == 0 {
                tx.rollback()
                    .await
                    .map_err(|e| map_sqlx_error("rollback", e))?;
                return Err(StoreError::NotFound(format!("product {id}")));
            }

            tx.commit()
                .await
                .map_err(|e| map_sqlx_error("commit_transaction", e))
        })?
    }

    #[instrument(skip(self), fields(operation = "delete_product", %id), err)]
    pub fn delete_product(&self, id: ProductId) -> Result<(), StoreError> {
        self.block_on(async {
            let mut tx = self
                .pool
                .begin()
                .await
                .map_err(|e| map_sqlx_error("begin_transaction", e))?;

            sqlx::query("DELETE FROM products WHERE id = $1")
                .bind(id.as_i64())
                .execute(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("delete_product", e))?;

            tx.commit()
                .await
                .map_err(|e| map_sqlx_error("commit_transaction", e))
        })?
    }

    #[instrument(skip(self), fields(operation = "get_product", %id), err)]
    pub fn get_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        self.block_on(async {
            let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = $1"))
                .bind(id.as_i64())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("get_product", e))?;

            row.as_ref().map(product_from_row).transpose()
        })?
    }

    #[instrument(skip(self), fields(operation = "list_products", row_count = tracing::field::Empty), err)]
    pub fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, StoreError> {
        let products = self.block_on(async {
            let mut builder = QueryBuilder::<Postgres>::new(SELECT_COLUMNS);
            push_filter(&mut builder, filter);
            builder.push(" ORDER BY id");

            let rows = builder
                .build()
                .fetch_all(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("list_products", e))?;

            rows.iter().map(product_from_row).collect::<Result<Vec<_>, _>>()
        })??;

        tracing::Span::current().record("row_count", products.len());
        Ok(products)
    }

    #[instrument(skip(self), fields(operation = "count_products"), err)]
    pub fn count_products(&self, filter: &ProductFilter) -> Result<usize, StoreError> {
        self.block_on(async {
            let mut builder = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM products");
            push_filter(&mut builder, filter);

            let count: i64 = builder
                .build_query_scalar::<i64>()
                .fetch_one(&self.pool)
                .await
                .map_err(|e| map_sqlx_error("count_products", e))?;

            usize::try_from(count).map_err(|e| StoreError::Decode {
                operation: "count_products",
                message: e.to_string(),
            })
        })?
    }

    #[instrument(skip(self), fields(operation = "delete_all_products"), err)]
    pub fn delete_all_products(&self) -> Result<u64, StoreError> {
        self.block_on(async {
            let mut tx = self
                .pool
                .begin()
                .await
                .map_err(|e| map_sqlx_error("begin_transaction", e))?;

            let result = sqlx::query("DELETE FROM products")
                .execute(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("delete_all_products", e))?;

            tx.commit()
                .await
                .map_err(|e| map_sqlx_error("commit_transaction", e))?;

            Ok::<_, StoreError>(result.rows_affected())
        })?
    }

    /// Close every pooled connection. Further calls fail with a connection
    /// error.
    pub fn close(&self) -> Result<(), StoreError> {
        self.block_on(self.pool.close())?;
        tracing::info!("database pool closed");
        Ok(())
    }
}

impl Drop for PostgresProductStore {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

impl ProductStore for PostgresProductStore {
    fn insert(&self, product: &Product) -> DomainResult<ProductId> {
        Ok(self.insert_product(product)?)
    }

    fn update(&self, id: ProductId, product: &Product) -> DomainResult<()> {
        Ok(self.update_product(id, product)?)
    }

    fn delete(&self, id: ProductId) -> DomainResult<()> {
        Ok(self.delete_product(id)?)
    }

    fn get(&self, id: ProductId) -> DomainResult<Option<Product>> {
        Ok(self.get_product(id)?)
    }

    fn list(&self, filter: &ProductFilter) -> DomainResult<Vec<Product>> {
        Ok(self.list_products(filter)?)
    }

    fn count(&self, filter: &ProductFilter) -> DomainResult<usize> {
        Ok(self.count_products(filter)?)
    }

    fn delete_all(&self) -> DomainResult<u64> {
        Ok(self.delete_all_products()?)
    }
}

fn ensure_outside_runtime() -> Result<(), StoreError> {
    if tokio::runtime::Handle::try_current().is_ok() {
        return Err(StoreError::Runtime(
            "blocking store call made from inside an async runtime".to_string(),
        ));
    }
    Ok(())
}

fn push_filter(builder: &mut QueryBuilder<'_, Postgres>, filter: &ProductFilter) {
    match filter {
        ProductFilter::All => {}
        ProductFilter::Name(name) => {
            builder.push(" WHERE name = ").push_bind(name.clone());
        }
        ProductFilter::Available(available) => {
            builder.push(" WHERE available = ").push_bind(*available);
        }
        ProductFilter::Category(category) => {
            builder
                .push(" WHERE category = ")
                .push_bind(category.as_str())
                .push("::product_category");
        }
        ProductFilter::Price(price) => {
            builder.push(" WHERE price = ").push_bind(*price);
        }
    }
}

fn product_from_row(row: &PgRow) -> Result<Product, StoreError> {
    let decode = |e: sqlx::Error| map_sqlx_error("decode_product", e);

    let id: i64 = row.try_get("id").map_err(decode)?;
    let name: String = row.try_get("name").map_err(decode)?;
    let description: String = row.try_get("description").map_err(decode)?;
    let price: Decimal = row.try_get("price").map_err(decode)?;
    let available: bool = row.try_get("available").map_err(decode)?;
    let category: String = row.try_get("category").map_err(decode)?;
    let category = category.parse::<Category>().map_err(|e| StoreError::Decode {
        operation: "decode_product",
        message: e.to_string(),
    })?;

    Ok(Product::new(name, description, price, available, category).with_id(ProductId::from_i64(id)))
}
