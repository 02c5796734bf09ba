//! Persistence port for products.
//!
//! `Product` repository operations talk to storage only through
//! [`ProductStore`]; callers inject a concrete store (in-memory for tests/dev,
//! Postgres in `catalog-infra`) and control its lifecycle.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use rust_decimal::Decimal;

use catalog_core::{DomainError, DomainResult, ProductId};

use crate::category::Category;
use crate::product::Product;

/// Exact-match predicate over product rows.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductFilter {
    All,
    Name(String),
    Available(bool),
    Category(Category),
    Price(Decimal),
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        match self {
            ProductFilter::All => true,
            ProductFilter::Name(name) => product.name == *name,
            ProductFilter::Available(available) => product.available == *available,
            ProductFilter::Category(category) => product.category == *category,
            ProductFilter::Price(price) => product.price == *price,
        }
    }
}

/// Product row storage.
///
/// Each call is one round trip; writes are committed before returning.
/// Implementations must:
/// - assign a fresh, never-reused id on `insert`, ignoring `product.id()`
/// - return rows ordered by id from `list`
/// - report an `update` of a missing row as [`DomainError::NotFound`]
pub trait ProductStore: Send + Sync {
    /// Insert a new row and return its assigned id.
    fn insert(&self, product: &Product) -> DomainResult<ProductId>;

    /// Overwrite every column of the row `id` with the values of `product`.
    fn update(&self, id: ProductId, product: &Product) -> DomainResult<()>;

    /// Remove the row `id`. Removing a missing row is not an error.
    fn delete(&self, id: ProductId) -> DomainResult<()>;

    /// Primary key lookup.
    fn get(&self, id: ProductId) -> DomainResult<Option<Product>>;

    /// All rows matching `filter`, ordered by id.
    fn list(&self, filter: &ProductFilter) -> DomainResult<Vec<Product>>;

    /// Number of rows matching `filter`.
    fn count(&self, filter: &ProductFilter) -> DomainResult<usize>;

    /// Remove every row (test setup / rebuild support). Returns rows removed.
    fn delete_all(&self) -> DomainResult<u64>;
}

impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    fn insert(&self, product: &Product) -> DomainResult<ProductId> {
        (**self).insert(product)
    }

    fn update(&self, id: ProductId, product: &Product) -> DomainResult<()> {
        (**self).update(id, product)
    }

    fn delete(&self, id: ProductId) -> DomainResult<()> {
        (**self).delete(id)
    }

    fn get(&self, id: ProductId) -> DomainResult<Option<Product>> {
        (**self).get(id)
    }

    fn list(&self, filter: &ProductFilter) -> DomainResult<Vec<Product>> {
        (**self).list(filter)
    }

    fn count(&self, filter: &ProductFilter) -> DomainResult<usize> {
        (**self).count(filter)
    }

    fn delete_all(&self) -> DomainResult<u64> {
        (**self).delete_all()
    }
}

#[derive(Debug, Default)]
struct Rows {
    next_id: i64,
    by_id: BTreeMap<ProductId, Product>,
}

/// In-memory product store for tests/dev.
///
/// Ids come from a monotonically increasing counter, like a database
/// sequence: they are never reused, not even after `delete_all`.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    inner: RwLock<Rows>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    fn read(&self) -> DomainResult<std::sync::RwLockReadGuard<'_, Rows>> {
        self.inner
            .read()
            .map_err(|_| DomainError::store("in-memory product store lock poisoned"))
    }

    fn write(&self) -> DomainResult<std::sync::RwLockWriteGuard<'_, Rows>> {
        self.inner
            .write()
            .map_err(|_| DomainError::store("in-memory product store lock poisoned"))
    }
}

impl ProductStore for InMemoryProductStore {
    fn insert(&self, product: &Product) -> DomainResult<ProductId> {
        let mut rows = self.write()?;
        rows.next_id += 1;
        let id = ProductId::from_i64(rows.next_id);
        rows.by_id.insert(id, product.clone().with_id(id));
        Ok(id)
    }

    fn update(&self, id: ProductId, product: &Product) -> DomainResult<()> {
        let mut rows = self.write()?;
        match rows.by_id.get_mut(&id) {
            Some(row) => {
                *row = product.clone().with_id(id);
                Ok(())
            }
            None => Err(DomainError::not_found(format!("product {id}"))),
        }
    }

    fn delete(&self, id: ProductId) -> DomainResult<()> {
        self.write()?.by_id.remove(&id);
        Ok(())
    }

    fn get(&self, id: ProductId) -> DomainResult<Option<Product>> {
        Ok(self.read()?.by_id.get(&id).cloned())
    }

    fn list(&self, filter: &ProductFilter) -> DomainResult<Vec<Product>> {
        Ok(self
            .read()?
            .by_id
            .values()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect())
    }

    fn count(&self, filter: &ProductFilter) -> DomainResult<usize> {
        Ok(self.read()?.by_id.values().filter(|p| filter.matches(p)).count())
    }

    fn delete_all(&self) -> DomainResult<u64> {
        let mut rows = self.write()?;
        let removed = rows.by_id.len() as u64;
        rows.by_id.clear();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn hat() -> Product {
        Product::new("Fedora", "A red hat", dec!(12.50), true, Category::Cloths)
    }

    #[test]
    fn insert_assigns_sequential_ids_and_ignores_preset_id() {
        let store = InMemoryProductStore::new();
        let a = store.insert(&hat()).unwrap();
        let b = store.insert(&hat().with_id(ProductId::from_i64(99))).unwrap();
        assert_eq!(a.as_i64(), 1);
        assert_eq!(b.as_i64(), 2);
        assert!(store.get(ProductId::from_i64(99)).unwrap().is_none());
    }

    #[test]
    fn ids_are_not_reused_after_delete_all() {
        let store = InMemoryProductStore::new();
        store.insert(&hat()).unwrap();
        assert_eq!(store.delete_all().unwrap(), 1);
        let id = store.insert(&hat()).unwrap();
        assert_eq!(id.as_i64(), 2);
    }

    #[test]
    fn update_of_missing_row_is_not_found() {
        let store = InMemoryProductStore::new();
        let err = store.update(ProductId::from_i64(5), &hat()).unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[test]
    fn list_is_ordered_by_id_and_filtered() {
        let store = InMemoryProductStore::new();
        let mut bread = hat();
        bread.name = "Bread".to_string();
        bread.category = Category::Food;
        store.insert(&hat()).unwrap();
        store.insert(&bread).unwrap();
        store.insert(&hat()).unwrap();

        let all = store.list(&ProductFilter::All).unwrap();
        let ids: Vec<i64> = all.iter().filter_map(|p| p.id()).map(|id| id.as_i64()).collect();
        assert_eq!(ids, vec![1, 2, 3]);

        let food = store.list(&ProductFilter::Category(Category::Food)).unwrap();
        assert_eq!(food.len(), 1);
        assert_eq!(food[0].name, "Bread");
        assert_eq!(store.count(&ProductFilter::Name("Fedora".into())).unwrap(), 2);
    }

    #[test]
    fn deleting_missing_row_is_a_no_op() {
        let store = InMemoryProductStore::new();
        assert!(store.delete(ProductId::from_i64(1)).is_ok());
    }
}
