use catalog_core::DomainResult;

use crate::product::Product;
use crate::store::{ProductFilter, ProductStore};

/// Lazy, re-iterable result of a finder.
///
/// Nothing is read from the store until `count`, `fetch`, `first` or `iter`
/// is called, and every call re-executes the query, so a `ProductQuery` always
/// reflects the current contents of the store.
pub struct ProductQuery<'s, S: ?Sized> {
    store: &'s S,
    filter: ProductFilter,
}

impl<'s, S> ProductQuery<'s, S>
where
    S: ProductStore + ?Sized,
{
    pub fn new(store: &'s S, filter: ProductFilter) -> Self {
        Self { store, filter }
    }

    pub fn filter(&self) -> &ProductFilter {
        &self.filter
    }

    pub fn count(&self) -> DomainResult<usize> {
        self.store.count(&self.filter)
    }

    pub fn fetch(&self) -> DomainResult<Vec<Product>> {
        self.store.list(&self.filter)
    }

    pub fn iter(&self) -> DomainResult<std::vec::IntoIter<Product>> {
        Ok(self.fetch()?.into_iter())
    }

    pub fn first(&self) -> DomainResult<Option<Product>> {
        Ok(self.fetch()?.into_iter().next())
    }

    pub fn is_empty(&self) -> DomainResult<bool> {
        Ok(self.count()? == 0)
    }
}

impl<S: ?Sized> core::fmt::Debug for ProductQuery<'_, S> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ProductQuery").field("filter", &self.filter).finish()
    }
}
