use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue, json};

use catalog_core::{DomainError, DomainResult, Entity, ProductId};

use crate::category::Category;
use crate::price::{PRICE_SCALE, check_price, json_type_name, price_from_value};
use crate::query::ProductQuery;
use crate::store::{ProductFilter, ProductStore};

/// Maximum length of `name`, in characters.
pub const NAME_MAX_LEN: usize = 100;

/// Maximum length of `description`, in characters.
pub const DESCRIPTION_MAX_LEN: usize = 250;

fn default_available() -> bool {
    true
}

/// Catalog product.
///
/// A product is *transient* until [`Product::create`] stores it and assigns an
/// id, and *persisted* afterwards. [`Product::delete`] removes the row but
/// leaves the (now stale) id in place.
///
/// The id is store-assigned and cannot be set directly; every other field may
/// be changed at any time and is written back with [`Product::update`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    id: Option<ProductId>,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Decimal,
    #[serde(default = "default_available")]
    pub available: bool,
    #[serde(default)]
    pub category: Category,
}

impl Default for Product {
    fn default() -> Self {
        Self {
            id: None,
            name: String::new(),
            description: String::new(),
            price: Decimal::ZERO,
            available: default_available(),
            category: Category::default(),
        }
    }
}

impl Product {
    /// Build a transient product.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        available: bool,
        category: Category,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: description.into(),
            price,
            available,
            category,
        }
    }

    pub fn id(&self) -> Option<ProductId> {
        self.id
    }

    /// Attach a store-assigned id. Used by store implementations when mapping
    /// rows back into products.
    pub fn with_id(mut self, id: ProductId) -> Self {
        self.id = Some(id);
        self
    }

    /// Check field values against the column constraints.
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if self.name.chars().count() > NAME_MAX_LEN {
            return Err(DomainError::validation(format!(
                "name exceeds {NAME_MAX_LEN} characters"
            )));
        }
        if self.description.chars().count() > DESCRIPTION_MAX_LEN {
            return Err(DomainError::validation(format!(
                "description exceeds {DESCRIPTION_MAX_LEN} characters"
            )));
        }
        check_price(self.price)
    }

    /// Insert this product as a new row and record the assigned id.
    ///
    /// Any id already present is ignored; the store always assigns a fresh one.
    /// The price is rescaled to two decimal places, as the column stores it.
    pub fn create<S>(&mut self, store: &S) -> DomainResult<()>
    where
        S: ProductStore + ?Sized,
    {
        tracing::info!(name = %self.name, "Creating {}", self.name);
        self.validate()?;
        self.price.rescale(PRICE_SCALE);
        let id = store.insert(self)?;
        self.id = Some(id);
        Ok(())
    }

    /// Write the current field values to the row identified by `id`.
    pub fn update<S>(&self, store: &S) -> DomainResult<()>
    where
        S: ProductStore + ?Sized,
    {
        tracing::info!(name = %self.name, "Saving {}", self.name);
        let Some(id) = self.id else {
            return Err(DomainError::validation("Update called with empty ID field"));
        };
        self.validate()?;
        if self.price.scale() == PRICE_SCALE {
            return store.update(id, self);
        }
        let mut row = self.clone();
        row.price.rescale(PRICE_SCALE);
        store.update(id, &row)
    }

    /// Remove this product's row. A transient product has no row; deleting it
    /// does nothing.
    pub fn delete<S>(&self, store: &S) -> DomainResult<()>
    where
        S: ProductStore + ?Sized,
    {
        tracing::info!(name = %self.name, "Deleting {}", self.name);
        match self.id {
            Some(id) => store.delete(id),
            None => Ok(()),
        }
    }

    /// Every stored product, ordered by id.
    pub fn all<S>(store: &S) -> DomainResult<Vec<Product>>
    where
        S: ProductStore + ?Sized,
    {
        tracing::info!("Processing all Products");
        store.list(&ProductFilter::All)
    }

    pub fn find<S>(store: &S, id: ProductId) -> DomainResult<Option<Product>>
    where
        S: ProductStore + ?Sized,
    {
        tracing::info!(%id, "Processing lookup for id {id} ...");
        store.get(id)
    }

    pub fn find_by_name<'s, S>(store: &'s S, name: &str) -> ProductQuery<'s, S>
    where
        S: ProductStore + ?Sized,
    {
        tracing::info!(name, "Processing name query for {name} ...");
        ProductQuery::new(store, ProductFilter::Name(name.to_string()))
    }

    pub fn find_by_availability<S>(store: &S, available: bool) -> ProductQuery<'_, S>
    where
        S: ProductStore + ?Sized,
    {
        tracing::info!(available, "Processing available query for {available} ...");
        ProductQuery::new(store, ProductFilter::Available(available))
    }

    pub fn find_by_category<S>(store: &S, category: Category) -> ProductQuery<'_, S>
    where
        S: ProductStore + ?Sized,
    {
        tracing::info!(%category, "Processing category query for {category} ...");
        ProductQuery::new(store, ProductFilter::Category(category))
    }

    pub fn find_by_price<S>(store: &S, price: Decimal) -> ProductQuery<'_, S>
    where
        S: ProductStore + ?Sized,
    {
        tracing::info!(%price, "Processing price query for {price} ...");
        ProductQuery::new(store, ProductFilter::Price(price))
    }

    /// Price finder for loosely-typed input (query strings, JSON bodies).
    ///
    /// Numbers and numeric strings are accepted; lists, objects, booleans and
    /// null are rejected with [`DomainError::TypeMismatch`] without querying.
    pub fn find_by_price_value<'s, S>(
        store: &'s S,
        price: &JsonValue,
    ) -> DomainResult<ProductQuery<'s, S>>
    where
        S: ProductStore + ?Sized,
    {
        let price = price_from_value(price)?;
        Ok(Self::find_by_price(store, price))
    }

    /// Serialize into a JSON object keyed by field name.
    pub fn to_dict(&self) -> JsonValue {
        json!({
            "id": self.id.map(|id| id.as_i64()),
            "name": self.name,
            "description": self.description,
            "price": self.price.to_string(),
            "available": self.available,
            "category": self.category.as_str(),
        })
    }

    /// Build a transient product from a JSON object produced by [`to_dict`]
    /// (or an equivalent request body). Any `id` key is ignored.
    ///
    /// [`to_dict`]: Product::to_dict
    pub fn from_dict(data: &JsonValue) -> DomainResult<Product> {
        let Some(fields) = data.as_object() else {
            return Err(bad_data(format!("expected dict, got {}", json_type_name(data))));
        };

        let name = string_field(fields, "name")?;
        let description = string_field(fields, "description")?;
        let price = price_from_value(required(fields, "price")?).map_err(|e| match e {
            DomainError::TypeMismatch(msg) => bad_data(msg),
            other => other,
        })?;
        let available = match required(fields, "available")? {
            JsonValue::Bool(b) => *b,
            other => {
                return Err(DomainError::validation(format!(
                    "Invalid type for boolean [available]: {}",
                    json_type_name(other)
                )));
            }
        };
        let category = match required(fields, "category")? {
            JsonValue::String(s) => s.parse::<Category>()?,
            other => return Err(bad_data(format!("category must be a string, got {}", json_type_name(other)))),
        };

        Ok(Product::new(name, description, price, available, category))
    }
}

fn required<'a>(fields: &'a Map<String, JsonValue>, key: &str) -> DomainResult<&'a JsonValue> {
    fields
        .get(key)
        .ok_or_else(|| DomainError::validation(format!("Invalid product: missing {key}")))
}

fn string_field(fields: &Map<String, JsonValue>, key: &str) -> DomainResult<String> {
    match required(fields, key)? {
        JsonValue::String(s) => Ok(s.clone()),
        other => Err(bad_data(format!("{key} must be a string, got {}", json_type_name(other)))),
    }
}

fn bad_data(detail: String) -> DomainError {
    DomainError::validation(format!(
        "Invalid product: body of request contained bad or no data: {detail}"
    ))
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> Option<ProductId> {
        self.id
    }
}

impl core::fmt::Display for Product {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.id {
            Some(id) => write!(f, "<Product {} id=[{}]>", self.name, id),
            None => write!(f, "<Product {} id=[None]>", self.name),
        }
    }
}
