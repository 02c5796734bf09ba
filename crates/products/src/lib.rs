//! Products domain module.
//!
//! The `Product` entity, its validation and (de)serialization, and the
//! repository operations that read and write products through an injected
//! [`ProductStore`].

pub mod category;
pub mod price;
pub mod product;
pub mod query;
pub mod store;

pub use category::Category;
pub use price::{PRICE_PRECISION, PRICE_SCALE, check_price, parse_price, price_from_value};
pub use product::{DESCRIPTION_MAX_LEN, NAME_MAX_LEN, Product};
pub use query::ProductQuery;
pub use store::{InMemoryProductStore, ProductFilter, ProductStore};
