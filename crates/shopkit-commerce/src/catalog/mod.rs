//! Catalog module.
//!
//! Products and categories as the storefront backend serves them, the
//! clients for the `/products` and `/categories` resources, and the
//! snapshot a cart line keeps of a product.

mod api;
mod category;
mod product;
mod snapshot;

pub use api::{CategoryApi, ProductApi, ProductQuery, ProductSort, UnknownSort};
pub use category::{Category, CategoryDraft};
pub use product::{Product, ProductDraft};
pub use snapshot::ProductSnapshot;
