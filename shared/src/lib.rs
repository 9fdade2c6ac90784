//! Shared domain types for the storefront catalog.
//!
//! Everything that crosses the API boundary or is embedded in a database row
//! lives here: product and variant entities, media entries, per-currency
//! pricing, and the create/update payload structs used by the multipart
//! handlers.

pub mod models;
pub mod util;

pub use models::{
    Dimensions, InlineSku, Inventory, Media, MediaKind, PriceEntry, Product, ProductCreate,
    ProductUpdate, Variant, VariantPayload,
};
