//! Domain models shared between the server crate and its tests.

pub mod media;
pub mod pricing;
pub mod product;
pub mod serde_coerce;
pub mod variant;

pub use media::{Media, MediaKind};
pub use pricing::PriceEntry;
pub use product::{
    Dimensions, InlineSku, Inventory, Product, ProductCreate, ProductUpdate,
    DEFAULT_LOW_STOCK_THRESHOLD,
};
pub use variant::{Variant, VariantPayload};
