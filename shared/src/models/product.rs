//! Product Model

use serde::{Deserialize, Serialize};

use super::serde_coerce;
use super::{Media, PriceEntry, VariantPayload};

/// Default low-stock warning threshold.
pub const DEFAULT_LOW_STOCK_THRESHOLD: i64 = 5;

pub(crate) fn default_low_stock() -> i64 {
    DEFAULT_LOW_STOCK_THRESHOLD
}

fn default_true() -> bool {
    true
}

/// Inventory counters. All values are non-negative; the write path clamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    #[serde(default, with = "serde_coerce::i64_lenient")]
    pub stock: i64,
    #[serde(default, with = "serde_coerce::i64_lenient")]
    pub reserved: i64,
    #[serde(default = "default_low_stock", with = "serde_coerce::i64_lenient")]
    pub low_stock_threshold: i64,
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            stock: 0,
            reserved: 0,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
        }
    }
}

impl Inventory {
    /// Units that can still be promised to buyers.
    pub fn available(&self) -> i64 {
        (self.stock - self.reserved).max(0)
    }

    pub fn is_low_stock(&self) -> bool {
        self.available() <= self.low_stock_threshold
    }
}

/// Physical dimensions, free-unit (whatever the storefront displays).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dimensions {
    #[serde(default, with = "serde_coerce::opt_f64_lenient")]
    pub length: Option<f64>,
    #[serde(default, with = "serde_coerce::opt_f64_lenient")]
    pub width: Option<f64>,
    #[serde(default, with = "serde_coerce::opt_f64_lenient")]
    pub height: Option<f64>,
    #[serde(default, with = "serde_coerce::opt_f64_lenient")]
    pub weight: Option<f64>,
}

/// Embedded SKU record for single-SKU products.
///
/// When `Product::is_only_product` is set this is the record consulted for
/// inventory and media instead of the external variant table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineSku {
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default)]
    pub inventory: Inventory,
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
    #[serde(default)]
    pub media: Vec<Media>,
}

/// Product entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// URL slug, derived deterministically from `name`.
    pub slug: String,
    #[serde(default)]
    pub description: String,
    /// Category references (string IDs owned by the categories screen).
    #[serde(default)]
    pub categories: Vec<String>,
    /// Brand reference (string ID owned by the brands screen).
    #[serde(default)]
    pub brand: Option<String>,
    /// true ⇒ single SKU, no variant tree; `inline_sku` is authoritative.
    #[serde(default)]
    pub is_only_product: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub media: Vec<Media>,
    #[serde(default)]
    pub pricing: Vec<PriceEntry>,
    #[serde(default)]
    pub inline_sku: Option<InlineSku>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create product payload (decoded from the multipart form)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreate {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub is_only_product: bool,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub pricing: Vec<PriceEntry>,
    /// Variant rows for multi-variant products; ignored when
    /// `is_only_product` is set.
    #[serde(default)]
    pub variants: Vec<VariantPayload>,
    // Inline SKU fields, consulted only when `is_only_product` is set.
    #[serde(default)]
    pub sku: String,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default, with = "serde_coerce::i64_lenient")]
    pub stock: i64,
    #[serde(default = "default_low_stock", with = "serde_coerce::i64_lenient")]
    pub low_stock_threshold: i64,
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
}

/// Update product payload; absent fields retain their previous values.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpdate {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub is_only_product: Option<bool>,
    #[serde(default)]
    pub is_featured: Option<bool>,
    #[serde(default)]
    pub is_active: Option<bool>,
    /// Overwrites the price list wholesale when present.
    #[serde(default)]
    pub pricing: Option<Vec<PriceEntry>>,
    /// Variant rows to update (with id) or insert (without id). Existing
    /// variants omitted here are left untouched.
    #[serde(default)]
    pub variants: Option<Vec<VariantPayload>>,
    /// Media URLs to detach; backing bytes are deleted best-effort.
    #[serde(default)]
    pub removed_media: Vec<String>,
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub barcode: Option<String>,
    #[serde(default, with = "serde_coerce::opt_i64_lenient")]
    pub stock: Option<i64>,
    #[serde(default, with = "serde_coerce::opt_i64_lenient")]
    pub low_stock_threshold: Option<i64>,
    #[serde(default)]
    pub dimensions: Option<Dimensions>,
}
