//! Variant Model

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::serde_coerce;
use super::{Inventory, Media, PriceEntry};

/// A purchasable configuration of a product.
///
/// `attributes` maps free-form level names (e.g. `Level_1`, `Color`) to the
/// value this variant carries on that axis. Level names are not a fixed
/// schema; the matcher derives the dimension set per product at read time.
/// A variant belongs to exactly one product and is deleted with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub id: i64,
    pub product_id: i64,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub pricing: Vec<PriceEntry>,
    #[serde(default)]
    pub inventory: Inventory,
    #[serde(default)]
    pub media: Vec<Media>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Variant entry inside a product create/update payload.
///
/// An entry carrying an `id` updates that variant in place; an entry without
/// one inserts a new variant. Media files are routed separately, by the
/// entry's index in the submitted array.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantPayload {
    #[serde(default, alias = "_id", with = "serde_coerce::opt_i64_lenient")]
    pub id: Option<i64>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    #[serde(default)]
    pub pricing: Vec<PriceEntry>,
    #[serde(default, with = "serde_coerce::i64_lenient")]
    pub stock: i64,
    #[serde(default, with = "serde_coerce::i64_lenient")]
    pub reserved: i64,
    #[serde(default = "super::product::default_low_stock", with = "serde_coerce::i64_lenient")]
    pub low_stock_threshold: i64,
}

impl VariantPayload {
    pub fn inventory(&self) -> Inventory {
        Inventory {
            stock: self.stock.max(0),
            reserved: self.reserved.max(0),
            low_stock_threshold: self.low_stock_threshold.max(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_accepts_mongo_style_underscore_id() {
        let p: VariantPayload =
            serde_json::from_str(r#"{"_id":"42","attributes":{"Level_1":"Red"},"stock":"3"}"#)
                .unwrap();
        assert_eq!(p.id, Some(42));
        assert_eq!(p.attributes.get("Level_1").map(String::as_str), Some("Red"));
        assert_eq!(p.stock, 3);
        assert_eq!(p.low_stock_threshold, 5);
    }

    #[test]
    fn inventory_clamps_negative_counters() {
        let p = VariantPayload {
            stock: -2,
            reserved: -1,
            ..Default::default()
        };
        let inv = p.inventory();
        assert_eq!(inv.stock, 0);
        assert_eq!(inv.reserved, 0);
    }
}
