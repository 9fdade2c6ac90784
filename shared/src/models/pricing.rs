//! Per-currency Price Model

use serde::{Deserialize, Serialize};

use super::serde_coerce;

/// One price entry per supported currency.
///
/// Invariants (enforced on the write path, not here): at most one entry per
/// currency per owner, and `sale_price`, when set, must not exceed
/// `original_price`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceEntry {
    pub currency: String,
    #[serde(with = "serde_coerce::f64_lenient")]
    pub original_price: f64,
    #[serde(default, with = "serde_coerce::opt_f64_lenient")]
    pub sale_price: Option<f64>,
}

impl PriceEntry {
    pub fn new(currency: impl Into<String>, original_price: f64) -> Self {
        Self {
            currency: currency.into(),
            original_price,
            sale_price: None,
        }
    }

    pub fn with_sale(currency: impl Into<String>, original_price: f64, sale_price: f64) -> Self {
        Self {
            currency: currency.into(),
            original_price,
            sale_price: Some(sale_price),
        }
    }

    /// Price shown to a buyer: the sale price when set and non-zero,
    /// otherwise the original price.
    pub fn display_price(&self) -> f64 {
        match self.sale_price {
            Some(sale) if sale > 0.0 => sale,
            _ => self.original_price,
        }
    }

    /// Discount as a rounded percentage, `None` when nothing is discounted.
    pub fn discount_percent(&self) -> Option<i32> {
        let display = self.display_price();
        if display < self.original_price && self.original_price > 0.0 {
            let pct = (self.original_price - display) / self.original_price * 100.0;
            Some(pct.round() as i32)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_price_prefers_nonzero_sale_price() {
        assert_eq!(PriceEntry::with_sale("EUR", 100.0, 80.0).display_price(), 80.0);
        assert_eq!(PriceEntry::new("EUR", 100.0).display_price(), 100.0);
        // Zero sale price means "no sale", not "free"
        assert_eq!(PriceEntry::with_sale("EUR", 100.0, 0.0).display_price(), 100.0);
    }

    #[test]
    fn discount_percent_rounds() {
        assert_eq!(PriceEntry::with_sale("EUR", 100.0, 80.0).discount_percent(), Some(20));
        assert_eq!(PriceEntry::with_sale("EUR", 30.0, 20.0).discount_percent(), Some(33));
        assert_eq!(PriceEntry::new("EUR", 100.0).discount_percent(), None);
    }

    #[test]
    fn deserializes_camel_case_with_string_numbers() {
        let entry: PriceEntry =
            serde_json::from_str(r#"{"currency":"USD","originalPrice":"49.9","salePrice":39.9}"#)
                .unwrap();
        assert_eq!(entry.currency, "USD");
        assert_eq!(entry.original_price, 49.9);
        assert_eq!(entry.sale_price, Some(39.9));
    }
}
