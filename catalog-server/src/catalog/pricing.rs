//! Pricing Resolver
//!
//! Picks the active price entry for a wanted currency, with a deterministic
//! fallback to the first entry when the currency is unsupported.

use shared::models::PriceEntry;

/// The price list is empty. The caller shows a display price of 0 and
/// treats stock as unavailable instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoPriceAvailable;

/// First entry matching `wanted_currency`, else the first entry in the list.
pub fn resolve<'a>(
    entries: &'a [PriceEntry],
    wanted_currency: &str,
) -> Result<&'a PriceEntry, NoPriceAvailable> {
    entries
        .iter()
        .find(|e| e.currency == wanted_currency)
        .or_else(|| entries.first())
        .ok_or(NoPriceAvailable)
}

/// Display price in the wanted currency, 0.0 when no price exists.
pub fn display_price(entries: &[PriceEntry], wanted_currency: &str) -> f64 {
    resolve(entries, wanted_currency)
        .map(|e| e.display_price())
        .unwrap_or(0.0)
}

/// Headline price for a product with variants: the minimum display price
/// across all variant price lists, resolved independently per variant.
/// Ties keep the first-encountered value. `None` when no variant has any
/// price.
pub fn headline_price<'a, I>(variant_pricing: I, wanted_currency: &str) -> Option<f64>
where
    I: IntoIterator<Item = &'a [PriceEntry]>,
{
    let mut min: Option<f64> = None;
    for entries in variant_pricing {
        let Ok(entry) = resolve(entries, wanted_currency) else {
            continue;
        };
        let price = entry.display_price();
        match min {
            Some(current) if price < current => min = Some(price),
            None => min = Some(price),
            _ => {}
        }
    }
    min
}

/// Reject price lists a write should never persist: duplicate currencies,
/// negative prices, or a sale price above the original.
pub fn validate_price_list(entries: &[PriceEntry]) -> Result<(), String> {
    let mut seen: Vec<&str> = Vec::with_capacity(entries.len());
    for entry in entries {
        if entry.currency.trim().is_empty() {
            return Err("Price entry has an empty currency code".to_string());
        }
        if seen.contains(&entry.currency.as_str()) {
            return Err(format!(
                "Duplicate price entry for currency '{}'",
                entry.currency
            ));
        }
        seen.push(&entry.currency);
        if entry.original_price < 0.0 {
            return Err(format!(
                "Negative original price for currency '{}'",
                entry.currency
            ));
        }
        if let Some(sale) = entry.sale_price {
            if sale < 0.0 {
                return Err(format!(
                    "Negative sale price for currency '{}'",
                    entry.currency
                ));
            }
            if sale > entry.original_price {
                return Err(format!(
                    "Sale price exceeds original price for currency '{}'",
                    entry.currency
                ));
            }
        }
    }
    Ok(())
}
