//! Variant Matcher
//!
//! Attribute dimensions are free-form: the ordered dimension set is derived
//! from the first variant's attribute keys, sorted lexicographically. A
//! variant that lacks one of those keys never matches a selection pinning
//! that key; that is a data shape problem, not an error here.

use std::collections::BTreeMap;

use shared::models::Variant;

/// Sorted attribute-level names defining the product's dimensions, taken
/// from the first variant. Empty when there are no variants.
pub fn dimension_levels(variants: &[Variant]) -> Vec<String> {
    match variants.first() {
        // BTreeMap keys already iterate in sorted order
        Some(v) => v.attributes.keys().cloned().collect(),
        None => Vec::new(),
    }
}

/// Distinct values per dimension, in first-encountered order.
pub fn dimension_values(variants: &[Variant], level: &str) -> Vec<String> {
    let mut values: Vec<String> = Vec::new();
    for variant in variants {
        if let Some(value) = variant.attributes.get(level) {
            if !values.iter().any(|v| v == value) {
                values.push(value.clone());
            }
        }
    }
    values
}

/// Find the first variant whose attributes equal `selection` on every
/// derived dimension. Duplicate attribute tuples resolve to the first in
/// iteration order; the write path is expected to prevent them.
pub fn find_match<'a>(
    variants: &'a [Variant],
    levels: &[String],
    selection: &BTreeMap<String, String>,
) -> Option<&'a Variant> {
    if levels.is_empty() {
        return None;
    }
    variants.iter().find(|variant| {
        levels.iter().all(|level| {
            match (variant.attributes.get(level), selection.get(level)) {
                (Some(have), Some(want)) => have == want,
                _ => false,
            }
        })
    })
}

/// True when two variants carry identical attribute tuples.
pub fn has_duplicate_tuples(variants: &[Variant]) -> bool {
    for (i, a) in variants.iter().enumerate() {
        for b in &variants[i + 1..] {
            if a.attributes == b.attributes {
                return true;
            }
        }
    }
    false
}

/// Interactive selection state. Seeded from the first variant so the UI
/// always has a concrete variant in hand; clicks that match nothing are
/// ignored rather than clearing the selection.
#[derive(Debug, Clone)]
pub struct Selection {
    levels: Vec<String>,
    selected: BTreeMap<String, String>,
}

impl Selection {
    pub fn seed(variants: &[Variant]) -> Option<Self> {
        let first = variants.first()?;
        Some(Self {
            levels: dimension_levels(variants),
            selected: first.attributes.clone(),
        })
    }

    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    pub fn selected(&self) -> &BTreeMap<String, String> {
        &self.selected
    }

    /// Merge `{level: value}` into the selection, then re-match. When the
    /// merged selection matches no variant the click is a no-op and the
    /// previous selection stays in force.
    pub fn click<'a>(
        &mut self,
        variants: &'a [Variant],
        level: &str,
        value: &str,
    ) -> Option<&'a Variant> {
        let mut merged = self.selected.clone();
        merged.insert(level.to_string(), value.to_string());
        match find_match(variants, &self.levels, &merged) {
            Some(variant) => {
                self.selected = merged;
                Some(variant)
            }
            None => find_match(variants, &self.levels, &self.selected),
        }
    }

    pub fn current<'a>(&self, variants: &'a [Variant]) -> Option<&'a Variant> {
        find_match(variants, &self.levels, &self.selected)
    }
}
