//! Multipart Form Decoding
//!
//! The admin UI submits catalog writes as one flat multipart form: scalar
//! text fields, JSON-encoded string fields for structured data, and file
//! parts. File parts named `variantMedia_<index>` target the variant at
//! that zero-based index in the `variants` JSON array; any other file part
//! is top-level product media. The prefix is decoded once here into
//! structured `(index, file)` pairs so nothing downstream parses field
//! names.

use std::collections::HashMap;

use axum::extract::Multipart;
use serde::de::DeserializeOwned;
use shared::models::{Dimensions, PriceEntry, ProductCreate, ProductUpdate, VariantPayload};

use crate::media::UploadedFile;
use crate::utils::{AppError, AppResult};

/// Reserved field-name prefix routing a file part to a variant index.
pub const VARIANT_MEDIA_PREFIX: &str = "variantMedia_";

/// Files lifted out of a single request, split by target.
#[derive(Debug, Default)]
pub struct UploadSet {
    pub product_files: Vec<UploadedFile>,
    /// `(variant index, file)` pairs, in submission order.
    pub variant_files: Vec<(usize, UploadedFile)>,
}

impl UploadSet {
    pub fn files_for_variant(&self, index: usize) -> impl Iterator<Item = &UploadedFile> {
        self.variant_files
            .iter()
            .filter(move |(i, _)| *i == index)
            .map(|(_, f)| f)
    }
}

/// A decoded multipart catalog form: text fields plus routed uploads.
#[derive(Debug, Default)]
pub struct ProductForm {
    fields: HashMap<String, String>,
    pub uploads: UploadSet,
}

impl ProductForm {
    /// Drain an axum multipart stream. Fields are read sequentially, one
    /// at a time, which bounds peak memory at the largest single part.
    pub async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(|s| s.to_string()) else {
                continue;
            };
            if field.file_name().is_some() {
                let filename = field
                    .file_name()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "file".to_string());
                let data = field.bytes().await?.to_vec();
                let file = UploadedFile { filename, data };
                match variant_index(&name) {
                    FileTarget::Variant(index) => form.uploads.variant_files.push((index, file)),
                    FileTarget::Product => form.uploads.product_files.push(file),
                    FileTarget::Malformed => {
                        tracing::warn!(field = %name, "Skipping file with malformed variant index");
                    }
                }
            } else {
                let value = field.text().await?;
                form.fields.insert(name, value);
            }
        }
        Ok(form)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(|s| s.as_str())
    }

    /// Boolean flags arrive as the literal strings `"true"` / `"false"`.
    /// Anything else is treated as absent so a garbled flag never flips
    /// stored state on a partial update.
    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.text(name).map(str::trim) {
            Some("true") => Some(true),
            Some("false") => Some(false),
            Some(other) => {
                if !other.is_empty() {
                    tracing::warn!(field = name, value = other, "Ignoring non-boolean flag");
                }
                None
            }
            None => None,
        }
    }

    fn int(&self, name: &str) -> Option<i64> {
        self.text(name).and_then(|s| s.trim().parse().ok())
    }

    /// Decode a JSON-encoded string field, substituting `default` when the
    /// field is absent or malformed. Malformed optional fields degrade
    /// instead of aborting the whole write.
    pub fn json_or<T: DeserializeOwned>(&self, name: &str, default: T) -> T {
        match self.text(name) {
            Some(raw) => match serde_json::from_str(raw) {
                Ok(value) => value,
                Err(e) => {
                    tracing::warn!(field = name, error = %e, "Malformed JSON form field, using default");
                    default
                }
            },
            None => default,
        }
    }

    fn json_opt<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        self.text(name)?;
        self.json_or(name, None)
    }

    /// Assemble a create payload. `name` is the only required field.
    pub fn into_create(self) -> AppResult<(ProductCreate, UploadSet)> {
        let name = self
            .text("name")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::validation("Product name is required"))?;

        let payload = ProductCreate {
            name,
            description: self.text("description").unwrap_or_default().to_string(),
            categories: self.json_or("categories", Vec::new()),
            brand: self.text("brand").map(|s| s.to_string()),
            is_only_product: self.flag("isOnlyProduct").unwrap_or(false),
            is_featured: self.flag("isFeatured").unwrap_or(false),
            is_active: self.flag("isActive").unwrap_or(true),
            pricing: self.json_or::<Vec<PriceEntry>>("pricing", Vec::new()),
            variants: self.json_or::<Vec<VariantPayload>>("variants", Vec::new()),
            sku: self.text("sku").unwrap_or_default().to_string(),
            barcode: self.text("barcode").map(|s| s.to_string()),
            stock: self.int("stock").unwrap_or(0),
            low_stock_threshold: self
                .int("lowStockThreshold")
                .unwrap_or(shared::models::DEFAULT_LOW_STOCK_THRESHOLD),
            dimensions: self.json_or::<Option<Dimensions>>("dimensions", None),
        };

        Ok((payload, self.uploads))
    }

    /// Assemble an update payload. `id` is required; every other field is
    /// optional and absent fields leave the stored value untouched.
    pub fn into_update(self) -> AppResult<(ProductUpdate, UploadSet)> {
        let id = self
            .int("id")
            .ok_or_else(|| AppError::validation("Product id is required"))?;

        let payload = ProductUpdate {
            id,
            name: self
                .text("name")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            description: self.text("description").map(|s| s.to_string()),
            categories: self.json_opt("categories"),
            brand: self.text("brand").map(|s| s.to_string()),
            is_only_product: self.flag("isOnlyProduct"),
            is_featured: self.flag("isFeatured"),
            is_active: self.flag("isActive"),
            pricing: self.json_opt("pricing"),
            variants: self.json_opt("variants"),
            removed_media: self.json_or("removedMedia", Vec::new()),
            sku: self.text("sku").map(|s| s.to_string()),
            barcode: self.text("barcode").map(|s| s.to_string()),
            stock: self.int("stock"),
            low_stock_threshold: self.int("lowStockThreshold"),
            dimensions: self.json_opt("dimensions"),
        };

        Ok((payload, self.uploads))
    }
}

enum FileTarget {
    Product,
    Variant(usize),
    Malformed,
}

fn variant_index(field_name: &str) -> FileTarget {
    match field_name.strip_prefix(VARIANT_MEDIA_PREFIX) {
        Some(rest) => match rest.parse::<usize>() {
            Ok(index) => FileTarget::Variant(index),
            Err(_) => FileTarget::Malformed,
        },
        None => FileTarget::Product,
    }
}
