//! Catalog Service: product and variant write/read transitions.
//!
//! Owns the create/update lifecycle: media upload before variant writes,
//! best-effort byte cleanup on detach, and the single-vs-multi-variant
//! branch. There is no transaction across media bytes and rows; a crash
//! mid-write can leave orphaned files (harmless) or variants whose parent
//! save never landed. Writes are admin-triggered and low-frequency, so two
//! concurrent updates to one product race last-write-wins.

use serde::Serialize;
use sqlx::SqlitePool;

use shared::models::{
    InlineSku, Inventory, Media, PriceEntry, Product, ProductCreate, ProductUpdate, Variant,
    VariantPayload,
};
use shared::util::{now_millis, slugify, snowflake_id};

use super::form::UploadSet;
use super::{matcher, pricing};
use crate::db::repository::{product as product_repo, variant as variant_repo};
use crate::media::{MediaStore, UploadedFile};
use crate::utils::{AppError, AppResult};

/// A product as the API returns it: the stored record plus its variant set
/// and read-time price/stock annotations.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductWithVariants {
    #[serde(flatten)]
    pub product: Product,
    /// Empty for single-SKU products; `inlineSku` is authoritative there.
    pub variants: Vec<Variant>,
    /// Sorted attribute dimension names derived from the first variant.
    pub attribute_levels: Vec<String>,
    /// Selectable values per dimension, in first-encountered order.
    pub attribute_options: std::collections::BTreeMap<String, Vec<String>>,
    /// Headline display price in the requested currency. For multi-variant
    /// products this is the minimum display price across variants.
    pub display_price: f64,
    pub in_stock: bool,
}

#[derive(Clone)]
pub struct CatalogService {
    pool: SqlitePool,
    media: MediaStore,
    default_currency: String,
}

impl CatalogService {
    pub fn new(pool: SqlitePool, media: MediaStore, default_currency: impl Into<String>) -> Self {
        Self {
            pool,
            media,
            default_currency: default_currency.into(),
        }
    }

    // -------------------------------------------------------------------
    // Reads
    // -------------------------------------------------------------------

    pub async fn list(&self, currency: Option<&str>) -> AppResult<Vec<ProductWithVariants>> {
        let products = product_repo::find_all(&self.pool).await?;
        let mut out = Vec::with_capacity(products.len());
        for product in products {
            out.push(self.annotate(product, currency).await?);
        }
        Ok(out)
    }

    pub async fn get(&self, id: i64, currency: Option<&str>) -> AppResult<ProductWithVariants> {
        let product = product_repo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {id}")))?;
        self.annotate(product, currency).await
    }

    async fn annotate(
        &self,
        product: Product,
        currency: Option<&str>,
    ) -> AppResult<ProductWithVariants> {
        let currency = currency.unwrap_or(&self.default_currency);
        if product.is_only_product {
            let display_price = pricing::display_price(&product.pricing, currency);
            let in_stock = product
                .inline_sku
                .as_ref()
                .map(|sku| sku.inventory.available() > 0)
                .unwrap_or(false)
                && !product.pricing.is_empty();
            return Ok(ProductWithVariants {
                product,
                variants: Vec::new(),
                attribute_levels: Vec::new(),
                attribute_options: Default::default(),
                display_price,
                in_stock,
            });
        }

        let variants = variant_repo::find_by_product(&self.pool, product.id).await?;
        let display_price = pricing::headline_price(
            variants.iter().map(|v| v.pricing.as_slice()),
            currency,
        )
        .unwrap_or_else(|| pricing::display_price(&product.pricing, currency));
        let in_stock = variants.iter().any(|v| {
            v.inventory.available() > 0 && !v.pricing.is_empty()
        });
        let attribute_levels = matcher::dimension_levels(&variants);
        let attribute_options = attribute_levels
            .iter()
            .map(|level| (level.clone(), matcher::dimension_values(&variants, level)))
            .collect();
        Ok(ProductWithVariants {
            product,
            variants,
            attribute_levels,
            attribute_options,
            display_price,
            in_stock,
        })
    }

    /// Find the variant matching a full attribute selection. `None` both
    /// when nothing matches and for single-SKU products.
    pub async fn match_variant(
        &self,
        product_id: i64,
        selection: &std::collections::BTreeMap<String, String>,
    ) -> AppResult<Option<Variant>> {
        let product = product_repo::find_by_id(&self.pool, product_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {product_id}")))?;
        if product.is_only_product {
            return Ok(None);
        }
        let variants = variant_repo::find_by_product(&self.pool, product_id).await?;
        let levels = matcher::dimension_levels(&variants);
        Ok(matcher::find_match(&variants, &levels, selection).cloned())
    }

    // -------------------------------------------------------------------
    // Create
    // -------------------------------------------------------------------

    pub async fn create(
        &self,
        payload: ProductCreate,
        uploads: UploadSet,
    ) -> AppResult<ProductWithVariants> {
        validate_pricing(&payload.pricing)?;
        for entry in &payload.variants {
            validate_pricing(&entry.pricing)?;
        }
        reject_duplicate_tuples(&payload.variants)?;

        let now = now_millis();
        let id = snowflake_id();
        let slug = slugify(&payload.name);

        // Product media is written before any rows; a later failure leaves
        // orphaned bytes, not dangling URLs.
        let media = self.store_all(&uploads.product_files, 0)?;

        let inline_sku = if payload.is_only_product {
            Some(InlineSku {
                sku: payload.sku.clone(),
                barcode: payload.barcode.clone(),
                inventory: Inventory {
                    stock: payload.stock.max(0),
                    reserved: 0,
                    low_stock_threshold: payload.low_stock_threshold.max(0),
                },
                dimensions: payload.dimensions.clone(),
                media: media.clone(),
            })
        } else {
            None
        };

        let product = Product {
            id,
            name: payload.name.clone(),
            slug,
            description: payload.description.clone(),
            categories: payload.categories.clone(),
            brand: payload.brand.clone(),
            is_only_product: payload.is_only_product,
            is_featured: payload.is_featured,
            is_active: payload.is_active,
            media,
            pricing: payload.pricing.clone(),
            inline_sku,
            created_at: now,
            updated_at: now,
        };
        product_repo::insert(&self.pool, &product).await?;

        if !payload.is_only_product {
            // Build every variant (uploading its media) before inserting,
            // so the insert loop is a plain bulk write.
            let mut variants = Vec::with_capacity(payload.variants.len());
            for (index, entry) in payload.variants.iter().enumerate() {
                let files: Vec<UploadedFile> =
                    uploads.files_for_variant(index).cloned().collect();
                let media = self.store_all(&files, 0)?;
                variants.push(Variant {
                    id: snowflake_id(),
                    product_id: id,
                    attributes: entry.attributes.clone(),
                    pricing: entry.pricing.clone(),
                    inventory: entry.inventory(),
                    media,
                    created_at: now,
                    updated_at: now,
                });
            }
            for variant in &variants {
                variant_repo::insert(&self.pool, variant).await?;
            }
        }

        tracing::info!(product_id = id, name = %payload.name, "Created product");
        self.get(id, None).await
    }

    // -------------------------------------------------------------------
    // Update
    // -------------------------------------------------------------------

    pub async fn update(
        &self,
        payload: ProductUpdate,
        uploads: UploadSet,
    ) -> AppResult<ProductWithVariants> {
        let mut product = product_repo::find_by_id(&self.pool, payload.id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {}", payload.id)))?;
        let now = now_millis();

        if let Some(pricing) = &payload.pricing {
            validate_pricing(pricing)?;
        }
        if let Some(variants) = &payload.variants {
            for entry in variants {
                validate_pricing(&entry.pricing)?;
            }
            reject_duplicate_tuples(variants)?;
        }

        // Detach first: drop removed URLs from the product media list and
        // delete the bytes best-effort.
        if !payload.removed_media.is_empty() {
            product
                .media
                .retain(|m| !payload.removed_media.contains(&m.url));
            for url in &payload.removed_media {
                self.media.delete(url);
            }
        }

        // Append newly uploaded top-level files.
        let next_position = product.media.len();
        product
            .media
            .extend(self.store_all(&uploads.product_files, next_position)?);

        // Scalars: apply only when present.
        if let Some(name) = &payload.name {
            product.name = name.clone();
            product.slug = slugify(name);
        }
        if let Some(description) = &payload.description {
            product.description = description.clone();
        }
        if let Some(categories) = &payload.categories {
            product.categories = categories.clone();
        }
        if payload.brand.is_some() {
            product.brand = payload.brand.clone();
        }
        if let Some(flag) = payload.is_only_product {
            product.is_only_product = flag;
        }
        if let Some(flag) = payload.is_featured {
            product.is_featured = flag;
        }
        if let Some(flag) = payload.is_active {
            product.is_active = flag;
        }
        if let Some(pricing) = &payload.pricing {
            product.pricing = pricing.clone();
        }

        if product.is_only_product {
            let prior = product.inline_sku.take().unwrap_or_default();
            product.inline_sku = Some(InlineSku {
                sku: payload.sku.clone().unwrap_or(prior.sku),
                barcode: payload.barcode.clone().or(prior.barcode),
                inventory: Inventory {
                    stock: payload.stock.unwrap_or(prior.inventory.stock).max(0),
                    reserved: prior.inventory.reserved,
                    low_stock_threshold: payload
                        .low_stock_threshold
                        .unwrap_or(prior.inventory.low_stock_threshold)
                        .max(0),
                },
                dimensions: payload.dimensions.clone().or(prior.dimensions),
                media: product.media.clone(),
            });
        } else if let Some(entries) = &payload.variants {
            self.apply_variant_updates(&mut product, entries, &payload.removed_media, &uploads, now)
                .await?;
        }

        // The product row is saved last, after all variant writes.
        product.updated_at = now;
        product_repo::save(&self.pool, &product).await?;

        tracing::info!(product_id = product.id, "Updated product");
        self.get(payload.id, None).await
    }

    /// Walk the submitted variant entries: entries with an id update that
    /// variant in place, entries without one insert a new variant. Stored
    /// variants not mentioned in the payload stay untouched.
    async fn apply_variant_updates(
        &self,
        product: &mut Product,
        entries: &[VariantPayload],
        removed_media: &[String],
        uploads: &UploadSet,
        now: i64,
    ) -> AppResult<()> {
        // Project the post-update attribute tuples (stored variants with
        // in-place edits applied, plus new entries) and refuse the write if
        // any two collide. The matcher breaks duplicate ties arbitrarily,
        // so they must never reach storage.
        let existing = variant_repo::find_by_product(&self.pool, product.id).await?;
        let mut projected: Vec<std::collections::BTreeMap<String, String>> = existing
            .iter()
            .map(|v| {
                entries
                    .iter()
                    .find(|e| e.id == Some(v.id))
                    .map(|e| e.attributes.clone())
                    .unwrap_or_else(|| v.attributes.clone())
            })
            .collect();
        projected.extend(
            entries
                .iter()
                .filter(|e| e.id.is_none())
                .map(|e| e.attributes.clone()),
        );
        for (i, a) in projected.iter().enumerate() {
            if !a.is_empty() && projected[i + 1..].contains(a) {
                return Err(AppError::validation(
                    "Two variants carry the same attribute values",
                ));
            }
        }

        for (index, entry) in entries.iter().enumerate() {
            let files: Vec<UploadedFile> = uploads.files_for_variant(index).cloned().collect();
            match entry.id {
                Some(variant_id) => {
                    let mut variant = variant_repo::find_by_id(&self.pool, variant_id)
                        .await?
                        .ok_or_else(|| AppError::not_found(format!("Variant {variant_id}")))?;
                    if variant.product_id != product.id {
                        return Err(AppError::validation(format!(
                            "Variant {variant_id} does not belong to product {}",
                            product.id
                        )));
                    }
                    variant
                        .media
                        .retain(|m| !removed_media.contains(&m.url));
                    let next_position = variant.media.len();
                    variant.media.extend(self.store_all(&files, next_position)?);
                    variant.attributes = entry.attributes.clone();
                    variant.pricing = entry.pricing.clone();
                    variant.inventory = entry.inventory();
                    variant.updated_at = now;
                    variant_repo::save(&self.pool, &variant).await?;
                }
                None => {
                    let media = self.store_all(&files, 0)?;
                    let variant = Variant {
                        id: snowflake_id(),
                        product_id: product.id,
                        attributes: entry.attributes.clone(),
                        pricing: entry.pricing.clone(),
                        inventory: entry.inventory(),
                        media,
                        created_at: now,
                        updated_at: now,
                    };
                    variant_repo::insert(&self.pool, &variant).await?;
                }
            }
        }
        Ok(())
    }

    // -------------------------------------------------------------------
    // Delete
    // -------------------------------------------------------------------

    /// Remove one variant explicitly. Omission from an update payload never
    /// deletes a variant; this is the only removal path.
    pub async fn delete_variant(&self, product_id: i64, variant_id: i64) -> AppResult<()> {
        let variant = variant_repo::find_by_id(&self.pool, variant_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Variant {variant_id}")))?;
        if variant.product_id != product_id {
            return Err(AppError::validation(format!(
                "Variant {variant_id} does not belong to product {product_id}"
            )));
        }
        variant_repo::delete(&self.pool, variant_id).await?;
        for media in &variant.media {
            self.media.delete(&media.url);
        }
        tracing::info!(product_id, variant_id, "Deleted variant");
        Ok(())
    }

    /// Remove a product, its variants (cascade), and best-effort its media
    /// bytes. Byte cleanup failures are logged, never surfaced.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        let product = product_repo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Product {id}")))?;
        let variants = variant_repo::find_by_product(&self.pool, id).await?;

        if !product_repo::delete(&self.pool, id).await? {
            return Err(AppError::not_found(format!("Product {id}")));
        }

        for media in product
            .media
            .iter()
            .chain(product.inline_sku.iter().flat_map(|s| s.media.iter()))
            .chain(variants.iter().flat_map(|v| v.media.iter()))
        {
            self.media.delete(&media.url);
        }

        tracing::info!(product_id = id, variant_count = variants.len(), "Deleted product");
        Ok(())
    }

    // -------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------

    /// Store files one at a time, in submission order. A write failure
    /// aborts the request; bytes already written stay on disk.
    fn store_all(&self, files: &[UploadedFile], start_position: usize) -> AppResult<Vec<Media>> {
        let mut media = Vec::with_capacity(files.len());
        for (offset, file) in files.iter().enumerate() {
            let url = self.media.store(file)?;
            media.push(Media {
                url,
                alt: file.filename.clone(),
                kind: file.kind(),
                position: (start_position + offset) as i32,
            });
        }
        Ok(media)
    }
}

fn validate_pricing(entries: &[PriceEntry]) -> AppResult<()> {
    pricing::validate_price_list(entries).map_err(AppError::validation)
}

/// The matcher resolves duplicate attribute tuples arbitrarily, so the
/// write path refuses to persist them.
fn reject_duplicate_tuples(entries: &[VariantPayload]) -> AppResult<()> {
    for (i, a) in entries.iter().enumerate() {
        for b in &entries[i + 1..] {
            if !a.attributes.is_empty() && a.attributes == b.attributes {
                return Err(AppError::validation(
                    "Two variants carry the same attribute values",
                ));
            }
        }
    }
    Ok(())
}
