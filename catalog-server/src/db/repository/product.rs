//! Product Repository

use super::{RepoError, RepoResult};
use shared::models::{InlineSku, Media, PriceEntry, Product};
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;

const PRODUCT_SELECT: &str = "SELECT id, name, slug, description, categories, brand, is_only_product, is_featured, is_active, media, pricing, inline_sku, created_at, updated_at FROM product";

/// Raw row with JSON columns still as TEXT.
#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    slug: String,
    description: String,
    categories: String,
    brand: Option<String>,
    is_only_product: bool,
    is_featured: bool,
    is_active: bool,
    media: String,
    pricing: String,
    inline_sku: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl ProductRow {
    fn into_product(self) -> RepoResult<Product> {
        let categories: Vec<String> = serde_json::from_str(&self.categories)?;
        let media: Vec<Media> = serde_json::from_str(&self.media)?;
        let pricing: Vec<PriceEntry> = serde_json::from_str(&self.pricing)?;
        let inline_sku: Option<InlineSku> = match self.inline_sku {
            Some(text) => Some(serde_json::from_str(&text)?),
            None => None,
        };
        Ok(Product {
            id: self.id,
            name: self.name,
            slug: self.slug,
            description: self.description,
            categories,
            brand: self.brand,
            is_only_product: self.is_only_product,
            is_featured: self.is_featured,
            is_active: self.is_active,
            media,
            pricing,
            inline_sku,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn row_to_product(row: SqliteRow) -> RepoResult<Product> {
    use sqlx::FromRow;
    ProductRow::from_row(&row)
        .map_err(|e| RepoError::Database(e.to_string()))?
        .into_product()
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Product>> {
    let sql = format!("{PRODUCT_SELECT} ORDER BY created_at DESC");
    let rows = sqlx::query(&sql).fetch_all(pool).await?;
    rows.into_iter().map(row_to_product).collect()
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE id = ?");
    let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;
    row.map(row_to_product).transpose()
}

pub async fn find_by_slug(pool: &SqlitePool, slug: &str) -> RepoResult<Option<Product>> {
    let sql = format!("{PRODUCT_SELECT} WHERE slug = ?");
    let row = sqlx::query(&sql).bind(slug).fetch_optional(pool).await?;
    row.map(row_to_product).transpose()
}

pub async fn insert(pool: &SqlitePool, product: &Product) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO product (id, name, slug, description, categories, brand, is_only_product, is_featured, is_active, media, pricing, inline_sku, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
    )
    .bind(product.id)
    .bind(&product.name)
    .bind(&product.slug)
    .bind(&product.description)
    .bind(serde_json::to_string(&product.categories)?)
    .bind(&product.brand)
    .bind(product.is_only_product)
    .bind(product.is_featured)
    .bind(product.is_active)
    .bind(serde_json::to_string(&product.media)?)
    .bind(serde_json::to_string(&product.pricing)?)
    .bind(
        product
            .inline_sku
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?,
    )
    .bind(product.created_at)
    .bind(product.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Overwrite the full product row. The materialized `Product` is the unit of
/// persistence, so updates always write every column.
pub async fn save(pool: &SqlitePool, product: &Product) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE product SET name = ?2, slug = ?3, description = ?4, categories = ?5, brand = ?6, is_only_product = ?7, is_featured = ?8, is_active = ?9, media = ?10, pricing = ?11, inline_sku = ?12, updated_at = ?13 WHERE id = ?1",
    )
    .bind(product.id)
    .bind(&product.name)
    .bind(&product.slug)
    .bind(&product.description)
    .bind(serde_json::to_string(&product.categories)?)
    .bind(&product.brand)
    .bind(product.is_only_product)
    .bind(product.is_featured)
    .bind(product.is_active)
    .bind(serde_json::to_string(&product.media)?)
    .bind(serde_json::to_string(&product.pricing)?)
    .bind(
        product
            .inline_sku
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?,
    )
    .bind(product.updated_at)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {}", product.id)));
    }
    Ok(())
}

/// Delete a product row. Variants cascade via the foreign key.
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM product WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
