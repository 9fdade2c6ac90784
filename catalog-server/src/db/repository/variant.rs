//! Variant Repository

use std::collections::BTreeMap;

use super::{RepoError, RepoResult};
use shared::models::{Inventory, Media, PriceEntry, Variant};
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;

const VARIANT_SELECT: &str = "SELECT id, product_id, attributes, pricing, stock, reserved, low_stock_threshold, media, created_at, updated_at FROM variant";

#[derive(sqlx::FromRow)]
struct VariantRow {
    id: i64,
    product_id: i64,
    attributes: String,
    pricing: String,
    stock: i64,
    reserved: i64,
    low_stock_threshold: i64,
    media: String,
    created_at: i64,
    updated_at: i64,
}

impl VariantRow {
    fn into_variant(self) -> RepoResult<Variant> {
        let attributes: BTreeMap<String, String> = serde_json::from_str(&self.attributes)?;
        let pricing: Vec<PriceEntry> = serde_json::from_str(&self.pricing)?;
        let media: Vec<Media> = serde_json::from_str(&self.media)?;
        Ok(Variant {
            id: self.id,
            product_id: self.product_id,
            attributes,
            pricing,
            inventory: Inventory {
                stock: self.stock,
                reserved: self.reserved,
                low_stock_threshold: self.low_stock_threshold,
            },
            media,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn row_to_variant(row: SqliteRow) -> RepoResult<Variant> {
    use sqlx::FromRow;
    VariantRow::from_row(&row)
        .map_err(|e| RepoError::Database(e.to_string()))?
        .into_variant()
}

pub async fn find_by_product(pool: &SqlitePool, product_id: i64) -> RepoResult<Vec<Variant>> {
    let sql = format!("{VARIANT_SELECT} WHERE product_id = ? ORDER BY created_at ASC, id ASC");
    let rows = sqlx::query(&sql).bind(product_id).fetch_all(pool).await?;
    rows.into_iter().map(row_to_variant).collect()
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Variant>> {
    let sql = format!("{VARIANT_SELECT} WHERE id = ?");
    let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;
    row.map(row_to_variant).transpose()
}

pub async fn insert(pool: &SqlitePool, variant: &Variant) -> RepoResult<()> {
    sqlx::query(
        "INSERT INTO variant (id, product_id, attributes, pricing, stock, reserved, low_stock_threshold, media, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
    )
    .bind(variant.id)
    .bind(variant.product_id)
    .bind(serde_json::to_string(&variant.attributes)?)
    .bind(serde_json::to_string(&variant.pricing)?)
    .bind(variant.inventory.stock)
    .bind(variant.inventory.reserved)
    .bind(variant.inventory.low_stock_threshold)
    .bind(serde_json::to_string(&variant.media)?)
    .bind(variant.created_at)
    .bind(variant.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Overwrite the full variant row.
pub async fn save(pool: &SqlitePool, variant: &Variant) -> RepoResult<()> {
    let rows = sqlx::query(
        "UPDATE variant SET attributes = ?2, pricing = ?3, stock = ?4, reserved = ?5, low_stock_threshold = ?6, media = ?7, updated_at = ?8 WHERE id = ?1",
    )
    .bind(variant.id)
    .bind(serde_json::to_string(&variant.attributes)?)
    .bind(serde_json::to_string(&variant.pricing)?)
    .bind(variant.inventory.stock)
    .bind(variant.inventory.reserved)
    .bind(variant.inventory.low_stock_threshold)
    .bind(serde_json::to_string(&variant.media)?)
    .bind(variant.updated_at)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Variant {}", variant.id)));
    }
    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM variant WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
