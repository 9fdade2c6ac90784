//! End-to-end catalog flows against a real SQLite database and media
//! directory in a temp workspace.

use std::collections::BTreeMap;

use catalog_server::media::UploadedFile;
use catalog_server::catalog::UploadSet;
use catalog_server::{AppError, Config, ServerState};
use shared::models::{PriceEntry, ProductCreate, ProductUpdate, VariantPayload};
use tempfile::TempDir;

async fn test_state() -> (ServerState, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = Config::with_overrides(dir.path().to_string_lossy().to_string(), 0);
    let state = ServerState::initialize(&config)
        .await
        .expect("state init");
    (state, dir)
}

fn eur(original: f64) -> PriceEntry {
    PriceEntry::new("EUR", original)
}

fn attrs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn variant_entry(pairs: &[(&str, &str)], price: f64, stock: i64) -> VariantPayload {
    VariantPayload {
        attributes: attrs(pairs),
        pricing: vec![eur(price)],
        stock,
        ..Default::default()
    }
}

fn file(name: &str) -> UploadedFile {
    UploadedFile {
        filename: name.to_string(),
        data: vec![0xAB; 16],
    }
}

fn two_by_two() -> Vec<VariantPayload> {
    vec![
        variant_entry(&[("Level_1", "Red"), ("Level_2", "S")], 20.0, 3),
        variant_entry(&[("Level_1", "Red"), ("Level_2", "M")], 22.0, 3),
        variant_entry(&[("Level_1", "Blue"), ("Level_2", "S")], 21.0, 0),
        variant_entry(&[("Level_1", "Blue"), ("Level_2", "M")], 23.0, 5),
    ]
}

#[tokio::test]
async fn test_single_sku_round_trip() {
    let (state, _dir) = test_state().await;

    let payload = ProductCreate {
        name: "Espresso Cup".to_string(),
        is_only_product: true,
        pricing: vec![eur(12.5)],
        sku: "CUP-01".to_string(),
        stock: 7,
        ..Default::default()
    };
    let created = state
        .catalog
        .create(payload, UploadSet::default())
        .await
        .expect("create");

    let fetched = state
        .catalog
        .get(created.product.id, None)
        .await
        .expect("get");
    assert!(fetched.variants.is_empty());
    let sku = fetched.product.inline_sku.as_ref().expect("inline sku");
    assert_eq!(sku.sku, "CUP-01");
    assert_eq!(sku.inventory.stock, 7);
    assert_eq!(sku.inventory.low_stock_threshold, 5);
    assert_eq!(fetched.display_price, 12.5);
    assert!(fetched.in_stock);
    assert_eq!(fetched.product.slug, "espresso-cup");
}

#[tokio::test]
async fn test_multi_variant_media_update_round_trip() {
    let (state, _dir) = test_state().await;

    let mut uploads = UploadSet::default();
    uploads.product_files.push(file("hero.jpg"));
    uploads.variant_files.push((0, file("red-s.jpg")));

    let payload = ProductCreate {
        name: "Trail Shoe".to_string(),
        pricing: vec![eur(25.0)],
        variants: two_by_two(),
        ..Default::default()
    };
    let created = state.catalog.create(payload, uploads).await.expect("create");
    assert_eq!(created.variants.len(), 4);
    assert_eq!(created.attribute_levels, vec!["Level_1", "Level_2"]);
    assert_eq!(created.product.media.len(), 1);

    // Media submitted under index 0 landed on the Red/S entry.
    let by_attrs = |vs: &[shared::models::Variant], pairs: &[(&str, &str)]| {
        vs.iter()
            .find(|v| v.attributes == attrs(pairs))
            .cloned()
            .expect("variant by attributes")
    };
    let red_s = by_attrs(&created.variants, &[("Level_1", "Red"), ("Level_2", "S")]);
    let red_m = by_attrs(&created.variants, &[("Level_1", "Red"), ("Level_2", "M")]);
    let blue_s = by_attrs(&created.variants, &[("Level_1", "Blue"), ("Level_2", "S")]);
    let blue_m = by_attrs(&created.variants, &[("Level_1", "Blue"), ("Level_2", "M")]);
    assert_eq!(red_s.media.len(), 1);
    let removed_url = red_s.media[0].url.clone();

    // Remove Red/S media (entry index 0), add a file to Red/M (entry 1).
    let entries: Vec<VariantPayload> = [&red_s, &red_m, &blue_s, &blue_m]
        .iter()
        .map(|v| VariantPayload {
            id: Some(v.id),
            attributes: v.attributes.clone(),
            pricing: v.pricing.clone(),
            stock: v.inventory.stock,
            reserved: v.inventory.reserved,
            low_stock_threshold: v.inventory.low_stock_threshold,
        })
        .collect();
    let mut uploads = UploadSet::default();
    uploads.variant_files.push((1, file("red-m.jpg")));
    let update = ProductUpdate {
        id: created.product.id,
        variants: Some(entries),
        removed_media: vec![removed_url.clone()],
        ..Default::default()
    };
    let updated = state.catalog.update(update, uploads).await.expect("update");

    assert_eq!(updated.variants.len(), 4);
    let find = |id: i64| {
        updated
            .variants
            .iter()
            .find(|v| v.id == id)
            .expect("variant kept")
    };
    assert!(find(red_s.id).media.iter().all(|m| m.url != removed_url));
    assert_eq!(find(red_m.id).media.len(), 1);
    assert!(find(blue_s.id).media.is_empty());
    assert!(find(blue_m.id).media.is_empty());
}

#[tokio::test]
async fn test_omitted_variants_are_left_untouched() {
    let (state, _dir) = test_state().await;

    let payload = ProductCreate {
        name: "Mug".to_string(),
        variants: two_by_two(),
        ..Default::default()
    };
    let created = state.catalog.create(payload, UploadSet::default()).await.expect("create");

    // Update only the first variant's stock; omit the rest entirely.
    let target = &created.variants[0];
    let update = ProductUpdate {
        id: created.product.id,
        variants: Some(vec![VariantPayload {
            id: Some(target.id),
            attributes: target.attributes.clone(),
            pricing: target.pricing.clone(),
            stock: 99,
            ..Default::default()
        }]),
        ..Default::default()
    };
    let updated = state.catalog.update(update, UploadSet::default()).await.expect("update");

    assert_eq!(updated.variants.len(), 4);
    let touched = updated.variants.iter().find(|v| v.id == target.id).unwrap();
    assert_eq!(touched.inventory.stock, 99);
    for original in &created.variants[1..] {
        let kept = updated.variants.iter().find(|v| v.id == original.id).unwrap();
        assert_eq!(kept.inventory.stock, original.inventory.stock);
        assert_eq!(kept.attributes, original.attributes);
    }
}

#[tokio::test]
async fn test_update_appends_new_variant_without_id() {
    let (state, _dir) = test_state().await;

    let payload = ProductCreate {
        name: "Cap".to_string(),
        variants: vec![variant_entry(&[("Size", "S")], 10.0, 1)],
        ..Default::default()
    };
    let created = state.catalog.create(payload, UploadSet::default()).await.expect("create");

    let update = ProductUpdate {
        id: created.product.id,
        variants: Some(vec![variant_entry(&[("Size", "M")], 11.0, 2)]),
        ..Default::default()
    };
    let updated = state.catalog.update(update, UploadSet::default()).await.expect("update");
    assert_eq!(updated.variants.len(), 2);
    assert!(updated
        .variants
        .iter()
        .any(|v| v.attributes.get("Size").map(String::as_str) == Some("M")));
}

#[tokio::test]
async fn test_removed_media_with_missing_file_still_succeeds() {
    let (state, _dir) = test_state().await;

    let mut uploads = UploadSet::default();
    uploads.product_files.push(file("gone.jpg"));
    let payload = ProductCreate {
        name: "Poster".to_string(),
        is_only_product: true,
        pricing: vec![eur(5.0)],
        ..Default::default()
    };
    let created = state.catalog.create(payload, uploads).await.expect("create");
    let url = created.product.media[0].url.clone();

    // Delete the backing bytes out from under the record.
    let path = state.media.resolve(&url).expect("resolve");
    std::fs::remove_file(&path).expect("remove backing file");

    let update = ProductUpdate {
        id: created.product.id,
        removed_media: vec![url.clone()],
        ..Default::default()
    };
    let updated = state.catalog.update(update, UploadSet::default()).await.expect("update");
    assert!(updated.product.media.is_empty());
}

#[tokio::test]
async fn test_concurrent_updates_race_last_write_wins() {
    let (state, _dir) = test_state().await;

    let payload = ProductCreate {
        name: "Lamp".to_string(),
        is_only_product: true,
        pricing: vec![eur(30.0)],
        ..Default::default()
    };
    let created = state.catalog.create(payload, UploadSet::default()).await.expect("create");
    let id = created.product.id;

    // No mutual exclusion around a product id: both writes succeed and the
    // survivor is whichever landed last.
    let a = state.catalog.update(
        ProductUpdate {
            id,
            description: Some("from writer A".to_string()),
            ..Default::default()
        },
        UploadSet::default(),
    );
    let b = state.catalog.update(
        ProductUpdate {
            id,
            description: Some("from writer B".to_string()),
            ..Default::default()
        },
        UploadSet::default(),
    );
    let (ra, rb) = tokio::join!(a, b);
    assert!(ra.is_ok() && rb.is_ok());

    let final_state = state.catalog.get(id, None).await.expect("get");
    assert!(
        final_state.product.description == "from writer A"
            || final_state.product.description == "from writer B"
    );
}

#[tokio::test]
async fn test_delete_cascades_variants_and_cleans_media() {
    let (state, _dir) = test_state().await;

    let mut uploads = UploadSet::default();
    uploads.product_files.push(file("a.jpg"));
    uploads.variant_files.push((0, file("b.jpg")));
    let payload = ProductCreate {
        name: "Jacket".to_string(),
        variants: two_by_two(),
        ..Default::default()
    };
    let created = state.catalog.create(payload, uploads).await.expect("create");

    let mut paths = vec![state.media.resolve(&created.product.media[0].url).unwrap()];
    paths.push(state.media.resolve(&created.variants[0].media[0].url).unwrap());
    for p in &paths {
        assert!(p.exists());
    }

    state.catalog.delete(created.product.id).await.expect("delete");

    match state.catalog.get(created.product.id, None).await {
        Err(AppError::NotFound(_)) => {}
        other => panic!("expected NotFound, got {other:?}"),
    }
    for p in &paths {
        assert!(!p.exists(), "media bytes should be cleaned up");
    }
}

#[tokio::test]
async fn test_explicit_variant_delete_removes_row_and_media() {
    let (state, _dir) = test_state().await;

    let mut uploads = UploadSet::default();
    uploads.variant_files.push((0, file("v0.jpg")));
    let payload = ProductCreate {
        name: "Gloves".to_string(),
        variants: two_by_two(),
        ..Default::default()
    };
    let created = state.catalog.create(payload, uploads).await.expect("create");

    let with_media = created
        .variants
        .iter()
        .find(|v| !v.media.is_empty())
        .expect("variant with media");
    let media_path = state.media.resolve(&with_media.media[0].url).unwrap();
    assert!(media_path.exists());

    state
        .catalog
        .delete_variant(created.product.id, with_media.id)
        .await
        .expect("delete variant");

    let fetched = state.catalog.get(created.product.id, None).await.expect("get");
    assert_eq!(fetched.variants.len(), 3);
    assert!(fetched.variants.iter().all(|v| v.id != with_media.id));
    assert!(!media_path.exists());

    // Wrong parent is refused.
    match state.catalog.delete_variant(42, fetched.variants[0].id).await {
        Err(AppError::Validation(_)) => {}
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[tokio::test]
async fn test_headline_price_is_minimum_across_variants() {
    let (state, _dir) = test_state().await;

    let payload = ProductCreate {
        name: "Bottle".to_string(),
        variants: two_by_two(),
        ..Default::default()
    };
    let created = state.catalog.create(payload, UploadSet::default()).await.expect("create");
    // Cheapest of 20.0 / 22.0 / 21.0 / 23.0
    assert_eq!(created.display_price, 20.0);
    assert!(created.in_stock);
}

#[tokio::test]
async fn test_match_endpoint_resolves_full_selection() {
    let (state, _dir) = test_state().await;

    let payload = ProductCreate {
        name: "Scarf".to_string(),
        variants: two_by_two(),
        ..Default::default()
    };
    let created = state.catalog.create(payload, UploadSet::default()).await.expect("create");

    let selection = attrs(&[("Level_1", "Blue"), ("Level_2", "M")]);
    let matched = state
        .catalog
        .match_variant(created.product.id, &selection)
        .await
        .expect("match")
        .expect("a variant");
    assert_eq!(
        matched.attributes.get("Level_1").map(String::as_str),
        Some("Blue")
    );
    assert_eq!(matched.inventory.stock, 5);

    let miss = attrs(&[("Level_1", "Green"), ("Level_2", "M")]);
    let none = state
        .catalog
        .match_variant(created.product.id, &miss)
        .await
        .expect("match call");
    assert!(none.is_none());
}

#[tokio::test]
async fn test_duplicate_attribute_tuples_are_rejected() {
    let (state, _dir) = test_state().await;

    let payload = ProductCreate {
        name: "Socks".to_string(),
        variants: vec![
            variant_entry(&[("Size", "M")], 5.0, 1),
            variant_entry(&[("Size", "M")], 6.0, 1),
        ],
        ..Default::default()
    };
    match state.catalog.create(payload, UploadSet::default()).await {
        Err(AppError::Validation(_)) => {}
        other => panic!("expected Validation, got {other:?}"),
    }
}

#[tokio::test]
async fn test_update_missing_product_is_not_found() {
    let (state, _dir) = test_state().await;
    let update = ProductUpdate {
        id: 123456789,
        name: Some("ghost".to_string()),
        ..Default::default()
    };
    match state.catalog.update(update, UploadSet::default()).await {
        Err(AppError::NotFound(_)) => {}
        other => panic!("expected NotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn test_sale_price_drives_discount_display() {
    let (state, _dir) = test_state().await;

    let payload = ProductCreate {
        name: "Kettle".to_string(),
        is_only_product: true,
        pricing: vec![PriceEntry::with_sale("EUR", 100.0, 80.0)],
        stock: 2,
        ..Default::default()
    };
    let created = state.catalog.create(payload, UploadSet::default()).await.expect("create");
    assert_eq!(created.display_price, 80.0);
    assert_eq!(created.product.pricing[0].discount_percent(), Some(20));
}
