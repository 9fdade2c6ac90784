//! Product API module
//!
//! | Path | Method | Meaning |
//! |------|--------|---------|
//! | /api/products | GET | list all products with variants |
//! | /api/products | POST | create product (multipart) |
//! | /api/products | PUT | update product (multipart, `id` field) |
//! | /api/products/{id} | GET | fetch one product with variants |
//! | /api/products/{id} | DELETE | delete product, variants and media |
//! | /api/products/{id}/match | GET | resolve an attribute selection to a variant |
//! | /api/products/{id}/variants/{variant_id} | DELETE | remove one variant |

mod handler;

use axum::{
    routing::{delete, get},
    Router,
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/products", product_routes())
}

fn product_routes() -> Router<ServerState> {
    Router::new()
        .route(
            "/",
            get(handler::list)
                .post(handler::create)
                .put(handler::update),
        )
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
        .route("/{id}/match", get(handler::match_variant))
        .route(
            "/{id}/variants/{variant_id}",
            delete(handler::delete_variant),
        )
}
