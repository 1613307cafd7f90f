use axum::{middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;

use error::{handle_panic, normalize_errors};
use routes::{
    books::{book_detail, bestsellers, method_not_allowed, not_found},
    health::health_check,
};
use services::cache::CachedCatalog;
use services::catalog::{Catalog, MockCatalog};

/// The mock catalog behind a bestseller cache, as served in production.
pub fn default_catalog() -> Catalog {
    Arc::new(CachedCatalog::new(MockCatalog::new()))
}

pub fn build_router(catalog: Catalog) -> Router {
    Router::new()
        .route("/status", get(health_check).fallback(method_not_allowed))
        .route(
            "/books/bestsellers",
            get(bestsellers).fallback(method_not_allowed),
        )
        .route("/books/:id", get(book_detail).fallback(method_not_allowed))
        .fallback(not_found)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn(normalize_errors))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(catalog)
}
