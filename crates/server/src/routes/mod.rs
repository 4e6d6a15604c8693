pub mod catalogos;
pub mod health;
pub mod pedidos;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;
use std::time::Duration;
use tower::limit::ConcurrencyLimitLayer;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::db::Repository;
use crate::services::AppState;

/// Maximum concurrent requests (backpressure control)
const MAX_CONCURRENT_REQUESTS: usize = 100;

/// Request timeout in seconds
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// CSV upload cap
const MAX_UPLOAD_BYTES: usize = 30 * 1024 * 1024;

pub fn create_router(state: AppState, repo: Repository, metrics_router: Router) -> Router {
    // Health routes keep their own state: readiness only needs the repo
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/readiness", get(health::readiness_check))
        .with_state(repo);

    let api_routes = Router::new()
        .route(
            "/catalogos",
            get(catalogos::list_catalogs).post(catalogos::create_catalog),
        )
        .route(
            "/catalogos/:id",
            get(catalogos::get_catalog).patch(catalogos::patch_catalog),
        )
        .route("/catalogos/:id/importar", post(catalogos::import_products))
        .route("/catalogos/:id/produtos", get(catalogos::products_by_page))
        .route("/catalogos/:id/busca", get(catalogos::search_products))
        .route("/pedidos", post(pedidos::create_order))
        .route(
            "/pedidos/:id",
            get(pedidos::get_order).patch(pedidos::patch_order),
        )
        .route("/pedidos/:id/itens", put(pedidos::replace_items))
        .route("/pedidos/:id/itens/add", post(pedidos::add_item))
        .route("/pedidos/:id/itens/remove", post(pedidos::remove_item))
        .with_state(state);

    Router::new()
        .merge(api_routes)
        .merge(health_routes)
        .merge(metrics_router)
        .layer(
            ServiceBuilder::new()
                // Trace all requests (outermost)
                .layer(TraceLayer::new_for_http())
                // Request timeout
                .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
                // Concurrency limit for backpressure
                .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_REQUESTS))
                // Buyers load catalogs from another origin
                .layer(CorsLayer::permissive())
                // Room for CSV uploads
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
}
