//! Axum router: maps all URL paths to handlers.

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::{compression::CompressionLayer, services::ServeDir, trace::TraceLayer};

use crate::handlers::{analytics, customers, dashboard, orders, products, suppliers, system};
use crate::state::{AppState, SharedState};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let static_dir = state.static_dir.clone();
    let shared: SharedState = Arc::new(state);

    Router::new()
        // Pages
        .route("/",          get(dashboard::dashboard))
        .route("/analytics", get(analytics::analytics_page))

        .route("/customers",             get(customers::list))
        .route("/customers/new",         get(customers::new_form).post(customers::create))
        .route("/customers/{id}/edit",   get(customers::edit_form).post(customers::update))
        .route("/customers/{id}/delete", get(customers::confirm_delete).post(customers::delete))

        .route("/products",             get(products::list))
        .route("/products/new",         get(products::new_form).post(products::create))
        .route("/products/{id}/edit",   get(products::edit_form).post(products::update))
        .route("/products/{id}/delete", get(products::confirm_delete).post(products::delete))

        .route("/suppliers",             get(suppliers::list))
        .route("/suppliers/new",         get(suppliers::new_form).post(suppliers::create))
        .route("/suppliers/{id}/edit",   get(suppliers::edit_form).post(suppliers::update))
        .route("/suppliers/{id}/delete", get(suppliers::confirm_delete).post(suppliers::delete))

        .route("/orders",             get(orders::list))
        .route("/orders/new",         get(orders::new_form).post(orders::submit_new))
        .route("/orders/{id}/edit",   get(orders::edit_form).post(orders::submit_edit))
        .route("/orders/{id}/delete", get(orders::confirm_delete).post(orders::delete))

        // API endpoints
        .route("/api/dashboard", get(dashboard::api_dashboard))
        .route("/healthz",       get(system::healthz))

        // Static files
        .route("/assets/main.css", get(system::stylesheet))
        .nest_service("/static", ServeDir::new(static_dir))

        // Middleware
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
