//! Shared application state for the console.

use std::sync::Arc;

use mercantil_client::{
    ApiClient, CustomerRepository, OrderItemRepository, OrderRepository, ProductRepository,
    SupplierRepository,
};
use mercantil_config::{AnalyticsConfig, Config, ConsoleConfig};

use crate::error::Result;
use crate::views::Views;

/// Shared state injected into every Axum handler.
pub struct AppState {
    pub customers: CustomerRepository,
    pub products: ProductRepository,
    pub suppliers: SupplierRepository,
    pub orders: OrderRepository,
    pub order_items: OrderItemRepository,
    pub views: Views,
    pub console: ConsoleConfig,
    pub analytics: AnalyticsConfig,
    pub static_dir: String,
}

impl AppState {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let api = Arc::new(ApiClient::from_config(&config.api)?);
        Ok(Self::with_client(api, config)?)
    }

    pub fn with_client(api: Arc<ApiClient>, config: &Config) -> Result<Self> {
        Ok(Self {
            customers: CustomerRepository::new(api.clone()),
            products: ProductRepository::new(api.clone()),
            suppliers: SupplierRepository::new(api.clone()),
            orders: OrderRepository::new(api.clone()),
            order_items: OrderItemRepository::new(api),
            views: Views::new(&config.console.currency_symbol)?,
            console: config.console.clone(),
            analytics: config.analytics.clone(),
            static_dir: config.server.static_dir.clone(),
        })
    }
}

pub type SharedState = Arc<AppState>;
