//! Mercantil REST client
//!
//! Typed access to the business REST API (customers, products, suppliers,
//! orders and order items). One repository per remote resource, all sharing a
//! single [`ApiClient`].
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use mercantil_client::{ApiClient, CustomerRepository};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let api = Arc::new(ApiClient::new("https://localhost:7177", Duration::from_secs(30), false)?);
//! let customers = CustomerRepository::new(api).list().await?;
//! println!("{} customers", customers.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod customers;
pub mod products;
pub mod suppliers;
pub mod orders;
pub mod order_items;

pub use client::ApiClient;
pub use error::{ClientError, Result};
pub use customers::CustomerRepository;
pub use products::ProductRepository;
pub use suppliers::SupplierRepository;
pub use orders::OrderRepository;
pub use order_items::OrderItemRepository;
