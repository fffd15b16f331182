//! mercantil-console: web console for a small-business REST API.
//! Provides:
//!   - Home dashboard with stat cards and charts
//!   - Customer, product, supplier and order management pages
//!   - Order entry with line items and IVA totals
//!   - Embedded analytics report

pub mod charts;
pub mod error;
pub mod handlers;
pub mod listing;
pub mod order_form;
pub mod router;
pub mod state;
pub mod views;
