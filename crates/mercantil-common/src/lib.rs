//! mercantil-common: Records, form payloads and errors shared by every Mercantil crate.

pub mod error;
pub mod entities;
pub mod forms;
pub mod money;

// Re-export commonly used types
pub use entities::{Customer, Order, OrderItem, Product, Supplier};
pub use error::{FieldErrors, MercantilError, Result};
