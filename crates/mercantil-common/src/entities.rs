/// Business records as the remote REST API serves them.
/// Field names are camelCase on the wire; ids are assigned by the API.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Customer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: i32,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
}

impl Customer {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

// ---------------------------------------------------------------------------
// Supplier
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: i32,
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub contact_name: Option<String>,
    #[serde(default)]
    pub contact_title: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub fax: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

// ---------------------------------------------------------------------------
// Product
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i32,
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub supplier_id: i32,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub is_discontinued: bool,
    /// Present only when the API expands the relation.
    #[serde(default, skip_serializing)]
    pub supplier: Option<Supplier>,
}

// ---------------------------------------------------------------------------
// Order
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i32,
    #[serde(default)]
    pub order_number: String,
    /// Raw date as sent by the API, usually `2024-03-05T00:00:00`.
    #[serde(default)]
    pub order_date: Option<String>,
    #[serde(default)]
    pub customer_id: i32,
    #[serde(default)]
    pub total_amount: f64,
    #[serde(default, skip_serializing)]
    pub customer: Option<Customer>,
}

impl Order {
    pub fn date(&self) -> Option<NaiveDate> {
        self.order_date.as_deref().and_then(parse_api_date)
    }
}

// ---------------------------------------------------------------------------
// Order item
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: i32,
    #[serde(default)]
    pub order_id: i32,
    #[serde(default)]
    pub product_id: i32,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub unit_price: f64,
    #[serde(default, skip_serializing)]
    pub product: Option<Product>,
}

impl OrderItem {
    pub fn line_total(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

/// Parse the date formats the API emits: RFC 3339, naive date-time
/// (with or without fractional seconds) and plain `YYYY-MM-DD`.
pub fn parse_api_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
