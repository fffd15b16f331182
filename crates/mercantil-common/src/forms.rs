//! Form input (what the browser submits) and payloads (what the remote API accepts).
//!
//! Inputs keep every field as submitted text so a rejected form can be shown
//! again unchanged. `validate` applies the required-field rules and converts
//! the input into the typed payload.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entities::{Customer, Product, Supplier};
use crate::error::{FieldErrors, MercantilError, Result};

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn require(errors: &mut FieldErrors, field: &str, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        errors.add(field, "is required");
    }
    trimmed.to_string()
}

fn check_email(errors: &mut FieldErrors, value: &Option<String>) {
    if let Some(email) = value {
        if !email.contains('@') {
            errors.add("email", "must be a valid email address");
        }
    }
}

/// Parse a decimal amount typed into a form. Accepts `,` as decimal separator.
pub fn parse_amount(field: &str, raw: &str) -> Result<f64> {
    let normalised = raw.trim().replace(',', ".");
    normalised
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| MercantilError::InvalidNumber {
            field: field.to_string(),
            value: raw.to_string(),
        })
}

/// Parse an HTML `<input type="date">` value.
pub fn parse_form_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| MercantilError::InvalidDate(raw.to_string()))
}

// ── Customer ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerInput {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub birth_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    pub first_name: String,
    pub last_name: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<NaiveDate>,
}

impl CustomerInput {
    pub fn validate(&self) -> Result<CustomerPayload> {
        let mut errors = FieldErrors::new();
        let first_name = require(&mut errors, "firstName", &self.first_name);
        let last_name = require(&mut errors, "lastName", &self.last_name);
        let email = non_blank(&self.email);
        check_email(&mut errors, &email);

        let birth_date = match non_blank(&self.birth_date) {
            Some(raw) => match parse_form_date(&raw) {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.add("birthDate", "must be a date (YYYY-MM-DD)");
                    None
                }
            },
            None => None,
        };

        errors.into_result()?;
        Ok(CustomerPayload {
            id: None,
            first_name,
            last_name,
            city: non_blank(&self.city),
            country: non_blank(&self.country),
            phone: non_blank(&self.phone),
            email,
            birth_date,
        })
    }
}

impl From<&Customer> for CustomerInput {
    fn from(c: &Customer) -> Self {
        Self {
            first_name: c.first_name.clone(),
            last_name: c.last_name.clone(),
            city: c.city.clone().unwrap_or_default(),
            country: c.country.clone().unwrap_or_default(),
            phone: c.phone.clone().unwrap_or_default(),
            email: c.email.clone().unwrap_or_default(),
            birth_date: c
                .birth_date
                .as_deref()
                .and_then(crate::entities::parse_api_date)
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }
}

// ── Supplier ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupplierInput {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub contact_name: String,
    #[serde(default)]
    pub contact_title: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub fax: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SupplierPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    pub company_name: String,
    pub contact_name: Option<String>,
    pub contact_title: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub phone: Option<String>,
    pub fax: Option<String>,
    pub email: Option<String>,
}

impl SupplierInput {
    pub fn validate(&self) -> Result<SupplierPayload> {
        let mut errors = FieldErrors::new();
        let company_name = require(&mut errors, "companyName", &self.company_name);
        let email = non_blank(&self.email);
        check_email(&mut errors, &email);
        errors.into_result()?;

        Ok(SupplierPayload {
            id: None,
            company_name,
            contact_name: non_blank(&self.contact_name),
            contact_title: non_blank(&self.contact_title),
            city: non_blank(&self.city),
            country: non_blank(&self.country),
            phone: non_blank(&self.phone),
            fax: non_blank(&self.fax),
            email,
        })
    }
}

impl From<&Supplier> for SupplierInput {
    fn from(s: &Supplier) -> Self {
        Self {
            company_name: s.company_name.clone(),
            contact_name: s.contact_name.clone().unwrap_or_default(),
            contact_title: s.contact_title.clone().unwrap_or_default(),
            city: s.city.clone().unwrap_or_default(),
            country: s.country.clone().unwrap_or_default(),
            phone: s.phone.clone().unwrap_or_default(),
            fax: s.fax.clone().unwrap_or_default(),
            email: s.email.clone().unwrap_or_default(),
        }
    }
}

// ── Product ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductInput {
    #[serde(default)]
    pub product_name: String,
    #[serde(default)]
    pub supplier_id: String,
    #[serde(default)]
    pub unit_price: String,
    #[serde(default)]
    pub package: String,
    /// HTML checkboxes submit `on` when ticked and nothing otherwise.
    #[serde(default)]
    pub is_discontinued: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    pub product_name: String,
    pub supplier_id: i32,
    pub unit_price: f64,
    pub package: Option<String>,
    pub is_discontinued: bool,
}

impl ProductInput {
    pub fn discontinued(&self) -> bool {
        matches!(self.is_discontinued.as_deref(), Some("on" | "true" | "1"))
    }

    pub fn validate(&self) -> Result<ProductPayload> {
        let mut errors = FieldErrors::new();
        let product_name = require(&mut errors, "productName", &self.product_name);

        let supplier_id = match self.supplier_id.trim().parse::<i32>() {
            Ok(id) if id > 0 => id,
            _ => {
                errors.add("supplierId", "is required");
                0
            }
        };

        let unit_price = match parse_amount("unitPrice", &self.unit_price) {
            Ok(price) if price >= 0.0 => price,
            Ok(_) => {
                errors.add("unitPrice", "must not be negative");
                0.0
            }
            Err(_) => {
                errors.add("unitPrice", "must be a number");
                0.0
            }
        };

        errors.into_result()?;
        Ok(ProductPayload {
            id: None,
            product_name,
            supplier_id,
            unit_price,
            package: non_blank(&self.package),
            is_discontinued: self.discontinued(),
        })
    }
}

impl From<&Product> for ProductInput {
    fn from(p: &Product) -> Self {
        Self {
            product_name: p.product_name.clone(),
            supplier_id: p.supplier_id.to_string(),
            unit_price: format!("{:.2}", p.unit_price),
            package: p.package.clone().unwrap_or_default(),
            is_discontinued: p.is_discontinued.then(|| "on".to_string()),
        }
    }
}

// ── Order ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    pub order_number: String,
    pub order_date: NaiveDate,
    pub customer_id: i32,
    pub total_amount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemPayload {
    pub order_id: i32,
    pub product_id: i32,
    pub quantity: u32,
    pub unit_price: f64,
}

/// Body of `PUT /api/OrderItems/{id}`: only quantity and price change.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemUpdate {
    pub quantity: u32,
    pub unit_price: f64,
}
