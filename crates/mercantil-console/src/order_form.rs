//! Order drafts: the editable state of the order form between requests.
//!
//! The server keeps nothing between "add line", "remove line" and "save".
//! Header fields travel as ordinary inputs; lines and the ids of persisted
//! lines removed in this edit travel as JSON in the `draft` hidden field.

use mercantil_common::forms::{parse_amount, parse_form_date, OrderPayload};
use mercantil_common::money::round_cents;
use mercantil_common::{FieldErrors, MercantilError, Order, OrderItem, Product};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DraftLine {
    /// Id of the persisted order item, `None` for lines added in this form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_id: Option<i32>,
    pub product_id: i32,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: f64,
}

impl DraftLine {
    pub fn total(&self) -> f64 {
        round_cents(self.unit_price * f64::from(self.quantity))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Carried {
    #[serde(default)]
    lines: Vec<DraftLine>,
    #[serde(default)]
    removed_item_ids: Vec<i32>,
}

/// What the order form posts back.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderFormInput {
    #[serde(default)]
    pub order_number: String,
    #[serde(default)]
    pub order_date: String,
    #[serde(default)]
    pub customer_id: String,
    #[serde(default)]
    pub draft: String,
    #[serde(default)]
    pub product_id: String,
    #[serde(default)]
    pub quantity: String,
    #[serde(default)]
    pub unit_price: String,
    #[serde(default)]
    pub action: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormAction {
    AddLine,
    RemoveLine(usize),
    Save,
    /// Unrecognised button value: show the form again, change nothing.
    Redisplay,
}

impl FormAction {
    /// `add`, `remove:{index}`, and `save` or blank (Enter in a field).
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "" | "save" => FormAction::Save,
            "add" => FormAction::AddLine,
            other => other
                .strip_prefix("remove:")
                .and_then(|idx| idx.parse().ok())
                .map(FormAction::RemoveLine)
                .unwrap_or(FormAction::Redisplay),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Totals {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct LineView {
    pub index: usize,
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: f64,
    pub total: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub order_number: String,
    pub order_date: String,
    pub customer_id: String,
    pub lines: Vec<DraftLine>,
    pub removed_item_ids: Vec<i32>,
}

impl OrderDraft {
    /// Draft for a new order dated `today`.
    pub fn new(today: chrono::NaiveDate) -> Self {
        Self {
            order_date: today.format("%Y-%m-%d").to_string(),
            ..Default::default()
        }
    }

    /// Draft for editing a persisted order and its items.
    pub fn from_order(order: &Order, items: &[OrderItem], products: &[Product]) -> Self {
        let lines = items
            .iter()
            .map(|item| DraftLine {
                item_id: Some(item.id),
                product_id: item.product_id,
                product_name: product_name(item, products),
                quantity: item.quantity,
                unit_price: item.unit_price,
            })
            .collect();

        Self {
            order_number: order.order_number.clone(),
            order_date: order
                .date()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            customer_id: order.customer_id.to_string(),
            lines,
            removed_item_ids: Vec::new(),
        }
    }

    /// Rebuild the draft from a submitted form.
    pub fn from_input(input: &OrderFormInput) -> Result<Self, MercantilError> {
        let carried: Carried = if input.draft.trim().is_empty() {
            Carried::default()
        } else {
            serde_json::from_str(&input.draft)?
        };
        Ok(Self {
            order_number: input.order_number.trim().to_string(),
            order_date: input.order_date.trim().to_string(),
            customer_id: input.customer_id.trim().to_string(),
            lines: carried.lines,
            removed_item_ids: carried.removed_item_ids,
        })
    }

    /// Value of the `draft` hidden field.
    pub fn carried_json(&self) -> Result<String, MercantilError> {
        let carried = Carried {
            lines: self.lines.clone(),
            removed_item_ids: self.removed_item_ids.clone(),
        };
        Ok(serde_json::to_string(&carried)?)
    }

    /// Add a line from the product picker. A blank unit price takes the
    /// catalogue price of the selected product.
    pub fn add_line(&mut self, input: &OrderFormInput, products: &[Product]) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();

        let product = input
            .product_id
            .trim()
            .parse::<i32>()
            .ok()
            .and_then(|id| products.iter().find(|p| p.id == id));
        if product.is_none() {
            errors.add("productId", "select a product");
        }

        let quantity = match input.quantity.trim().parse::<u32>() {
            Ok(q) if q >= 1 => q,
            _ => {
                errors.add("quantity", "must be a whole number of at least 1");
                0
            }
        };

        let unit_price = if input.unit_price.trim().is_empty() {
            product.map(|p| p.unit_price).unwrap_or_default()
        } else {
            match parse_amount("unitPrice", &input.unit_price) {
                Ok(price) if price >= 0.0 => price,
                Ok(_) => {
                    errors.add("unitPrice", "must not be negative");
                    0.0
                }
                Err(_) => {
                    errors.add("unitPrice", "must be a number");
                    0.0
                }
            }
        };

        let Some(product) = product.filter(|_| errors.is_empty()) else {
            return Err(errors);
        };
        self.lines.push(DraftLine {
            item_id: None,
            product_id: product.id,
            product_name: product.product_name.clone(),
            quantity,
            unit_price: round_cents(unit_price),
        });
        Ok(())
    }

    /// Remove a line; a persisted one is remembered so saving deletes it.
    pub fn remove_line(&mut self, index: usize) -> Option<DraftLine> {
        if index >= self.lines.len() {
            return None;
        }
        let line = self.lines.remove(index);
        if let Some(id) = line.item_id {
            self.removed_item_ids.push(id);
        }
        Some(line)
    }

    pub fn totals(&self, tax_rate: f64) -> Totals {
        let subtotal = round_cents(self.lines.iter().map(DraftLine::total).sum());
        let tax = round_cents(subtotal * tax_rate);
        Totals {
            subtotal,
            tax,
            total: round_cents(subtotal + tax),
        }
    }

    pub fn line_views(&self) -> Vec<LineView> {
        self.lines
            .iter()
            .enumerate()
            .map(|(index, line)| LineView {
                index,
                product_name: line.product_name.clone(),
                quantity: line.quantity,
                unit_price: line.unit_price,
                total: line.total(),
            })
            .collect()
    }

    /// Check the header and lines and build the order body. `totalAmount`
    /// is the tax-inclusive total.
    pub fn validate(&self, tax_rate: f64) -> Result<OrderPayload, MercantilError> {
        let mut errors = FieldErrors::new();

        if self.order_number.trim().is_empty() {
            errors.add("orderNumber", "is required");
        }
        let order_date = match parse_form_date(&self.order_date) {
            Ok(date) => Some(date),
            Err(_) if self.order_date.trim().is_empty() => {
                errors.add("orderDate", "is required");
                None
            }
            Err(_) => {
                errors.add("orderDate", "must be a date (YYYY-MM-DD)");
                None
            }
        };
        let customer_id = match self.customer_id.trim().parse::<i32>() {
            Ok(id) if id > 0 => id,
            _ => {
                errors.add("customerId", "select a customer");
                0
            }
        };
        if self.lines.is_empty() {
            errors.add("items", "add at least one product");
        }
        // Lines come back from the browser, so they are checked again here.
        for (n, line) in self.lines.iter().enumerate() {
            let n = n + 1;
            if line.product_id <= 0 {
                errors.add("items", format!("line {n}: select a product"));
            }
            if line.quantity < 1 {
                errors.add("items", format!("line {n}: quantity must be at least 1"));
            }
            if !line.unit_price.is_finite() || line.unit_price < 0.0 {
                errors.add("items", format!("line {n}: unit price must not be negative"));
            }
        }

        errors.into_result()?;
        Ok(OrderPayload {
            id: None,
            order_number: self.order_number.trim().to_string(),
            order_date: order_date.unwrap_or_default(),
            customer_id,
            total_amount: self.totals(tax_rate).total,
        })
    }
}

fn product_name(item: &OrderItem, products: &[Product]) -> String {
    item.product
        .as_ref()
        .map(|p| p.product_name.clone())
        .or_else(|| {
            products
                .iter()
                .find(|p| p.id == item.product_id)
                .map(|p| p.product_name.clone())
        })
        .unwrap_or_else(|| format!("Product #{}", item.product_id))
}
