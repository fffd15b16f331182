//! Order repository.
//!
//! Orders own their items on the API side only by `orderId`; deleting an
//! order does not cascade, so callers remove the items first.

use crate::client::ApiClient;
use crate::error::Result;
use mercantil_common::forms::OrderPayload;
use mercantil_common::{Order, OrderItem};
use std::sync::Arc;
use tracing::instrument;

const PATH: &str = "/api/Orders";

#[derive(Clone)]
pub struct OrderRepository {
    api: Arc<ApiClient>,
}

impl OrderRepository {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Order>> {
        let orders: Option<Vec<Order>> = self.api.get_json(PATH).await?;
        Ok(orders.unwrap_or_default())
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i32) -> Result<Order> {
        self.api.get_json(&format!("{}/{}", PATH, id)).await
    }

    /// Items of one order.
    #[instrument(skip(self))]
    pub async fn items(&self, order_id: i32) -> Result<Vec<OrderItem>> {
        let items: Option<Vec<OrderItem>> = self
            .api
            .get_json(&format!("{}/{}/OrderItems", PATH, order_id))
            .await?;
        Ok(items.unwrap_or_default())
    }

    /// Create an order and return it as stored, including its new id.
    #[instrument(skip(self, payload))]
    pub async fn create(&self, payload: &OrderPayload) -> Result<Order> {
        self.api.post_json(PATH, payload).await
    }

    #[instrument(skip(self, payload))]
    pub async fn update(&self, id: i32, payload: &OrderPayload) -> Result<()> {
        let body = OrderPayload { id: Some(id), ..payload.clone() };
        self.api.put_json(&format!("{}/{}", PATH, id), &body).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<()> {
        self.api.delete(&format!("{}/{}", PATH, id)).await
    }
}
