//! Order item repository.

use crate::client::ApiClient;
use crate::error::Result;
use mercantil_common::forms::{OrderItemPayload, OrderItemUpdate};
use mercantil_common::OrderItem;
use std::sync::Arc;
use tracing::instrument;

const PATH: &str = "/api/OrderItems";

#[derive(Clone)]
pub struct OrderItemRepository {
    api: Arc<ApiClient>,
}

impl OrderItemRepository {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<OrderItem>> {
        let items: Option<Vec<OrderItem>> = self.api.get_json(PATH).await?;
        Ok(items.unwrap_or_default())
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i32) -> Result<OrderItem> {
        self.api.get_json(&format!("{}/{}", PATH, id)).await
    }

    /// Create an item. The stored record comes back when the API answers
    /// with a body; an empty 201/204 yields `None`.
    #[instrument(skip(self, payload))]
    pub async fn create(&self, payload: &OrderItemPayload) -> Result<Option<OrderItem>> {
        self.api.post_json(PATH, payload).await
    }

    #[instrument(skip(self, update))]
    pub async fn update(&self, id: i32, update: &OrderItemUpdate) -> Result<()> {
        self.api.put_json(&format!("{}/{}", PATH, id), update).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<()> {
        self.api.delete(&format!("{}/{}", PATH, id)).await
    }
}
