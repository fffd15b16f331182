//! Product repository.

use crate::client::ApiClient;
use crate::error::Result;
use mercantil_common::forms::ProductPayload;
use mercantil_common::Product;
use std::sync::Arc;
use tracing::instrument;

const PATH: &str = "/api/Products";

#[derive(Clone)]
pub struct ProductRepository {
    api: Arc<ApiClient>,
}

impl ProductRepository {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Product>> {
        let products: Option<Vec<Product>> = self.api.get_json(PATH).await?;
        Ok(products.unwrap_or_default())
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i32) -> Result<Product> {
        self.api.get_json(&format!("{}/{}", PATH, id)).await
    }

    #[instrument(skip(self, payload))]
    pub async fn create(&self, payload: &ProductPayload) -> Result<()> {
        self.api.post(PATH, payload).await
    }

    /// The API rejects product updates whose body lacks the id.
    #[instrument(skip(self, payload))]
    pub async fn update(&self, id: i32, payload: &ProductPayload) -> Result<()> {
        let body = ProductPayload { id: Some(id), ..payload.clone() };
        self.api.put_json(&format!("{}/{}", PATH, id), &body).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<()> {
        self.api.delete(&format!("{}/{}", PATH, id)).await
    }
}
