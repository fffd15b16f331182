//! Supplier repository.

use crate::client::ApiClient;
use crate::error::Result;
use mercantil_common::forms::SupplierPayload;
use mercantil_common::Supplier;
use std::sync::Arc;
use tracing::instrument;

const PATH: &str = "/api/Suppliers";

#[derive(Clone)]
pub struct SupplierRepository {
    api: Arc<ApiClient>,
}

impl SupplierRepository {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Supplier>> {
        let suppliers: Option<Vec<Supplier>> = self.api.get_json(PATH).await?;
        Ok(suppliers.unwrap_or_default())
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i32) -> Result<Supplier> {
        self.api.get_json(&format!("{}/{}", PATH, id)).await
    }

    #[instrument(skip(self, payload))]
    pub async fn create(&self, payload: &SupplierPayload) -> Result<()> {
        self.api.post(PATH, payload).await
    }

    #[instrument(skip(self, payload))]
    pub async fn update(&self, id: i32, payload: &SupplierPayload) -> Result<()> {
        let body = SupplierPayload { id: Some(id), ..payload.clone() };
        self.api.put_json(&format!("{}/{}", PATH, id), &body).await
    }

    /// The API answers 409 while products still reference the supplier.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<()> {
        self.api.delete(&format!("{}/{}", PATH, id)).await
    }
}
