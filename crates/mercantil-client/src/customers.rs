//! Customer repository.
//!
//! CRUD over `/api/Customers`.

use crate::client::ApiClient;
use crate::error::Result;
use mercantil_common::forms::CustomerPayload;
use mercantil_common::Customer;
use std::sync::Arc;
use tracing::instrument;

const PATH: &str = "/api/Customers";

/// Repository for customer operations.
#[derive(Clone)]
pub struct CustomerRepository {
    api: Arc<ApiClient>,
}

impl CustomerRepository {
    pub fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// All customers. A `null` body counts as an empty list.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Customer>> {
        let customers: Option<Vec<Customer>> = self.api.get_json(PATH).await?;
        Ok(customers.unwrap_or_default())
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i32) -> Result<Customer> {
        self.api.get_json(&format!("{}/{}", PATH, id)).await
    }

    #[instrument(skip(self, payload))]
    pub async fn create(&self, payload: &CustomerPayload) -> Result<()> {
        self.api.post(PATH, payload).await
    }

    #[instrument(skip(self, payload))]
    pub async fn update(&self, id: i32, payload: &CustomerPayload) -> Result<()> {
        let body = CustomerPayload { id: Some(id), ..payload.clone() };
        self.api.put_json(&format!("{}/{}", PATH, id), &body).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<()> {
        self.api.delete(&format!("{}/{}", PATH, id)).await
    }
}
