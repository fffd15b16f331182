//! Console error type and the user-facing wording of remote failures.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mercantil_client::ClientError;
use mercantil_common::{FieldErrors, MercantilError};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConsoleError>;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Form(#[from] MercantilError),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),
}

impl ConsoleError {
    pub fn status(&self) -> StatusCode {
        match self {
            ConsoleError::Client(ClientError::NotFound(_)) => StatusCode::NOT_FOUND,
            ConsoleError::Client(ClientError::Conflict(_)) => StatusCode::CONFLICT,
            ConsoleError::Client(ClientError::Validation(_)) | ConsoleError::Form(_) => {
                StatusCode::BAD_REQUEST
            }
            ConsoleError::Client(_) => StatusCode::BAD_GATEWAY,
            ConsoleError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ConsoleError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, self.to_string()).into_response()
    }
}

/// JSON flavour of [`ConsoleError`] for the `/api` endpoints.
#[derive(Debug)]
pub struct JsonError(pub ConsoleError);

impl<E: Into<ConsoleError>> From<E> for JsonError {
    fn from(err: E) -> Self {
        JsonError(err.into())
    }
}

impl IntoResponse for JsonError {
    fn into_response(self) -> Response {
        let status = self.0.status();
        tracing::warn!(error = %self.0, "API request failed");
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Customer,
    Product,
    Supplier,
    Order,
}

impl Entity {
    pub fn label(self) -> &'static str {
        match self {
            Entity::Customer => "customer",
            Entity::Product => "product",
            Entity::Supplier => "supplier",
            Entity::Order => "order",
        }
    }

    /// List page of the entity.
    pub fn list_path(self) -> &'static str {
        match self {
            Entity::Customer => "/customers",
            Entity::Product => "/products",
            Entity::Supplier => "/suppliers",
            Entity::Order => "/orders",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Load,
    Create,
    Update,
    Delete,
}

impl Action {
    fn verb(self) -> &'static str {
        match self {
            Action::Load => "load",
            Action::Create => "create",
            Action::Update => "update",
            Action::Delete => "delete",
        }
    }
}

/// Human label for a wire field name.
pub fn field_label(field: &str) -> String {
    let label = match field {
        "firstName" => "First name",
        "lastName" => "Last name",
        "email" => "Email",
        "birthDate" => "Birth date",
        "city" => "City",
        "country" => "Country",
        "phone" => "Phone",
        "fax" => "Fax",
        "companyName" => "Company name",
        "contactName" => "Contact name",
        "contactTitle" => "Contact title",
        "productName" => "Product name",
        "supplierId" => "Supplier",
        "unitPrice" => "Unit price",
        "package" => "Package",
        "isDiscontinued" => "Discontinued",
        "orderNumber" => "Order number",
        "orderDate" => "Order date",
        "customerId" => "Customer",
        "productId" => "Product",
        "quantity" => "Quantity",
        "items" => "Order lines",
        "totalAmount" => "Total",
        other => return other.to_string(),
    };
    label.to_string()
}

/// `First name: is required; Email: must be a valid email address`.
pub fn describe_fields(errors: &FieldErrors) -> String {
    errors
        .iter()
        .map(|(field, messages)| format!("{}: {}", field_label(field), messages.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Alert banner text for a failed remote call.
pub fn user_message(err: &ClientError, entity: Entity, action: Action) -> String {
    match err {
        ClientError::NotFound(_) => {
            format!("The {} was not found or already deleted.", entity.label())
        }
        ClientError::Conflict(_) if entity == Entity::Supplier && action == Action::Delete => {
            "Cannot delete the supplier because it has associated products.".to_string()
        }
        ClientError::Conflict(message) => {
            format!("Could not {} the {}: {}", action.verb(), entity.label(), message)
        }
        ClientError::Validation(fields) => format!("Validation errors: {}", describe_fields(fields)),
        ClientError::Transport(_) => "Could not connect to the server.".to_string(),
        ClientError::Remote { message, .. } => {
            format!("Could not {} the {}: {}", action.verb(), entity.label(), message)
        }
        ClientError::Decode { .. } => {
            format!("Could not {} the {}: unexpected response from the server.", action.verb(), entity.label())
        }
        ClientError::InvalidUrl(_) => err.to_string(),
    }
}

/// Success banner for the `notice` query parameter of list pages.
pub fn notice_message(entity: Entity, notice: &str) -> Option<String> {
    let label = entity.label();
    let mut capitalised = label.to_string();
    if let Some(first) = capitalised.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    match notice {
        "created" => Some(format!("{} created.", capitalised)),
        "updated" => Some(format!("{} updated.", capitalised)),
        "deleted" => Some(format!("{} deleted.", capitalised)),
        _ => None,
    }
}
