//! HTTP handlers for all console routes.

pub mod analytics;
pub mod customers;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod suppliers;
pub mod system;

use axum::response::{IntoResponse, Redirect, Response};
use mercantil_client::ClientError;
use mercantil_common::{FieldErrors, MercantilError};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{user_message, Action, ConsoleError, Entity};

/// Query string of the list pages.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub q: Option<String>,
    pub page: Option<String>,
    pub notice: Option<String>,
}

/// 303 back to the list with a success banner.
pub fn redirect_with_notice(entity: Entity, notice: &str) -> Response {
    Redirect::to(&format!("{}?notice={}", entity.list_path(), notice)).into_response()
}

/// Keep the rows of a successful fetch; otherwise log, queue an alert and
/// carry on with nothing.
pub fn settle<T>(
    result: Result<Vec<T>, ClientError>,
    entity: Entity,
    alerts: &mut Vec<String>,
) -> Vec<T> {
    match result {
        Ok(rows) => rows,
        Err(e) => {
            warn!(entity = entity.label(), error = %e, "Fetch failed");
            alerts.push(user_message(&e, entity, Action::Load));
            Vec::new()
        }
    }
}

/// A rejected form submission: banner text plus per-field messages.
#[derive(Debug, Default, Serialize)]
pub struct Failure {
    pub message: String,
    pub fields: FieldErrors,
}

impl Failure {
    pub fn new(err: &ConsoleError, entity: Entity, action: Action) -> Self {
        match err {
            ConsoleError::Form(MercantilError::Validation(fields)) => Self {
                message: "Please correct the highlighted fields.".to_string(),
                fields: fields.clone(),
            },
            ConsoleError::Client(client) => Self::client(client, entity, action),
            other => Self { message: other.to_string(), fields: FieldErrors::new() },
        }
    }

    pub fn client(err: &ClientError, entity: Entity, action: Action) -> Self {
        warn!(entity = entity.label(), error = %err, "Remote call failed");
        let fields = match err {
            ClientError::Validation(fields) => fields.clone(),
            _ => FieldErrors::new(),
        };
        Self { message: user_message(err, entity, action), fields }
    }
}
