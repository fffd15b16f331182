//! Shared HTTP client for the business API.

use std::collections::BTreeMap;
use std::time::Duration;

use mercantil_common::FieldErrors;
use mercantil_config::ApiConfig;
use reqwest::{Client, ClientBuilder, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::error::{ClientError, Result};

/// ASP.NET-style problem details body returned on errors.
#[derive(Debug, Default, Deserialize)]
struct ProblemDetails {
    title: Option<String>,
    errors: Option<BTreeMap<String, Vec<String>>>,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration, accept_invalid_certs: bool) -> Result<Self> {
        Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", base_url, e)))?;

        let client = ClientBuilder::new()
            .timeout(timeout)
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        if config.accept_invalid_certs {
            warn!("TLS certificate validation is disabled for the business API");
        }
        Self::new(
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
            config.accept_invalid_certs,
        )
    }

    /// `path` is absolute (`/api/Customers/3`) and is appended to the base URL,
    /// so a base URL with a path prefix keeps it.
    fn url(&self, path: &str) -> Result<Url> {
        let full = format!("{}{}", self.base_url, path);
        Url::parse(&full).map_err(|e| ClientError::InvalidUrl(format!("{}: {}", full, e)))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        Ok(self.client.request(method, self.url(path)?))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let resp = self.send(self.request(Method::GET, path)?, path).await?;
        decode(resp, path).await
    }

    /// POST and decode the created record from the response body.
    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let resp = self.send(self.request(Method::POST, path)?.json(body), path).await?;
        decode(resp, path).await
    }

    /// POST and ignore whatever the API answers on success.
    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        self.send(self.request(Method::POST, path)?.json(body), path).await?;
        Ok(())
    }

    pub async fn put_json<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<()> {
        self.send(self.request(Method::PUT, path)?.json(body), path).await?;
        Ok(())
    }

    pub async fn delete(&self, path: &str) -> Result<()> {
        self.send(self.request(Method::DELETE, path)?, path).await?;
        Ok(())
    }

    async fn send(&self, request: RequestBuilder, path: &str) -> Result<Response> {
        let resp = request.send().await?;
        let status = resp.status();
        debug!(%path, status = status.as_u16(), "API response");
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        Err(error_from_response(status, path, &body))
    }
}

async fn decode<T: DeserializeOwned>(resp: Response, path: &str) -> Result<T> {
    let bytes = resp.bytes().await?;
    // An empty body decodes like JSON `null` so `Option`/`Vec` wrappers can
    // absorb 204 responses.
    let bytes: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) { b"null" } else { &bytes };
    serde_json::from_slice(bytes).map_err(|source| ClientError::Decode {
        path: path.to_string(),
        source,
    })
}

/// `ProductName` / `$.productName` → `productName`.
fn normalise_field(key: &str) -> String {
    let key = key.trim_start_matches("$.");
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub(crate) fn error_from_response(status: StatusCode, path: &str, body: &str) -> ClientError {
    let problem: ProblemDetails = serde_json::from_str(body).unwrap_or_default();
    let text = body.trim();
    let message = problem
        .title
        .clone()
        .filter(|t| !t.is_empty())
        .or_else(|| {
            // Plain-text bodies only; an unparsed JSON object is not a message.
            (!text.is_empty() && !text.starts_with('{')).then(|| text.to_string())
        })
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string());

    match status {
        StatusCode::NOT_FOUND => ClientError::NotFound(path.to_string()),
        StatusCode::CONFLICT => ClientError::Conflict(message),
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY
            if problem.errors.as_ref().is_some_and(|e| !e.is_empty()) =>
        {
            let mut fields = FieldErrors::new();
            for (key, messages) in problem.errors.unwrap_or_default() {
                let field = normalise_field(&key);
                for m in messages {
                    fields.add(&field, m);
                }
            }
            ClientError::Validation(fields)
        }
        _ => ClientError::Remote { status: status.as_u16(), message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_not_found_maps_to_variant() {
        let err = error_from_response(StatusCode::NOT_FOUND, "/api/Customers/9", "");
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn test_validation_problem_details() {
        let body = r#"{
            "type": "https://tools.ietf.org/html/rfc9110#section-15.5.1",
            "title": "One or more validation errors occurred.",
            "status": 400,
            "errors": {
                "ProductName": ["The ProductName field is required."],
                "$.unitPrice": ["The JSON value could not be converted."]
            }
        }"#;
        let ClientError::Validation(fields) =
            error_from_response(StatusCode::BAD_REQUEST, "/api/Products", body)
        else {
            panic!("expected validation error");
        };
        assert_eq!(fields.get("productName").unwrap(), ["The ProductName field is required."]);
        assert!(fields.get("unitPrice").is_some());
    }

    #[test]
    fn test_bad_request_without_errors_uses_title() {
        let err = error_from_response(
            StatusCode::BAD_REQUEST,
            "/api/Orders",
            r#"{"title":"Order number already used"}"#,
        );
        match err {
            ClientError::Remote { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "Order number already used");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_conflict_keeps_plain_text_body() {
        let err = error_from_response(
            StatusCode::CONFLICT,
            "/api/Suppliers/1",
            "Supplier has products",
        );
        assert!(matches!(err, ClientError::Conflict(ref m) if m == "Supplier has products"));
    }

    #[test]
    fn test_unparsed_json_falls_back_to_reason() {
        let err = error_from_response(StatusCode::INTERNAL_SERVER_ERROR, "/api/Orders", r#"{"x":1}"#);
        assert!(matches!(err, ClientError::Remote { status: 500, ref message } if message == "Internal Server Error"));
    }

    #[test]
    fn test_url_keeps_base_path_prefix() {
        let client = ApiClient::new("http://gateway.local/erp/", Duration::from_secs(5), false).unwrap();
        assert_eq!(
            client.url("/api/Customers/4").unwrap().as_str(),
            "http://gateway.local/erp/api/Customers/4"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        let err = ApiClient::new("not a url", Duration::from_secs(5), false).unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl(_)));
    }

    #[test]
    fn test_normalise_field() {
        assert_eq!(normalise_field("SupplierId"), "supplierId");
        assert_eq!(normalise_field("$.quantity"), "quantity");
        assert_eq!(normalise_field(""), "");
    }
}
