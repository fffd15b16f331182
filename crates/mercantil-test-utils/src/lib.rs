//! mercantil-test-utils: a fake business REST API served by axum on an
//! ephemeral port.
//!
//! Every resource (`Customers`, `Products`, `Suppliers`, `Orders`,
//! `OrderItems`) is an in-memory map of JSON objects keyed by id. The fake
//! mirrors the behaviours the console relies on:
//!
//! - `POST` assigns the next id and answers 201 with the stored record
//! - `PUT` merges the body into the stored record (id preserved)
//! - deleting a supplier still referenced by a product answers 409
//! - a product without `productName` answers 400 with problem details
//! - `GET /api/Orders/{id}/OrderItems` lists the items of one order
//! - [`FakeApi::fail`] makes every request to a resource answer 500

use std::collections::{BTreeMap, HashSet};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    extract::{Path, State},
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::{json, Map, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const RESOURCES: [&str; 5] = ["Customers", "Products", "Suppliers", "Orders", "OrderItems"];

#[derive(Default)]
struct Store {
    tables: BTreeMap<String, BTreeMap<i64, Value>>,
    next_id: i64,
    failing: HashSet<String>,
    requests: Vec<(Method, String)>,
}

type Shared = Arc<Mutex<Store>>;

fn lock(store: &Shared) -> MutexGuard<'_, Store> {
    store.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub struct FakeApi {
    addr: SocketAddr,
    store: Shared,
    handle: JoinHandle<()>,
}

impl FakeApi {
    /// Bind on 127.0.0.1:0 and start serving.
    pub async fn start() -> Self {
        let store: Shared = Arc::new(Mutex::new(Store::default()));
        let app = router(store.clone());
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind fake API listener");
        let addr = listener.local_addr().expect("fake API address");
        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("fake API stopped: {e}");
            }
        });
        Self { addr, store, handle }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Insert a record and return its id. An `id` already present in the
    /// object is kept.
    pub fn seed(&self, resource: &str, record: Value) -> i64 {
        let mut store = lock(&self.store);
        insert(&mut store, resource, record).0
    }

    pub fn records(&self, resource: &str) -> Vec<Value> {
        let store = lock(&self.store);
        store
            .tables
            .get(resource)
            .map(|t| t.values().cloned().collect())
            .unwrap_or_default()
    }

    pub fn record(&self, resource: &str, id: i64) -> Option<Value> {
        let store = lock(&self.store);
        store.tables.get(resource).and_then(|t| t.get(&id)).cloned()
    }

    /// Make every request to `resource` answer 500.
    pub fn fail(&self, resource: &str) {
        lock(&self.store).failing.insert(resource.to_string());
    }

    /// Requests received so far as `(method, path)`.
    pub fn requests(&self) -> Vec<(Method, String)> {
        lock(&self.store).requests.clone()
    }

    pub fn count_requests(&self, method: &Method, prefix: &str) -> usize {
        lock(&self.store)
            .requests
            .iter()
            .filter(|(m, p)| m == method && p.starts_with(prefix))
            .count()
    }
}

impl Drop for FakeApi {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn insert(store: &mut Store, resource: &str, mut record: Value) -> (i64, Value) {
    let id = match record.get("id").and_then(Value::as_i64).filter(|id| *id > 0) {
        Some(id) => id,
        None => {
            store.next_id += 1;
            store.next_id
        }
    };
    store.next_id = store.next_id.max(id);
    if let Value::Object(ref mut map) = record {
        map.insert("id".to_string(), json!(id));
    }
    store
        .tables
        .entry(resource.to_string())
        .or_default()
        .insert(id, record.clone());
    (id, record)
}

fn router(store: Shared) -> Router {
    Router::new()
        .route("/api/{resource}", get(list).post(create))
        .route("/api/{resource}/{id}", get(fetch).put(update).delete(remove))
        .route("/api/{resource}/{id}/OrderItems", get(order_items))
        .with_state(store)
}

fn problem(status: StatusCode, title: &str) -> Response {
    (status, Json(json!({ "title": title, "status": status.as_u16() }))).into_response()
}

/// Record the request and short-circuit unknown or failing resources.
fn guard(store: &mut Store, method: Method, uri: &Uri, resource: &str) -> Option<Response> {
    store.requests.push((method, uri.path().to_string()));
    if !RESOURCES.contains(&resource) {
        return Some(problem(StatusCode::NOT_FOUND, "Unknown resource"));
    }
    if store.failing.contains(resource) {
        return Some(problem(StatusCode::INTERNAL_SERVER_ERROR, "Simulated failure"));
    }
    None
}

fn validate(resource: &str, record: &Value) -> Option<Response> {
    if resource != "Products" {
        return None;
    }
    let blank = record
        .get("productName")
        .and_then(Value::as_str)
        .map_or(true, |s| s.trim().is_empty());
    if !blank {
        return None;
    }
    let body = json!({
        "title": "One or more validation errors occurred.",
        "status": 400,
        "errors": { "ProductName": ["The ProductName field is required."] }
    });
    Some((StatusCode::BAD_REQUEST, Json(body)).into_response())
}

async fn list(
    State(store): State<Shared>,
    method: Method,
    uri: Uri,
    Path(resource): Path<String>,
) -> Response {
    let mut store = lock(&store);
    if let Some(resp) = guard(&mut store, method, &uri, &resource) {
        return resp;
    }
    let rows: Vec<Value> = store
        .tables
        .get(&resource)
        .map(|t| t.values().cloned().collect())
        .unwrap_or_default();
    Json(rows).into_response()
}

async fn create(
    State(store): State<Shared>,
    method: Method,
    uri: Uri,
    Path(resource): Path<String>,
    Json(mut body): Json<Value>,
) -> Response {
    let mut store = lock(&store);
    if let Some(resp) = guard(&mut store, method, &uri, &resource) {
        return resp;
    }
    if let Some(resp) = validate(&resource, &body) {
        return resp;
    }
    if let Value::Object(ref mut map) = body {
        map.remove("id");
    }
    let (_, stored) = insert(&mut store, &resource, body);
    (StatusCode::CREATED, Json(stored)).into_response()
}

async fn fetch(
    State(store): State<Shared>,
    method: Method,
    uri: Uri,
    Path((resource, id)): Path<(String, i64)>,
) -> Response {
    let mut store = lock(&store);
    if let Some(resp) = guard(&mut store, method, &uri, &resource) {
        return resp;
    }
    match store.tables.get(&resource).and_then(|t| t.get(&id)) {
        Some(record) => Json(record.clone()).into_response(),
        None => problem(StatusCode::NOT_FOUND, "Not Found"),
    }
}

async fn update(
    State(store): State<Shared>,
    method: Method,
    uri: Uri,
    Path((resource, id)): Path<(String, i64)>,
    Json(body): Json<Value>,
) -> Response {
    let mut store = lock(&store);
    if let Some(resp) = guard(&mut store, method, &uri, &resource) {
        return resp;
    }
    let Some(existing) = store.tables.get_mut(&resource).and_then(|t| t.get_mut(&id)) else {
        return problem(StatusCode::NOT_FOUND, "Not Found");
    };
    let mut merged: Map<String, Value> = existing.as_object().cloned().unwrap_or_default();
    if let Value::Object(fields) = body {
        merged.extend(fields);
    }
    merged.insert("id".to_string(), json!(id));
    let merged = Value::Object(merged);
    if let Some(resp) = validate(&resource, &merged) {
        return resp;
    }
    *existing = merged;
    StatusCode::NO_CONTENT.into_response()
}

async fn remove(
    State(store): State<Shared>,
    method: Method,
    uri: Uri,
    Path((resource, id)): Path<(String, i64)>,
) -> Response {
    let mut store = lock(&store);
    if let Some(resp) = guard(&mut store, method, &uri, &resource) {
        return resp;
    }
    if resource == "Suppliers" {
        let referenced = store
            .tables
            .get("Products")
            .is_some_and(|t| t.values().any(|p| p.get("supplierId").and_then(Value::as_i64) == Some(id)));
        if referenced {
            return (StatusCode::CONFLICT, "Supplier has products").into_response();
        }
    }
    match store.tables.get_mut(&resource).and_then(|t| t.remove(&id)) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => problem(StatusCode::NOT_FOUND, "Not Found"),
    }
}

async fn order_items(
    State(store): State<Shared>,
    method: Method,
    uri: Uri,
    Path((resource, order_id)): Path<(String, i64)>,
) -> Response {
    let mut store = lock(&store);
    if resource != "Orders" {
        store.requests.push((method, uri.path().to_string()));
        return problem(StatusCode::NOT_FOUND, "Unknown resource");
    }
    if let Some(resp) = guard(&mut store, method, &uri, "OrderItems") {
        return resp;
    }
    let rows: Vec<Value> = store
        .tables
        .get("OrderItems")
        .map(|t| {
            t.values()
                .filter(|i| i.get("orderId").and_then(Value::as_i64) == Some(order_id))
                .cloned()
                .collect()
        })
        .unwrap_or_default();
    Json(rows).into_response()
}
