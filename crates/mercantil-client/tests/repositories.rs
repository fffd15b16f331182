//! Repository round trips against the in-process fake API.
//!
//! Run with: cargo test --package mercantil-client --test repositories

use std::sync::Arc;
use std::time::Duration;

use mercantil_client::{
    ApiClient, ClientError, CustomerRepository, OrderItemRepository, OrderRepository,
    ProductRepository, SupplierRepository,
};
use mercantil_common::forms::{
    CustomerPayload, OrderItemPayload, OrderItemUpdate, OrderPayload, ProductPayload,
};
use mercantil_test_utils::FakeApi;
use pretty_assertions::assert_eq;
use serde_json::json;

fn client(fake: &FakeApi) -> Arc<ApiClient> {
    Arc::new(ApiClient::new(&fake.base_url(), Duration::from_secs(5), false).unwrap())
}

#[tokio::test]
async fn test_customer_crud_round_trip() {
    let fake = FakeApi::start().await;
    let repo = CustomerRepository::new(client(&fake));

    let payload = CustomerPayload {
        id: None,
        first_name: "Maria".into(),
        last_name: "Anders".into(),
        city: Some("Berlin".into()),
        country: Some("Germany".into()),
        phone: None,
        email: Some("maria@example.com".into()),
        birth_date: None,
    };
    repo.create(&payload).await.unwrap();

    let customers = repo.list().await.unwrap();
    assert_eq!(customers.len(), 1);
    let id = customers[0].id;
    assert_eq!(customers[0].full_name(), "Maria Anders");

    let renamed = CustomerPayload { city: Some("Hamburg".into()), ..payload };
    repo.update(id, &renamed).await.unwrap();
    assert_eq!(repo.find_by_id(id).await.unwrap().city.as_deref(), Some("Hamburg"));

    repo.delete(id).await.unwrap();
    let err = repo.find_by_id(id).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_supplier_delete_conflict_while_products_reference_it() {
    let fake = FakeApi::start().await;
    let supplier_id = fake.seed("Suppliers", json!({ "companyName": "Exotic Liquids" }));
    fake.seed(
        "Products",
        json!({ "productName": "Chai", "supplierId": supplier_id, "unitPrice": 18.0 }),
    );

    let repo = SupplierRepository::new(client(&fake));
    let err = repo.delete(supplier_id as i32).await.unwrap_err();
    assert!(matches!(err, ClientError::Conflict(_)), "got {:?}", err);
    assert_eq!(err.status(), Some(409));
}

#[tokio::test]
async fn test_product_validation_error_is_field_mapped() {
    let fake = FakeApi::start().await;
    let repo = ProductRepository::new(client(&fake));
    let payload = ProductPayload {
        id: None,
        product_name: String::new(),
        supplier_id: 1,
        unit_price: 4.5,
        package: None,
        is_discontinued: false,
    };
    match repo.create(&payload).await {
        Err(ClientError::Validation(fields)) => {
            assert!(fields.get("productName").is_some());
        }
        other => panic!("expected validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_order_create_returns_id_and_items_follow() {
    let fake = FakeApi::start().await;
    let api = client(&fake);
    let orders = OrderRepository::new(api.clone());
    let items = OrderItemRepository::new(api);

    let order = orders
        .create(&OrderPayload {
            id: None,
            order_number: "542380".into(),
            order_date: chrono::NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
            customer_id: 1,
            total_amount: 116.0,
        })
        .await
        .unwrap();
    assert!(order.id > 0);
    assert_eq!(order.order_date.as_deref(), Some("2024-02-10"));

    let created = items
        .create(&OrderItemPayload { order_id: order.id, product_id: 3, quantity: 2, unit_price: 50.0 })
        .await
        .unwrap()
        .expect("created item echoed back");
    assert_eq!(created.order_id, order.id);
    let stored = orders.items(order.id).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].id, created.id);
    assert_eq!(stored[0].line_total(), 100.0);

    items
        .update(stored[0].id, &OrderItemUpdate { quantity: 3, unit_price: 50.0 })
        .await
        .unwrap();
    let updated = items.find_by_id(stored[0].id).await.unwrap();
    assert_eq!(updated.quantity, 3);
    assert_eq!(updated.product_id, 3);
}

#[tokio::test]
async fn test_order_item_list_spans_orders() {
    let fake = FakeApi::start().await;
    fake.seed("OrderItems", json!({ "orderId": 1, "productId": 2, "quantity": 1, "unitPrice": 18.0 }));
    fake.seed("OrderItems", json!({ "orderId": 2, "productId": 5, "quantity": 4, "unitPrice": 2.5 }));

    let items = OrderItemRepository::new(client(&fake)).list().await.unwrap();
    assert_eq!(items.len(), 2);
    let mut orders: Vec<i32> = items.iter().map(|i| i.order_id).collect();
    orders.sort_unstable();
    assert_eq!(orders, vec![1, 2]);
    assert_eq!(items.iter().map(|i| i.line_total()).sum::<f64>(), 28.0);
}

#[tokio::test]
async fn test_server_error_surfaces_title() {
    let fake = FakeApi::start().await;
    fake.fail("Orders");
    let err = OrderRepository::new(client(&fake)).list().await.unwrap_err();
    match err {
        ClientError::Remote { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "Simulated failure");
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_api_is_transport_error() {
    // Port 9 (discard) is closed on loopback in test environments.
    let api = Arc::new(ApiClient::new("http://127.0.0.1:9", Duration::from_secs(2), false).unwrap());
    let err = CustomerRepository::new(api).list().await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)), "got {:?}", err);
    assert_eq!(err.status(), None);
}
