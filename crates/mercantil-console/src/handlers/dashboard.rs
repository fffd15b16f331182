//! Dashboard handler: landing page with stat cards and charts.

use axum::{extract::State, response::Html, Json};
use mercantil_client::ClientError;
use minijinja::context;
use tracing::warn;

use crate::charts::{bars, DashboardData};
use crate::error::{user_message, Action, Entity, JsonError, Result};
use crate::state::SharedState;

type Failures = Vec<(Entity, ClientError)>;

fn take<T>(result: std::result::Result<Vec<T>, ClientError>, entity: Entity, failures: &mut Failures) -> Vec<T> {
    result.unwrap_or_else(|e| {
        warn!(source = entity.label(), error = %e, "Dashboard source unavailable");
        failures.push((entity, e));
        Vec::new()
    })
}

/// Fetch the four lists concurrently. A failed source contributes nothing
/// and is named in `unavailable`.
async fn gather(state: &SharedState) -> (DashboardData, Failures) {
    let (customers, products, suppliers, orders) = tokio::join!(
        state.customers.list(),
        state.products.list(),
        state.suppliers.list(),
        state.orders.list(),
    );

    let mut failures = Failures::new();
    let customers = take(customers, Entity::Customer, &mut failures);
    let products = take(products, Entity::Product, &mut failures);
    let suppliers = take(suppliers, Entity::Supplier, &mut failures);
    let orders = take(orders, Entity::Order, &mut failures);

    let mut data = DashboardData::build(&customers, &products, &suppliers, &orders);
    data.unavailable = failures
        .iter()
        .map(|(entity, _)| entity.list_path().trim_start_matches('/').to_string())
        .collect();
    (data, failures)
}

pub async fn dashboard(State(state): State<SharedState>) -> Result<Html<String>> {
    let (data, failures) = gather(&state).await;
    let alerts: Vec<String> = failures
        .iter()
        .map(|(entity, e)| user_message(e, *entity, Action::Load))
        .collect();

    let charts = vec![
        context! { title => "Orders by month", kind => "count", bars => bars(&data.orders_by_month) },
        context! { title => "Customers by country", kind => "count", bars => bars(&data.customers_by_country) },
        context! { title => "Top product prices", kind => "money", bars => bars(&data.product_prices) },
        context! { title => "Products per supplier", kind => "count", bars => bars(&data.supplier_activity) },
    ];

    state.views.render(
        "dashboard.html",
        context! {
            active => "dashboard",
            stats => data.stats,
            charts,
            alerts,
        },
    )
}

/// Same aggregates as JSON. Partial data is still a 200; only a dashboard
/// with every source down is an error.
pub async fn api_dashboard(
    State(state): State<SharedState>,
) -> std::result::Result<Json<DashboardData>, JsonError> {
    let (data, mut failures) = gather(&state).await;
    if failures.len() == 4 {
        let (_, err) = failures.remove(0);
        return Err(err.into());
    }
    Ok(Json(data))
}
