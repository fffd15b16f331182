//! Order pages. The form edits an [`OrderDraft`] that travels with every
//! post; saving writes the order first, then its items.

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Response},
    Form,
};
use chrono::Local;
use mercantil_common::forms::{OrderItemPayload, OrderItemUpdate};
use mercantil_common::{Customer, Order, Product};
use minijinja::context;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::{redirect_with_notice, settle, Failure, ListQuery};
use crate::error::{notice_message, Action, Entity, Result};
use crate::listing::{filter, page_param, paginate, Searchable};
use crate::order_form::{FormAction, OrderDraft, OrderFormInput};
use crate::state::SharedState;

const ENTITY: Entity = Entity::Order;

#[derive(Debug, Clone, Serialize)]
pub struct OrderRow {
    pub id: i32,
    pub order_number: String,
    pub order_date: String,
    pub customer_name: String,
    pub total_amount: f64,
}

impl OrderRow {
    fn new(order: Order, names: &HashMap<i32, String>) -> Self {
        let customer_name = order
            .customer
            .as_ref()
            .map(Customer::full_name)
            .or_else(|| names.get(&order.customer_id).cloned())
            .unwrap_or_else(|| "N/A".to_string());
        Self {
            id: order.id,
            order_date: order
                .date()
                .map(|d| d.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            order_number: order.order_number,
            customer_name,
            total_amount: order.total_amount,
        }
    }
}

impl Searchable for OrderRow {
    fn search_fields(&self) -> Vec<String> {
        vec![self.customer_name.clone(), self.order_number.clone(), self.id.to_string()]
    }
}

pub async fn list(
    State(state): State<SharedState>,
    Query(query): Query<ListQuery>,
) -> Result<Html<String>> {
    let mut alerts = Vec::new();
    let (orders, customers) = tokio::join!(state.orders.list(), state.customers.list());
    let orders = settle(orders, ENTITY, &mut alerts);
    let names: HashMap<i32, String> = settle(customers, Entity::Customer, &mut alerts)
        .iter()
        .map(|c| (c.id, c.full_name()))
        .collect();

    let rows: Vec<OrderRow> = orders.into_iter().map(|o| OrderRow::new(o, &names)).collect();
    let q = query.q.unwrap_or_default();
    let page = paginate(filter(rows, &q), page_param(query.page.as_deref()), state.console.page_size);

    state.views.render(
        "orders/list.html",
        context! {
            active => "orders",
            q,
            page,
            alerts,
            notice => query.notice.as_deref().and_then(|n| notice_message(ENTITY, n)),
        },
    )
}

/// Line picker values echoed back when a line is rejected.
#[derive(Debug, Default, Serialize)]
struct LineInput {
    product_id: String,
    quantity: String,
    unit_price: String,
}

async fn render_form(
    state: &SharedState,
    id: Option<i32>,
    draft: &OrderDraft,
    line: LineInput,
    failure: Option<Failure>,
) -> Result<Html<String>> {
    let (title, action) = match id {
        Some(id) => ("Edit order".to_string(), format!("/orders/{}/edit", id)),
        None => ("New order".to_string(), "/orders/new".to_string()),
    };

    let mut alerts = Vec::new();
    let (customers, products) = tokio::join!(state.customers.list(), state.products.list());
    let mut customers = settle(customers, Entity::Customer, &mut alerts);
    let mut products: Vec<Product> = settle(products, Entity::Product, &mut alerts)
        .into_iter()
        .filter(|p| !p.is_discontinued)
        .collect();
    customers.sort_by_key(|c| c.full_name());
    products.sort_by(|a, b| a.product_name.cmp(&b.product_name));
    let customers: Vec<_> = customers
        .iter()
        .map(|c| context! { id => c.id, name => c.full_name() })
        .collect();

    state.views.render(
        "orders/form.html",
        context! {
            active => "orders",
            title,
            action,
            draft,
            carried => draft.carried_json()?,
            lines => draft.line_views(),
            totals => draft.totals(state.console.tax_rate),
            tax_percent => (state.console.tax_rate * 100.0).round(),
            line,
            customers,
            products,
            alerts,
            failure,
        },
    )
}

pub async fn new_form(State(state): State<SharedState>) -> Result<Html<String>> {
    let draft = OrderDraft::new(Local::now().date_naive());
    let line = LineInput { quantity: "1".to_string(), ..Default::default() };
    render_form(&state, None, &draft, line, None).await
}

pub async fn edit_form(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
) -> Result<Html<String>> {
    let (order, items, products) = tokio::join!(
        state.orders.find_by_id(id),
        state.orders.items(id),
        state.products.list(),
    );
    let loaded = order.and_then(|order| items.map(|items| (order, items)));
    match loaded {
        Ok((order, items)) => {
            let products = products.unwrap_or_else(|e| {
                warn!(error = %e, "Product names unavailable for order form");
                Vec::new()
            });
            let draft = OrderDraft::from_order(&order, &items, &products);
            let line = LineInput { quantity: "1".to_string(), ..Default::default() };
            render_form(&state, Some(id), &draft, line, None).await
        }
        Err(e) => state.views.render(
            "orders/form.html",
            context! {
                active => "orders",
                title => "Edit order",
                missing => true,
                failure => Failure::client(&e, ENTITY, Action::Load),
            },
        ),
    }
}

pub async fn submit_new(
    State(state): State<SharedState>,
    Form(input): Form<OrderFormInput>,
) -> Result<Response> {
    submit(&state, None, input).await
}

pub async fn submit_edit(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
    Form(input): Form<OrderFormInput>,
) -> Result<Response> {
    submit(&state, Some(id), input).await
}

async fn submit(state: &SharedState, id: Option<i32>, input: OrderFormInput) -> Result<Response> {
    let mut draft = OrderDraft::from_input(&input)?;
    let echoed = LineInput {
        product_id: input.product_id.clone(),
        quantity: input.quantity.clone(),
        unit_price: input.unit_price.clone(),
    };
    let fresh = LineInput { quantity: "1".to_string(), ..Default::default() };

    match FormAction::parse(&input.action) {
        FormAction::AddLine => {
            let mut alerts = Vec::new();
            let products = settle(state.products.list().await, Entity::Product, &mut alerts);
            if let Some(message) = alerts.pop() {
                let failure = Failure { message, fields: Default::default() };
                return Ok(render_form(state, id, &draft, echoed, Some(failure)).await?.into_response());
            }
            match draft.add_line(&input, &products) {
                Ok(()) => Ok(render_form(state, id, &draft, fresh, None).await?.into_response()),
                Err(fields) => {
                    let failure = Failure { message: "The line could not be added.".to_string(), fields };
                    Ok(render_form(state, id, &draft, echoed, Some(failure)).await?.into_response())
                }
            }
        }
        FormAction::RemoveLine(index) => {
            if draft.remove_line(index).is_none() {
                debug!(index, "Ignoring removal of unknown line");
            }
            Ok(render_form(state, id, &draft, echoed, None).await?.into_response())
        }
        FormAction::Redisplay => {
            debug!(action = %input.action, "Unknown form action, showing the form again");
            Ok(render_form(state, id, &draft, echoed, None).await?.into_response())
        }
        FormAction::Save => {
            let (action, notice) = match id {
                Some(_) => (Action::Update, "updated"),
                None => (Action::Create, "created"),
            };
            let mut saved_id = id;
            match save(state, &mut saved_id, &mut draft).await {
                Ok(_) => Ok(redirect_with_notice(ENTITY, notice)),
                Err(err) => {
                    let failure = Failure::new(&err, ENTITY, action);
                    // Once the order exists the form posts to its edit route.
                    Ok(render_form(state, saved_id, &draft, echoed, Some(failure)).await?.into_response())
                }
            }
        }
    }
}

/// Persist the draft and return the order id.
///
/// Progress is recorded as it happens: `id` is set once the order exists,
/// written lines get their `item_id` and deleted ids leave the draft. On
/// error the caller re-renders from this state.
async fn save(state: &SharedState, id: &mut Option<i32>, draft: &mut OrderDraft) -> Result<i32> {
    let payload = draft.validate(state.console.tax_rate)?;

    let order_id = match *id {
        Some(order_id) => {
            state.orders.update(order_id, &payload).await?;
            order_id
        }
        None => state.orders.create(&payload).await?.id,
    };
    *id = Some(order_id);

    for line in &mut draft.lines {
        match line.item_id {
            Some(item_id) => {
                let update = OrderItemUpdate { quantity: line.quantity, unit_price: line.unit_price };
                state.order_items.update(item_id, &update).await?;
            }
            None => {
                let item = OrderItemPayload {
                    order_id,
                    product_id: line.product_id,
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                };
                match state.order_items.create(&item).await? {
                    Some(created) => line.item_id = Some(created.id),
                    None => warn!(order_id, product_id = line.product_id, "Created order item has no id"),
                }
            }
        }
    }

    while let Some(&item_id) = draft.removed_item_ids.first() {
        match state.order_items.delete(item_id).await {
            Ok(()) => {}
            Err(e) if e.is_not_found() => debug!(item_id, "Removed line was already gone"),
            Err(e) => return Err(e.into()),
        }
        draft.removed_item_ids.remove(0);
    }

    info!(order_id, lines = draft.lines.len(), "Order saved");
    Ok(order_id)
}

pub async fn confirm_delete(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
) -> Result<Html<String>> {
    let (name, failure) = match state.orders.find_by_id(id).await {
        Ok(o) => (Some(format!("order {}", o.order_number)), None),
        Err(e) => (None, Some(Failure::client(&e, ENTITY, Action::Load))),
    };
    state.views.render(
        "confirm_delete.html",
        context! {
            active => "orders",
            entity => ENTITY.label(),
            back => ENTITY.list_path(),
            action => format!("/orders/{}/delete", id),
            detail => "Its order lines are deleted as well.",
            name,
            failure,
        },
    )
}

/// Items go first; one that cannot be deleted is logged and skipped.
async fn delete_with_items(state: &SharedState, id: i32) -> std::result::Result<(), mercantil_client::ClientError> {
    let items = state.orders.items(id).await?;
    for item in &items {
        if let Err(e) = state.order_items.delete(item.id).await {
            warn!(order_id = id, item_id = item.id, error = %e, "Could not delete order item, skipping");
        }
    }
    state.orders.delete(id).await?;
    info!(order_id = id, items = items.len(), "Order deleted");
    Ok(())
}

pub async fn delete(State(state): State<SharedState>, Path(id): Path<i32>) -> Result<Response> {
    match delete_with_items(&state, id).await {
        Ok(()) => Ok(redirect_with_notice(ENTITY, "deleted")),
        Err(e) => {
            let failure = Failure::client(&e, ENTITY, Action::Delete);
            Ok(state
                .views
                .render(
                    "confirm_delete.html",
                    context! {
                        active => "orders",
                        entity => ENTITY.label(),
                        back => ENTITY.list_path(),
                        action => format!("/orders/{}/delete", id),
                        failure,
                    },
                )?
                .into_response())
        }
    }
}
