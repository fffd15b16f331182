//! Product pages. Rows and forms need the supplier list alongside.

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Response},
    Form,
};
use mercantil_common::forms::ProductInput;
use mercantil_common::{Product, Supplier};
use minijinja::context;
use serde::Serialize;

use super::{redirect_with_notice, settle, Failure, ListQuery};
use crate::error::{notice_message, Action, Entity, Result};
use crate::listing::{filter, page_param, paginate, Searchable};
use crate::state::SharedState;

const ENTITY: Entity = Entity::Product;

#[derive(Debug, Clone, Serialize)]
pub struct ProductRow {
    pub id: i32,
    pub product_name: String,
    pub supplier_name: String,
    pub unit_price: f64,
    pub package: String,
    pub is_discontinued: bool,
}

impl ProductRow {
    fn new(product: Product, suppliers: &[Supplier]) -> Self {
        let supplier_name = product
            .supplier
            .as_ref()
            .map(|s| s.company_name.clone())
            .or_else(|| {
                suppliers
                    .iter()
                    .find(|s| s.id == product.supplier_id)
                    .map(|s| s.company_name.clone())
            })
            .unwrap_or_else(|| "N/A".to_string());
        Self {
            id: product.id,
            product_name: product.product_name,
            supplier_name,
            unit_price: product.unit_price,
            package: product.package.unwrap_or_default(),
            is_discontinued: product.is_discontinued,
        }
    }
}

impl Searchable for ProductRow {
    fn search_fields(&self) -> Vec<String> {
        vec![self.product_name.clone()]
    }
}

pub async fn list(
    State(state): State<SharedState>,
    Query(query): Query<ListQuery>,
) -> Result<Html<String>> {
    let mut alerts = Vec::new();
    let (products, suppliers) = tokio::join!(state.products.list(), state.suppliers.list());
    let products = settle(products, ENTITY, &mut alerts);
    let suppliers = settle(suppliers, Entity::Supplier, &mut alerts);

    let rows: Vec<ProductRow> = products
        .into_iter()
        .map(|p| ProductRow::new(p, &suppliers))
        .collect();
    let q = query.q.unwrap_or_default();
    let page = paginate(filter(rows, &q), page_param(query.page.as_deref()), state.console.page_size);

    state.views.render(
        "products/list.html",
        context! {
            active => "products",
            q,
            page,
            alerts,
            notice => query.notice.as_deref().and_then(|n| notice_message(ENTITY, n)),
        },
    )
}

/// Supplier choices for the select, with an alert if they cannot be loaded.
async fn supplier_options(state: &SharedState) -> (Vec<Supplier>, Vec<String>) {
    let mut alerts = Vec::new();
    let mut suppliers = settle(state.suppliers.list().await, Entity::Supplier, &mut alerts);
    suppliers.sort_by(|a, b| a.company_name.cmp(&b.company_name));
    (suppliers, alerts)
}

async fn render_form(
    state: &SharedState,
    id: Option<i32>,
    input: &ProductInput,
    failure: Option<Failure>,
) -> Result<Html<String>> {
    let (title, action) = match id {
        Some(id) => ("Edit product".to_string(), format!("/products/{}/edit", id)),
        None => ("New product".to_string(), "/products/new".to_string()),
    };
    let (suppliers, alerts) = supplier_options(state).await;
    state.views.render(
        "products/form.html",
        context! {
            active => "products",
            title,
            action,
            input,
            discontinued => input.discontinued(),
            suppliers,
            alerts,
            failure,
        },
    )
}

pub async fn new_form(State(state): State<SharedState>) -> Result<Html<String>> {
    render_form(&state, None, &ProductInput::default(), None).await
}

pub async fn create(
    State(state): State<SharedState>,
    Form(input): Form<ProductInput>,
) -> Result<Response> {
    submit(&state, None, input).await
}

async fn save(state: &SharedState, id: Option<i32>, input: &ProductInput) -> Result<()> {
    let payload = input.validate()?;
    match id {
        Some(id) => state.products.update(id, &payload).await?,
        None => state.products.create(&payload).await?,
    }
    Ok(())
}

async fn submit(state: &SharedState, id: Option<i32>, input: ProductInput) -> Result<Response> {
    let (action, notice) = match id {
        Some(_) => (Action::Update, "updated"),
        None => (Action::Create, "created"),
    };
    match save(state, id, &input).await {
        Ok(()) => Ok(redirect_with_notice(ENTITY, notice)),
        Err(err) => {
            let failure = Failure::new(&err, ENTITY, action);
            Ok(render_form(state, id, &input, Some(failure)).await?.into_response())
        }
    }
}

pub async fn edit_form(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
) -> Result<Html<String>> {
    match state.products.find_by_id(id).await {
        Ok(product) => render_form(&state, Some(id), &ProductInput::from(&product), None).await,
        Err(e) => state.views.render(
            "products/form.html",
            context! {
                active => "products",
                title => "Edit product",
                missing => true,
                failure => Failure::client(&e, ENTITY, Action::Load),
            },
        ),
    }
}

pub async fn update(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
    Form(input): Form<ProductInput>,
) -> Result<Response> {
    submit(&state, Some(id), input).await
}

pub async fn confirm_delete(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
) -> Result<Html<String>> {
    let (name, failure) = match state.products.find_by_id(id).await {
        Ok(p) => (Some(p.product_name), None),
        Err(e) => (None, Some(Failure::client(&e, ENTITY, Action::Load))),
    };
    state.views.render(
        "confirm_delete.html",
        context! {
            active => "products",
            entity => ENTITY.label(),
            back => ENTITY.list_path(),
            action => format!("/products/{}/delete", id),
            name,
            failure,
        },
    )
}

pub async fn delete(State(state): State<SharedState>, Path(id): Path<i32>) -> Result<Response> {
    match state.products.delete(id).await {
        Ok(()) => Ok(redirect_with_notice(ENTITY, "deleted")),
        Err(e) => {
            let failure = Failure::client(&e, ENTITY, Action::Delete);
            Ok(state
                .views
                .render(
                    "confirm_delete.html",
                    context! {
                        active => "products",
                        entity => ENTITY.label(),
                        back => ENTITY.list_path(),
                        action => format!("/products/{}/delete", id),
                        failure,
                    },
                )?
                .into_response())
        }
    }
}
