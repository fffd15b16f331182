//! Supplier pages: list, create, edit and delete.

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Response},
    Form,
};
use mercantil_common::forms::SupplierInput;
use minijinja::context;

use super::{redirect_with_notice, settle, Failure, ListQuery};
use crate::error::{notice_message, Action, Entity, Result};
use crate::listing::{filter, page_param, paginate};
use crate::state::SharedState;

const ENTITY: Entity = Entity::Supplier;

pub async fn list(
    State(state): State<SharedState>,
    Query(query): Query<ListQuery>,
) -> Result<Html<String>> {
    let mut alerts = Vec::new();
    let suppliers = settle(state.suppliers.list().await, ENTITY, &mut alerts);

    let q = query.q.unwrap_or_default();
    let page = paginate(filter(suppliers, &q), page_param(query.page.as_deref()), state.console.page_size);

    state.views.render(
        "suppliers/list.html",
        context! {
            active => "suppliers",
            q,
            page,
            alerts,
            notice => query.notice.as_deref().and_then(|n| notice_message(ENTITY, n)),
        },
    )
}

fn render_form(
    state: &SharedState,
    id: Option<i32>,
    input: &SupplierInput,
    failure: Option<Failure>,
) -> Result<Html<String>> {
    let (title, action) = match id {
        Some(id) => ("Edit supplier".to_string(), format!("/suppliers/{}/edit", id)),
        None => ("New supplier".to_string(), "/suppliers/new".to_string()),
    };
    state.views.render(
        "suppliers/form.html",
        context! { active => "suppliers", title, action, input, failure },
    )
}

pub async fn new_form(State(state): State<SharedState>) -> Result<Html<String>> {
    render_form(&state, None, &SupplierInput::default(), None)
}

pub async fn create(
    State(state): State<SharedState>,
    Form(input): Form<SupplierInput>,
) -> Result<Response> {
    submit(&state, None, input).await
}

async fn save(state: &SharedState, id: Option<i32>, input: &SupplierInput) -> Result<()> {
    let payload = input.validate()?;
    match id {
        Some(id) => state.suppliers.update(id, &payload).await?,
        None => state.suppliers.create(&payload).await?,
    }
    Ok(())
}

async fn submit(state: &SharedState, id: Option<i32>, input: SupplierInput) -> Result<Response> {
    let (action, notice) = match id {
        Some(_) => (Action::Update, "updated"),
        None => (Action::Create, "created"),
    };
    match save(state, id, &input).await {
        Ok(()) => Ok(redirect_with_notice(ENTITY, notice)),
        Err(err) => {
            let failure = Failure::new(&err, ENTITY, action);
            Ok(render_form(state, id, &input, Some(failure))?.into_response())
        }
    }
}

pub async fn edit_form(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
) -> Result<Html<String>> {
    match state.suppliers.find_by_id(id).await {
        Ok(supplier) => render_form(&state, Some(id), &SupplierInput::from(&supplier), None),
        Err(e) => state.views.render(
            "suppliers/form.html",
            context! {
                active => "suppliers",
                title => "Edit supplier",
                missing => true,
                failure => Failure::client(&e, ENTITY, Action::Load),
            },
        ),
    }
}

pub async fn update(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
    Form(input): Form<SupplierInput>,
) -> Result<Response> {
    submit(&state, Some(id), input).await
}

pub async fn confirm_delete(
    State(state): State<SharedState>,
    Path(id): Path<i32>,
) -> Result<Html<String>> {
    let (name, failure) = match state.suppliers.find_by_id(id).await {
        Ok(s) => (Some(s.company_name), None),
        Err(e) => (None, Some(Failure::client(&e, ENTITY, Action::Load))),
    };
    state.views.render(
        "confirm_delete.html",
        context! {
            active => "suppliers",
            entity => ENTITY.label(),
            back => ENTITY.list_path(),
            action => format!("/suppliers/{}/delete", id),
            name,
            failure,
        },
    )
}

pub async fn delete(State(state): State<SharedState>, Path(id): Path<i32>) -> Result<Response> {
    match state.suppliers.delete(id).await {
        Ok(()) => Ok(redirect_with_notice(ENTITY, "deleted")),
        Err(e) => {
            let failure = Failure::client(&e, ENTITY, Action::Delete);
            Ok(state
                .views
                .render(
                    "confirm_delete.html",
                    context! {
                        active => "suppliers",
                        entity => ENTITY.label(),
                        back => ENTITY.list_path(),
                        action => format!("/suppliers/{}/delete", id),
                        failure,
                    },
                )?
                .into_response())
        }
    }
}
