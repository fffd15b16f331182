//! Embedded third-party analytics report.

use axum::{extract::State, response::Html};
use minijinja::context;

use crate::error::Result;
use crate::state::SharedState;

pub async fn analytics_page(State(state): State<SharedState>) -> Result<Html<String>> {
    state.views.render(
        "analytics.html",
        context! {
            active => "analytics",
            title => &state.analytics.title,
            embed_url => &state.analytics.embed_url,
        },
    )
}
