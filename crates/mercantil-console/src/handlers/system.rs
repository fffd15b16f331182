//! Liveness probe and the embedded stylesheet.

use axum::{
    http::header,
    response::IntoResponse,
};

const STYLESHEET: &str = include_str!("../../assets/main.css");

pub async fn healthz() -> &'static str {
    "ok"
}

pub async fn stylesheet() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "text/css; charset=utf-8"),
            (header::CACHE_CONTROL, "public, max-age=3600"),
        ],
        STYLESHEET,
    )
}
