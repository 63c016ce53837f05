use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Redirect,
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::errors::HopError;
use crate::services::link_service;
use crate::state::app::AppState;
use crate::state::links::Entry;

/// Build the record API under /api.
pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/get/:key", get(get_key))
        .route("/set/:key", post(set_key))
        .route("/list", get(list_all))
        .with_state(state)
}

/// Build the redirect route under /v.
pub fn redirect_routes(state: AppState) -> Router {
    Router::new().route("/:key", get(visit)).with_state(state)
}

/// Form payload of POST /api/set/{key}.
#[derive(Debug, Deserialize)]
pub struct SetForm {
    pub url: String,
}

//
// ─────────────────────────────────────────────────────────────
// GET /api/get/{key}
// Return the record as JSON, or 404 echoing the key
// ─────────────────────────────────────────────────────────────
//
async fn get_key(
    Path(key): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<Entry>, (StatusCode, Json<Value>)> {
    match link_service::get_link(&state, &key) {
        Some(entry) => Ok(Json(entry)),
        None => Err((StatusCode::NOT_FOUND, Json(json!({ "key": key })))),
    }
}

//
// ─────────────────────────────────────────────────────────────
// POST /api/set/{key}
// Upsert the record, enqueue it for persistence, echo it back
// ─────────────────────────────────────────────────────────────
//
async fn set_key(
    Path(key): Path<String>,
    State(state): State<AppState>,
    Form(form): Form<SetForm>,
) -> Result<Json<Entry>, StatusCode> {
    if form.url.is_empty() {
        return Err(StatusCode::UNPROCESSABLE_ENTITY);
    }

    match link_service::set_link(&state, &key, form.url).await {
        Ok(entry) => Ok(Json(entry)),
        Err(HopError::EmptyKey) => Err(StatusCode::UNPROCESSABLE_ENTITY),
        Err(HopError::QueueClosed) => Err(StatusCode::SERVICE_UNAVAILABLE),
        Err(_) => Err(StatusCode::INTERNAL_SERVER_ERROR),
    }
}

//
// ─────────────────────────────────────────────────────────────
// GET /api/list
// Full JSON object of all records
// ─────────────────────────────────────────────────────────────
//
async fn list_all(State(state): State<AppState>) -> Json<HashMap<String, Entry>> {
    Json(link_service::list_links(&state))
}

//
// ─────────────────────────────────────────────────────────────
// GET /v/{key}
// Temporary redirect to the stored target
// ─────────────────────────────────────────────────────────────
//
async fn visit(
    Path(key): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, (StatusCode, &'static str)> {
    match link_service::get_link(&state, &key) {
        Some(entry) => Ok(Redirect::temporary(&link_service::redirect_target(
            &entry.url,
        ))),
        None => Err((StatusCode::NOT_FOUND, "NOT FOUND")),
    }
}
