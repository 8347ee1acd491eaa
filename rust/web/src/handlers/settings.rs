use crate::errors::IntoErrorResponse;
use crate::settings::{SettingsError, SettingsStore};
use lowdraw_engine::hand::TieRule;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::http::StatusCode;
use warp::reply::{self, Response};
use warp::Reply;

/// Body of `PUT /api/settings`; absent fields keep their current value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateSettingsRequest {
    pub starting_stack: Option<u32>,
    pub tie_rule: Option<TieRule>,
    pub opponent_policy: Option<String>,
    pub session_timeout_minutes: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFieldRequest {
    pub field: String,
    pub value: serde_json::Value,
}

pub async fn get_settings(store: Arc<SettingsStore>) -> Response {
    match store.get() {
        Ok(settings) => success_response(StatusCode::OK, settings),
        Err(err) => settings_error(err),
    }
}

pub async fn update_settings(
    store: Arc<SettingsStore>,
    request: UpdateSettingsRequest,
) -> Response {
    let mut current = match store.get() {
        Ok(s) => s,
        Err(err) => return settings_error(err),
    };

    if let Some(stack) = request.starting_stack {
        current.starting_stack = stack;
    }
    if let Some(rule) = request.tie_rule {
        current.tie_rule = rule;
    }
    if let Some(policy) = request.opponent_policy {
        current.opponent_policy = policy;
    }
    if let Some(timeout) = request.session_timeout_minutes {
        current.session_timeout_minutes = timeout;
    }

    match store.update(current) {
        Ok(settings) => success_response(StatusCode::OK, settings),
        Err(err) => settings_error(err),
    }
}

/// `PATCH /api/settings` with `{ "field": ..., "value": ... }`
pub async fn update_field(store: Arc<SettingsStore>, request: UpdateFieldRequest) -> Response {
    match store.update_field(&request.field, request.value) {
        Ok(settings) => success_response(StatusCode::OK, settings),
        Err(err) => settings_error(err),
    }
}

pub async fn reset_settings(store: Arc<SettingsStore>) -> Response {
    match store.reset() {
        Ok(settings) => success_response(StatusCode::OK, settings),
        Err(err) => settings_error(err),
    }
}

fn success_response<T>(status: StatusCode, body: T) -> Response
where
    T: Serialize,
{
    reply::with_status(reply::json(&body), status).into_response()
}

fn settings_error(err: SettingsError) -> Response {
    err.into_http_response()
}
