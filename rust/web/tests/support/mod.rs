#![allow(dead_code)]

use lowdraw_web::{AppContext, WebServer};
use serde_json::Value;
use warp::filters::BoxedFilter;
use warp::http::StatusCode;
use warp::reply::Response;

pub fn routes() -> (AppContext, BoxedFilter<(Response,)>) {
    let ctx = AppContext::new_for_tests();
    let routes = WebServer::routes(&ctx);
    (ctx, routes)
}

pub async fn send(
    routes: &BoxedFilter<(Response,)>,
    method: &str,
    path: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut request = warp::test::request().method(method).path(path);
    if let Some(body) = body {
        request = request.json(&body);
    }
    let response = request.reply(routes).await;
    let status = response.status();
    let json = if response.body().is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(response.body()).unwrap_or(Value::Null)
    };
    (status, json)
}

pub async fn create(routes: &BoxedFilter<(Response,)>, body: Value) -> String {
    let (status, json) = send(routes, "POST", "/api/sessions", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {json}");
    json["session_id"].as_str().unwrap().to_string()
}

pub fn legal(json: &Value) -> Vec<String> {
    json["state"]["legal_actions"]
        .as_array()
        .map(|a| {
            a.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
