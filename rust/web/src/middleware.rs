use std::time::Instant;
use warp::http::{Method, StatusCode};
use warp::reject::Rejection;
use warp::reply::{Reply, Response};
use warp::Filter;

/// Request line captured before the inner filter runs.
#[derive(Debug, Clone)]
pub struct RequestInfo {
    pub path: String,
    pub method: Method,
    pub started: Instant,
}

/// Wraps `filter` so every request is logged on entry and its status on exit.
pub fn with_request_logging<F, T>(
    filter: F,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone
where
    F: Filter<Extract = (T,), Error = Rejection> + Clone + Send + Sync + 'static,
    T: Reply,
{
    warp::any()
        .and(warp::path::full())
        .and(warp::method())
        .map(|path: warp::path::FullPath, method: Method| {
            tracing::debug!(path = %path.as_str(), method = %method, "incoming request");
            RequestInfo {
                path: path.as_str().to_string(),
                method,
                started: Instant::now(),
            }
        })
        .and(filter)
        .map(|info: RequestInfo, reply: T| {
            let response = reply.into_response();
            log_response(
                response.status(),
                &info.path,
                info.method.as_str(),
                info.started.elapsed().as_millis(),
            );
            response
        })
}

/// Log response with status code
pub fn log_response(status: StatusCode, path: &str, method: &str, duration_ms: u128) {
    if status.is_server_error() {
        tracing::error!(
            status = %status.as_u16(),
            path = %path,
            method = %method,
            duration_ms = duration_ms,
            "server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            status = %status.as_u16(),
            path = %path,
            method = %method,
            duration_ms = duration_ms,
            "client error"
        );
    } else {
        tracing::info!(
            status = %status.as_u16(),
            path = %path,
            method = %method,
            duration_ms = duration_ms,
            "response sent"
        );
    }
}
