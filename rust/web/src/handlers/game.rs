use crate::errors::IntoErrorResponse;
use crate::session::{SessionConfig, SessionError, SessionId, SessionManager};
use lowdraw_engine::player::PlayerAction;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::http::{self, StatusCode};
use warp::reply::{self, Response};
use warp::Reply;

pub type CreateSessionRequest = SessionConfig;

#[derive(Debug, Deserialize)]
pub struct PlayerActionRequest {
    pub action: String,
}

#[derive(Debug, Deserialize)]
pub struct DiscardRequest {
    pub keep_indexes: Vec<usize>,
}

/// Starts a session and deals its first hand.
///
/// # HTTP Method and Path
/// - **Method**: POST
/// - **Path**: `/api/sessions`
///
/// # Request Format
/// ```json
/// {
///   "player_stack": 100,        // Optional: defaults to settings.starting_stack
///   "opponent_stack": 100,      // Optional
///   "seed": 12345,              // Optional: deterministic deals
///   "tie_rule": "primary_rank"  // Optional: or "full_vector"
/// }
/// ```
///
/// # Response Format
/// - **201 Created**: `{ "session_id", "player_hand": ["7S", ...], "state": {...} }`
/// - **400 Bad Request**: stacks cannot cover a hand, unknown policy
pub async fn create_session(
    sessions: Arc<SessionManager>,
    request: CreateSessionRequest,
) -> Response {
    match sessions.create_session(request) {
        Ok(view) => success_response(StatusCode::CREATED, view),
        Err(err) => session_error(err),
    }
}

pub async fn list_sessions(sessions: Arc<SessionManager>) -> Response {
    success_response(StatusCode::OK, sessions.summaries())
}

/// Current hand as seen by the player.
///
/// # Response Format
/// - **200 OK**: `{ "session_id", "player_hand", "state" }`
/// - **404 Not Found** / **410 Gone** (idle past the session timeout)
pub async fn get_session_state(sessions: Arc<SessionManager>, session_id: SessionId) -> Response {
    match sessions.state(&session_id) {
        Ok(view) => success_response(StatusCode::OK, view),
        Err(err) => session_error(err),
    }
}

/// Applies a player action; the opponent's replies are applied before returning.
///
/// # HTTP Method and Path
/// - **Method**: POST
/// - **Path**: `/api/sessions/{session_id}/actions`
///
/// # Request Format
/// ```json
/// { "action": "raise" }
/// ```
///
/// # Error Cases
/// - `invalid_request` (400): not one of fold/check/call/bet/raise
/// - `illegal_action` (400): not legal right now
/// - `invalid_state` (409): not the player's turn, or the hand is over
pub async fn submit_action(
    sessions: Arc<SessionManager>,
    session_id: SessionId,
    request: PlayerActionRequest,
) -> Response {
    let action = match request.action.parse::<PlayerAction>() {
        Ok(action) => action,
        Err(message) => return session_error(SessionError::InvalidRequest(message)),
    };
    match sessions.process_action(&session_id, action) {
        Ok(view) => success_response(StatusCode::OK, view),
        Err(err) => session_error(err),
    }
}

/// Replaces every card not listed in `keep_indexes`, then the opponent draws.
///
/// # Request Format
/// ```json
/// { "keep_indexes": [0, 2, 4] }
/// ```
pub async fn submit_discard(
    sessions: Arc<SessionManager>,
    session_id: SessionId,
    request: DiscardRequest,
) -> Response {
    match sessions.process_discard(&session_id, &request.keep_indexes) {
        Ok(view) => success_response(StatusCode::OK, view),
        Err(err) => session_error(err),
    }
}

/// Reveals both hands and pays the pot once the last betting round has closed.
pub async fn showdown(sessions: Arc<SessionManager>, session_id: SessionId) -> Response {
    match sessions.showdown(&session_id) {
        Ok(view) => success_response(StatusCode::OK, view),
        Err(err) => session_error(err),
    }
}

/// Deals the next hand with the stacks carried over.
pub async fn next_hand(sessions: Arc<SessionManager>, session_id: SessionId) -> Response {
    match sessions.next_hand(&session_id) {
        Ok(view) => success_response(StatusCode::CREATED, view),
        Err(err) => session_error(err),
    }
}

pub async fn delete_session(sessions: Arc<SessionManager>, session_id: SessionId) -> Response {
    match sessions.delete_session(&session_id) {
        Ok(()) => empty_response(StatusCode::NO_CONTENT),
        Err(err) => session_error(err),
    }
}

fn success_response<T>(status: StatusCode, body: T) -> Response
where
    T: Serialize,
{
    reply::with_status(reply::json(&body), status).into_response()
}

fn empty_response(status: StatusCode) -> Response {
    let mut response = http::Response::new(warp::hyper::Body::empty());
    *response.status_mut() = status;
    response
}

fn session_error(err: SessionError) -> Response {
    err.into_http_response()
}
