//! HTTP front end for heads-up triple draw lowball sessions.
//!
//! Each session owns one [`lowdraw_engine::engine::GameSession`] behind a mutex; the
//! [`SessionManager`] hands out ids, evicts idle sessions and maps engine
//! errors to HTTP statuses.

pub mod errors;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod server;
pub mod session;
pub mod settings;

pub use errors::{ErrorResponse, ErrorSeverity, IntoErrorResponse};
pub use logging::{init_logging, init_test_logging, LogEntry, LogFormat, TestLogSubscriber};
pub use middleware::{log_response, with_request_logging};
pub use server::{AppContext, ServerConfig, ServerError, ServerHandle, WebServer};
pub use session::{
    SessionConfig, SessionError, SessionId, SessionManager, SessionSummary, SessionView,
    ShowdownView,
};
pub use settings::{AppSettings, SettingsError, SettingsStore};
