use crate::handlers;
use crate::middleware::with_request_logging;
use crate::session::{SessionError, SessionManager};
use crate::settings::{SettingsError, SettingsStore};
use std::convert::Infallible;
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use warp::filters::BoxedFilter;
use warp::reply::{Reply, Response};
use warp::Filter;

/// How often idle sessions are swept when no interval is configured.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct ServerConfig {
    host: String,
    port: u16,
    sweep_interval: Duration,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
        }
    }

    pub fn for_tests() -> Self {
        Self::new("127.0.0.1", 0)
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn sweep_interval(&self) -> Duration {
        self.sweep_interval
    }
}

#[derive(Debug, Clone)]
pub struct AppContext {
    config: ServerConfig,
    sessions: Arc<SessionManager>,
    settings: Arc<SettingsStore>,
}

impl AppContext {
    pub fn new(config: ServerConfig) -> Self {
        let settings = Arc::new(SettingsStore::new());
        let sessions = Arc::new(SessionManager::new(Arc::clone(&settings)));
        Self::new_with_dependencies(config, sessions, settings)
    }

    pub fn new_with_dependencies(
        config: ServerConfig,
        sessions: Arc<SessionManager>,
        settings: Arc<SettingsStore>,
    ) -> Self {
        Self {
            config,
            sessions,
            settings,
        }
    }

    pub fn new_for_tests() -> Self {
        Self::new(ServerConfig::for_tests())
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn sessions(&self) -> Arc<SessionManager> {
        Arc::clone(&self.sessions)
    }

    pub fn settings(&self) -> Arc<SettingsStore> {
        Arc::clone(&self.settings)
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Session error: {0}")]
    SessionError(#[from] SessionError),
    #[error("Settings error: {0}")]
    SettingsError(#[from] SettingsError),
}

#[derive(Debug, Clone)]
pub struct WebServer {
    context: AppContext,
}

impl WebServer {
    pub fn new(config: ServerConfig) -> Self {
        Self {
            context: AppContext::new(config),
        }
    }

    pub fn from_context(context: AppContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub async fn start(self) -> Result<ServerHandle, ServerError> {
        let WebServer { context } = self;
        let config = context.config().clone();
        let bind_addr = Self::bind_addr(&config)?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let routes = Self::routes(&context);
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
        };

        let (addr, server_future) = warp::serve(routes)
            .try_bind_with_graceful_shutdown(bind_addr, shutdown_signal)
            .map_err(Self::map_warp_error)?;

        info!(address = %addr, "web server listening");

        let task = tokio::spawn(async move {
            server_future.await;
            Ok(())
        });
        let sweeper = Self::spawn_sweeper(context.sessions(), config.sweep_interval());

        Ok(ServerHandle::new(addr, shutdown_tx, task, sweeper, context))
    }

    fn spawn_sweeper(sessions: Arc<SessionManager>, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            // the first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let evicted = sessions.cleanup_expired_sessions();
                if evicted > 0 {
                    info!(evicted, "expired sessions removed");
                } else {
                    debug!("session sweep found nothing to evict");
                }
            }
        })
    }

    fn bind_addr(config: &ServerConfig) -> Result<SocketAddr, ServerError> {
        let host = config.host();

        if let Ok(addr) = host.parse::<SocketAddr>() {
            return Ok(addr);
        }

        if let Ok(ip) = host.parse::<std::net::IpAddr>() {
            return Ok(SocketAddr::new(ip, config.port()));
        }

        let candidate = format!("{}:{}", host, config.port());
        let mut addrs = candidate.to_socket_addrs().map_err(|err| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`: {err}"))
        })?;

        addrs.next().ok_or_else(|| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`"))
        })
    }

    fn map_warp_error(err: warp::Error) -> ServerError {
        use std::error::Error as StdError;

        if let Some(source) = err.source() {
            if let Some(io_err) = source.downcast_ref::<std::io::Error>() {
                let recreated = std::io::Error::new(io_err.kind(), io_err.to_string());
                return ServerError::BindError(recreated);
            }
        }

        ServerError::ConfigError(err.to_string())
    }

    /// Every HTTP route, wrapped with request logging.
    pub fn routes(context: &AppContext) -> BoxedFilter<(Response,)> {
        let health = Self::health_route();
        let sessions = Self::session_routes(context);
        let settings = Self::settings_routes(context);

        with_request_logging(health.or(sessions).unify().or(settings).unify()).boxed()
    }

    fn health_route() -> BoxedFilter<(Response,)> {
        warp::path("health")
            .and(warp::get())
            .and(warp::path::end())
            .map(|| handlers::health().into_response())
            .boxed()
    }

    fn session_routes(context: &AppContext) -> BoxedFilter<(Response,)> {
        let sessions = context.sessions();

        let list = warp::path!("api" / "sessions")
            .and(warp::get())
            .and(Self::with_session_manager(sessions.clone()))
            .and_then(|sessions: Arc<SessionManager>| async move {
                Ok::<_, Infallible>(handlers::list_sessions(sessions).await)
            });

        let create = warp::path!("api" / "sessions")
            .and(warp::post())
            .and(Self::with_session_manager(sessions.clone()))
            .and(warp::body::json())
            .and_then(
                |sessions: Arc<SessionManager>,
                 request: handlers::CreateSessionRequest| async move {
                    Ok::<_, Infallible>(handlers::create_session(sessions, request).await)
                },
            );

        let state = warp::path!("api" / "sessions" / String / "state")
            .and(warp::get())
            .and(Self::with_session_manager(sessions.clone()))
            .and_then(
                |session_id: String, sessions: Arc<SessionManager>| async move {
                    Ok::<_, Infallible>(handlers::get_session_state(sessions, session_id).await)
                },
            );

        let actions = warp::path!("api" / "sessions" / String / "actions")
            .and(warp::post())
            .and(Self::with_session_manager(sessions.clone()))
            .and(warp::body::json())
            .and_then(
                |session_id: String,
                 sessions: Arc<SessionManager>,
                 request: handlers::PlayerActionRequest| async move {
                    Ok::<_, Infallible>(
                        handlers::submit_action(sessions, session_id, request).await,
                    )
                },
            );

        let discard = warp::path!("api" / "sessions" / String / "discard")
            .and(warp::post())
            .and(Self::with_session_manager(sessions.clone()))
            .and(warp::body::json())
            .and_then(
                |session_id: String,
                 sessions: Arc<SessionManager>,
                 request: handlers::DiscardRequest| async move {
                    Ok::<_, Infallible>(
                        handlers::submit_discard(sessions, session_id, request).await,
                    )
                },
            );

        let showdown = warp::path!("api" / "sessions" / String / "showdown")
            .and(warp::post())
            .and(Self::with_session_manager(sessions.clone()))
            .and_then(
                |session_id: String, sessions: Arc<SessionManager>| async move {
                    Ok::<_, Infallible>(handlers::showdown(sessions, session_id).await)
                },
            );

        let next_hand = warp::path!("api" / "sessions" / String / "hands")
            .and(warp::post())
            .and(Self::with_session_manager(sessions.clone()))
            .and_then(
                |session_id: String, sessions: Arc<SessionManager>| async move {
                    Ok::<_, Infallible>(handlers::next_hand(sessions, session_id).await)
                },
            );

        let delete = warp::path!("api" / "sessions" / String)
            .and(warp::delete())
            .and(Self::with_session_manager(sessions))
            .and_then(
                |session_id: String, sessions: Arc<SessionManager>| async move {
                    Ok::<_, Infallible>(handlers::delete_session(sessions, session_id).await)
                },
            );

        list.or(create)
            .unify()
            .or(state)
            .unify()
            .or(actions)
            .unify()
            .or(discard)
            .unify()
            .or(showdown)
            .unify()
            .or(next_hand)
            .unify()
            .or(delete)
            .unify()
            .boxed()
    }

    fn settings_routes(context: &AppContext) -> BoxedFilter<(Response,)> {
        let settings = context.settings();

        let get = warp::path!("api" / "settings")
            .and(warp::get())
            .and(Self::with_settings(settings.clone()))
            .and_then(|store: Arc<SettingsStore>| async move {
                Ok::<_, Infallible>(handlers::get_settings(store).await)
            });

        let put = warp::path!("api" / "settings")
            .and(warp::put())
            .and(Self::with_settings(settings.clone()))
            .and(warp::body::json())
            .and_then(
                |store: Arc<SettingsStore>, request: handlers::UpdateSettingsRequest| async move {
                    Ok::<_, Infallible>(handlers::update_settings(store, request).await)
                },
            );

        let patch = warp::path!("api" / "settings")
            .and(warp::patch())
            .and(Self::with_settings(settings.clone()))
            .and(warp::body::json())
            .and_then(
                |store: Arc<SettingsStore>, request: handlers::UpdateFieldRequest| async move {
                    Ok::<_, Infallible>(handlers::update_field(store, request).await)
                },
            );

        let reset = warp::path!("api" / "settings" / "reset")
            .and(warp::post())
            .and(Self::with_settings(settings))
            .and_then(|store: Arc<SettingsStore>| async move {
                Ok::<_, Infallible>(handlers::reset_settings(store).await)
            });

        get.or(put)
            .unify()
            .or(patch)
            .unify()
            .or(reset)
            .unify()
            .boxed()
    }

    fn with_session_manager(
        sessions: Arc<SessionManager>,
    ) -> impl Filter<Extract = (Arc<SessionManager>,), Error = Infallible> + Clone {
        warp::any().map(move || Arc::clone(&sessions))
    }

    fn with_settings(
        settings: Arc<SettingsStore>,
    ) -> impl Filter<Extract = (Arc<SettingsStore>,), Error = Infallible> + Clone {
        warp::any().map(move || Arc::clone(&settings))
    }
}

#[derive(Debug)]
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<Result<(), ServerError>>>,
    sweeper: Option<JoinHandle<()>>,
    context: AppContext,
}

impl ServerHandle {
    fn new(
        addr: SocketAddr,
        shutdown: oneshot::Sender<()>,
        task: JoinHandle<Result<(), ServerError>>,
        sweeper: JoinHandle<()>,
        context: AppContext,
    ) -> Self {
        Self {
            addr,
            shutdown: Some(shutdown),
            task: Some(task),
            sweeper: Some(sweeper),
            context,
        }
    }

    pub fn address(&self) -> SocketAddr {
        self.addr
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub async fn shutdown(mut self) -> Result<(), ServerError> {
        if let Some(sweeper) = self.sweeper.take() {
            sweeper.abort();
        }

        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            match task.await {
                Ok(result) => result?,
                Err(err) => {
                    return Err(ServerError::ConfigError(format!(
                        "server task join error: {err}"
                    )))
                }
            }
        }

        info!(address = %self.addr, "web server stopped");
        Ok(())
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        if let Some(sweeper) = self.sweeper.take() {
            sweeper.abort();
        }

        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
