use crate::errors::{ErrorSeverity, IntoErrorResponse};
use crate::settings::{AppSettings, SettingsError, SettingsStore};
use chrono::{DateTime, SecondsFormat, Utc};
use lowdraw_ai::create_policy;
use lowdraw_engine::engine::{GameSession, StateSnapshot, TableConfig};
use lowdraw_engine::errors::GameError;
use lowdraw_engine::game::{HandResult, Payout};
use lowdraw_engine::hand::{Hand, TieRule};
use lowdraw_engine::player::PlayerAction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::{Duration, Instant};
use thiserror::Error;
use uuid::Uuid;
use warp::http::StatusCode;

pub type SessionId = String;

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// Parameters for a new session. Unset fields fall back to [`AppSettings`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionConfig {
    #[serde(default)]
    pub player_stack: Option<u32>,
    #[serde(default)]
    pub opponent_stack: Option<u32>,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub tie_rule: Option<TieRule>,
    #[serde(default)]
    pub opponent_policy: Option<String>,
}

/// What the player sees: their own cards and the public state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionView {
    pub session_id: SessionId,
    pub player_hand: Vec<String>,
    pub state: StateSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ShowdownView {
    pub session_id: SessionId,
    pub result: HandResult,
    pub player_hand: Vec<String>,
    pub opponent_hand: Vec<String>,
    pub player_rank: String,
    pub opponent_rank: String,
    pub payout: Payout,
    pub state: StateSnapshot,
}

/// Listing entry for `GET /api/sessions`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionSummary {
    pub session_id: SessionId,
    pub created_at: String,
    pub hand_number: u64,
    pub policy: String,
}

fn card_text(hand: &Hand) -> Vec<String> {
    hand.cards().iter().map(|c| c.to_string()).collect()
}

/// One stored session. The `Mutex` serializes requests against the same game.
pub struct SessionEntry {
    id: SessionId,
    game: Mutex<GameSession>,
    created_at: DateTime<Utc>,
    last_active: Mutex<Instant>,
}

impl std::fmt::Debug for SessionEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionEntry")
            .field("id", &self.id)
            .field("created_at", &self.created_at)
            .finish()
    }
}

impl SessionEntry {
    fn new(id: SessionId, game: GameSession) -> Self {
        Self {
            id,
            game: Mutex::new(game),
            created_at: Utc::now(),
            last_active: Mutex::new(Instant::now()),
        }
    }

    fn touch(&self) {
        if let Ok(mut guard) = self.last_active.lock() {
            *guard = Instant::now();
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        match self.last_active.lock() {
            Ok(guard) => guard.elapsed() > ttl,
            Err(_) => true,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, GameSession>, SessionError> {
        self.game.lock().map_err(|_| SessionError::StoragePoisoned)
    }

    fn view(&self, game: &GameSession) -> SessionView {
        SessionView {
            session_id: self.id.clone(),
            player_hand: card_text(game.player_hand()),
            state: game.snapshot(),
        }
    }
}

/// Explicit session store keyed by generated ids, with idle eviction.
#[derive(Debug)]
pub struct SessionManager {
    sessions: RwLock<HashMap<SessionId, Arc<SessionEntry>>>,
    settings: Arc<SettingsStore>,
    ttl_override: Option<Duration>,
}

impl SessionManager {
    pub fn new(settings: Arc<SettingsStore>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            settings,
            ttl_override: None,
        }
    }

    /// Uses a fixed TTL instead of the one in settings.
    pub fn with_ttl(settings: Arc<SettingsStore>, ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            settings,
            ttl_override: Some(ttl),
        }
    }

    pub fn session_ttl(&self) -> Duration {
        if let Some(ttl) = self.ttl_override {
            return ttl;
        }
        self.settings
            .get()
            .map(|s| s.session_ttl())
            .unwrap_or(DEFAULT_SESSION_TTL)
    }

    pub fn create_session(&self, config: SessionConfig) -> Result<SessionView, SessionError> {
        let defaults = self.settings.get()?;
        let (table, player_stack, opponent_stack, policy_name) = resolve(&defaults, config);
        let policy = create_policy(&policy_name)?;
        let game = GameSession::start_hand(table, policy, player_stack, opponent_stack)?;

        let id = Uuid::new_v4().to_string();
        let entry = Arc::new(SessionEntry::new(id.clone(), game));
        let view = {
            let game = entry.lock()?;
            entry.view(&game)
        };

        {
            let mut guard = self
                .sessions
                .write()
                .map_err(|_| SessionError::StoragePoisoned)?;
            guard.insert(id.clone(), entry);
        }

        tracing::info!(
            session_id = %id,
            player_stack,
            opponent_stack,
            policy = %policy_name,
            "session created"
        );
        Ok(view)
    }

    pub fn state(&self, session_id: &SessionId) -> Result<SessionView, SessionError> {
        self.with_game(session_id, |entry, game| Ok(entry.view(game)))
    }

    pub fn process_action(
        &self,
        session_id: &SessionId,
        action: PlayerAction,
    ) -> Result<SessionView, SessionError> {
        self.with_game(session_id, |entry, game| {
            game.apply_player_action(action)?;
            Ok(entry.view(game))
        })
    }

    pub fn process_discard(
        &self,
        session_id: &SessionId,
        keep: &[usize],
    ) -> Result<SessionView, SessionError> {
        self.with_game(session_id, |entry, game| {
            game.apply_discards(keep)?;
            Ok(entry.view(game))
        })
    }

    pub fn showdown(&self, session_id: &SessionId) -> Result<ShowdownView, SessionError> {
        self.with_game(session_id, |entry, game| {
            let outcome = game.resolve_showdown()?;
            Ok(ShowdownView {
                session_id: entry.id.clone(),
                result: outcome.result,
                player_hand: card_text(&outcome.player_hand),
                opponent_hand: card_text(&outcome.opponent_hand),
                player_rank: outcome.player_rank.to_string(),
                opponent_rank: outcome.opponent_rank.to_string(),
                payout: outcome.payout,
                state: outcome.state,
            })
        })
    }

    pub fn next_hand(&self, session_id: &SessionId) -> Result<SessionView, SessionError> {
        self.with_game(session_id, |entry, game| {
            game.next_hand()?;
            Ok(entry.view(game))
        })
    }

    pub fn delete_session(&self, session_id: &SessionId) -> Result<(), SessionError> {
        match self.remove_session(session_id)? {
            Some(_) => {
                tracing::info!(session_id = %session_id, "session deleted");
                Ok(())
            }
            None => Err(SessionError::NotFound(session_id.clone())),
        }
    }

    /// Drops every idle session; returns how many were evicted.
    pub fn cleanup_expired_sessions(&self) -> usize {
        let ttl = self.session_ttl();
        let mut guard = match self.sessions.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let before = guard.len();
        guard.retain(|id, entry| {
            let expired = entry.is_expired(ttl);
            if expired {
                tracing::info!(session_id = %id, "session expired");
            }
            !expired
        });
        before - guard.len()
    }

    pub fn active_sessions(&self) -> Vec<SessionId> {
        match self.sessions.read() {
            Ok(guard) => guard.keys().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn summaries(&self) -> Vec<SessionSummary> {
        let entries: Vec<Arc<SessionEntry>> = match self.sessions.read() {
            Ok(guard) => guard.values().cloned().collect(),
            Err(_) => return Vec::new(),
        };
        let mut summaries: Vec<SessionSummary> = entries
            .iter()
            .filter_map(|entry| {
                let game = entry.lock().ok()?;
                Some(SessionSummary {
                    session_id: entry.id.clone(),
                    created_at: entry
                        .created_at
                        .to_rfc3339_opts(SecondsFormat::Secs, true),
                    hand_number: game.hand_number(),
                    policy: game.policy_name().to_string(),
                })
            })
            .collect();
        summaries.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        summaries
    }

    fn get_session(&self, id: &SessionId) -> Result<Arc<SessionEntry>, SessionError> {
        let guard = self
            .sessions
            .read()
            .map_err(|_| SessionError::StoragePoisoned)?;
        guard
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(id.clone()))
    }

    /// Looks up a live session, evicting it if idle too long, and runs `f`
    /// with its game locked.
    fn with_game<T>(
        &self,
        session_id: &SessionId,
        f: impl FnOnce(&SessionEntry, &mut GameSession) -> Result<T, SessionError>,
    ) -> Result<T, SessionError> {
        let entry = self.get_session(session_id)?;
        if entry.is_expired(self.session_ttl()) {
            self.remove_session(session_id)?;
            tracing::info!(session_id = %session_id, "session evicted on access");
            return Err(SessionError::Expired(session_id.clone()));
        }
        entry.touch();
        let mut game = entry.lock()?;
        f(&entry, &mut game)
    }

    fn remove_session(
        &self,
        session_id: &SessionId,
    ) -> Result<Option<Arc<SessionEntry>>, SessionError> {
        match self.sessions.write() {
            Ok(mut guard) => Ok(guard.remove(session_id)),
            Err(_) => Err(SessionError::StoragePoisoned),
        }
    }
}

fn resolve(defaults: &AppSettings, config: SessionConfig) -> (TableConfig, u32, u32, String) {
    let table = TableConfig {
        tie_rule: config.tie_rule.unwrap_or(defaults.tie_rule),
        seed: config.seed,
        ..TableConfig::default()
    };
    (
        table,
        config.player_stack.unwrap_or(defaults.starting_stack),
        config.opponent_stack.unwrap_or(defaults.starting_stack),
        config
            .opponent_policy
            .unwrap_or_else(|| defaults.opponent_policy.clone()),
    )
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),
    #[error("Session expired: {0}")]
    Expired(SessionId),
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    #[error(transparent)]
    Game(#[from] GameError),
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error("Session storage poisoned")]
    StoragePoisoned,
}

impl IntoErrorResponse for SessionError {
    fn status_code(&self) -> StatusCode {
        match self {
            SessionError::NotFound(_) => StatusCode::NOT_FOUND,
            SessionError::Expired(_) => StatusCode::GONE,
            SessionError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            SessionError::Game(err) => match err {
                GameError::InvalidState(_) => StatusCode::CONFLICT,
                GameError::DeckExhausted { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                _ => StatusCode::BAD_REQUEST,
            },
            SessionError::Settings(err) => err.status_code(),
            SessionError::StoragePoisoned => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            SessionError::NotFound(_) => "session_not_found",
            SessionError::Expired(_) => "session_expired",
            SessionError::InvalidRequest(_) => "invalid_request",
            SessionError::Game(err) => match err {
                GameError::IllegalAction { .. } => "illegal_action",
                GameError::InvalidState(_) => "invalid_state",
                GameError::InvalidDiscard(_) => "invalid_discard",
                GameError::DeckExhausted { .. } => "deck_exhausted",
                GameError::InsufficientChips { .. } => "insufficient_chips",
                GameError::InvalidCard(_) => "invalid_card",
                GameError::InvalidConfig(_) => "invalid_config",
            },
            SessionError::Settings(err) => err.error_code(),
            SessionError::StoragePoisoned => "session_storage_error",
        }
    }

    fn error_message(&self) -> String {
        self.to_string()
    }

    fn error_details(&self) -> Option<serde_json::Value> {
        match self {
            SessionError::NotFound(id) => Some(serde_json::json!({
                "session_id": id
            })),
            SessionError::Expired(id) => Some(serde_json::json!({
                "session_id": id,
                "reason": "Session expired due to inactivity"
            })),
            SessionError::Game(GameError::IllegalAction { seat, action }) => {
                Some(serde_json::json!({
                    "seat": seat,
                    "action": action
                }))
            }
            SessionError::Game(GameError::InsufficientChips {
                seat,
                required,
                available,
            }) => Some(serde_json::json!({
                "seat": seat,
                "required": required,
                "available": available
            })),
            _ => None,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            SessionError::StoragePoisoned => ErrorSeverity::Critical,
            SessionError::Game(err) if err.is_fatal() => ErrorSeverity::Critical,
            SessionError::Settings(err) => err.severity(),
            _ => ErrorSeverity::Client,
        }
    }
}
