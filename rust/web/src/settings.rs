use lowdraw_ai::POLICY_NAMES;
use lowdraw_engine::hand::TieRule;
use lowdraw_engine::rules::BettingStructure;
use serde::{Deserialize, Serialize};
use std::sync::RwLock;
use std::time::Duration;
use thiserror::Error;
use warp::http::StatusCode;

use crate::errors::{ErrorSeverity, IntoErrorResponse};

/// Defaults applied to new sessions, adjustable through `/api/settings`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppSettings {
    /// Stack given to each seat when a session request names none
    pub starting_stack: u32,
    /// How equal primary ranks are settled at showdown
    pub tie_rule: TieRule,
    /// Opponent policy name (see `lowdraw_ai::create_policy`)
    pub opponent_policy: String,
    /// Idle time after which a session is evicted
    pub session_timeout_minutes: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            starting_stack: 100,
            tie_rule: TieRule::default(),
            opponent_policy: "baseline".to_string(),
            session_timeout_minutes: 30,
        }
    }
}

impl AppSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        let required = BettingStructure::default().max_exposure();
        if self.starting_stack < required {
            return Err(SettingsError::InvalidValue(format!(
                "starting_stack must be at least {required}"
            )));
        }

        if !POLICY_NAMES.contains(&self.opponent_policy.as_str()) {
            return Err(SettingsError::InvalidValue(format!(
                "opponent_policy must be one of: {}",
                POLICY_NAMES.join(", ")
            )));
        }

        if self.session_timeout_minutes == 0 {
            return Err(SettingsError::InvalidValue(
                "session_timeout_minutes must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_timeout_minutes * 60)
    }
}

/// In-memory settings store with validation
#[derive(Debug)]
pub struct SettingsStore {
    settings: RwLock<AppSettings>,
}

impl SettingsStore {
    pub fn new() -> Self {
        Self {
            settings: RwLock::new(AppSettings::default()),
        }
    }

    pub fn with_settings(settings: AppSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        Ok(Self {
            settings: RwLock::new(settings),
        })
    }

    pub fn get(&self) -> Result<AppSettings, SettingsError> {
        self.settings
            .read()
            .map(|guard| guard.clone())
            .map_err(|_| SettingsError::StoragePoisoned)
    }

    /// Replaces all settings; rejected values leave the store unchanged
    pub fn update(&self, new_settings: AppSettings) -> Result<AppSettings, SettingsError> {
        new_settings.validate()?;

        let mut guard = self
            .settings
            .write()
            .map_err(|_| SettingsError::StoragePoisoned)?;
        *guard = new_settings.clone();
        tracing::info!(
            starting_stack = new_settings.starting_stack,
            tie_rule = new_settings.tie_rule.as_str(),
            opponent_policy = %new_settings.opponent_policy,
            session_timeout_minutes = new_settings.session_timeout_minutes,
            "settings updated"
        );
        Ok(new_settings)
    }

    pub fn update_field(
        &self,
        field: &str,
        value: serde_json::Value,
    ) -> Result<AppSettings, SettingsError> {
        let mut current = self.get()?;

        match field {
            "starting_stack" => {
                let stack = value
                    .as_u64()
                    .and_then(|v| u32::try_from(v).ok())
                    .ok_or_else(|| {
                        SettingsError::InvalidValue("starting_stack must be a number".to_string())
                    })?;
                current.starting_stack = stack;
            }
            "tie_rule" => {
                current.tie_rule = value
                    .as_str()
                    .and_then(TieRule::parse)
                    .ok_or_else(|| {
                        SettingsError::InvalidValue(
                            "tie_rule must be \"primary_rank\" or \"full_vector\"".to_string(),
                        )
                    })?;
            }
            "opponent_policy" => {
                let policy = value.as_str().ok_or_else(|| {
                    SettingsError::InvalidValue("opponent_policy must be a string".to_string())
                })?;
                current.opponent_policy = policy.to_string();
            }
            "session_timeout_minutes" => {
                let timeout = value.as_u64().ok_or_else(|| {
                    SettingsError::InvalidValue(
                        "session_timeout_minutes must be a number".to_string(),
                    )
                })?;
                current.session_timeout_minutes = timeout;
            }
            _ => {
                return Err(SettingsError::InvalidValue(format!(
                    "unknown field: {}",
                    field
                )))
            }
        }

        self.update(current)
    }

    pub fn reset(&self) -> Result<AppSettings, SettingsError> {
        self.update(AppSettings::default())
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
    #[error("Settings storage poisoned")]
    StoragePoisoned,
}

impl IntoErrorResponse for SettingsError {
    fn status_code(&self) -> StatusCode {
        match self {
            SettingsError::InvalidValue(_) => StatusCode::BAD_REQUEST,
            SettingsError::StoragePoisoned => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            SettingsError::InvalidValue(_) => "invalid_settings",
            SettingsError::StoragePoisoned => "settings_storage_error",
        }
    }

    fn error_message(&self) -> String {
        self.to_string()
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            SettingsError::StoragePoisoned => ErrorSeverity::Critical,
            SettingsError::InvalidValue(_) => ErrorSeverity::Client,
        }
    }
}
