pub mod game;
pub mod health;
pub mod settings;

pub use game::{
    create_session, delete_session, get_session_state, list_sessions, next_hand, showdown,
    submit_action, submit_discard, CreateSessionRequest, DiscardRequest, PlayerActionRequest,
};
pub use health::health;
pub use settings::{
    get_settings, reset_settings, update_field, update_settings, UpdateFieldRequest,
    UpdateSettingsRequest,
};
