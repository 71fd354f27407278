//! Application state shared across handlers

use auth::AuthState;

use crate::dispatcher::Dispatcher;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthState,
    pub dispatcher: Dispatcher,
}
