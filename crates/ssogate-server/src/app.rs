use axum::Router;
use std::time::Instant;

use crate::auth::SsoPlugin;

#[derive(Clone)]
pub struct AppState {
    pub started_at: Instant,
    pub plugin: SsoPlugin,
}

pub fn build_router(state: AppState) -> Router {
    crate::http::router(&state).with_state(state)
}
