use axum::{middleware, Router};

use crate::app::AppState;
use crate::auth::sso_middleware;

pub(crate) mod health;
mod session;

pub fn router(state: &AppState) -> Router<AppState> {
    let protected = session::router().route_layer(middleware::from_fn_with_state(
        state.plugin.clone(),
        sso_middleware,
    ));

    Router::new().merge(health::router()).merge(protected)
}
