use axum::{routing::get, Json, Router};
use tracing::{debug, instrument};

use crate::{
    auth::{claims::Claims, extractors::AuthUser},
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new().route("/user", get(current_user))
}

/// Echoes the authenticated caller. Unrelated to the user records.
#[instrument(skip_all)]
pub async fn current_user(AuthUser(claims): AuthUser) -> Json<Claims> {
    debug!(sub = %claims.sub, "caller authenticated");
    Json(claims)
}
