//! Bearer-token passthrough route. Token issuance lives elsewhere.

use crate::state::AppState;
use axum::Router;

pub mod claims;
pub(crate) mod extractors;
pub mod handlers;

pub fn router() -> Router<AppState> {
    handlers::auth_routes()
}
