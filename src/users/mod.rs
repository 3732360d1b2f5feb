pub mod dto;
pub mod extractors;
pub mod handlers;
#[cfg(test)]
pub mod memory;
pub mod repo;
pub mod repo_types;
mod rules;

use crate::state::AppState;
use axum::Router;

pub use repo::{PgUserRepository, UserRepository};
pub use repo_types::User;

pub fn router() -> Router<AppState> {
    handlers::user_routes()
}
