use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    error::ApiError,
    state::AppState,
    users::{
        dto::{
            CreatedUserResponse, FoundUserResponse, MessageResponse, UpdatedUserResponse,
            UserInput,
        },
        extractors::Payload,
        repo::WriteError,
        repo_types::User,
        rules::{EMAIL_TAKEN, USER_RULES},
    },
    validation::{validate, Input, ValidateError, ValidationErrors},
};

const NOT_FOUND: &str = "User not found";
const FIND_NOT_FOUND: &str = "User not found.";

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/user-find/:id", get(find_user))
        .route("/user-edit/:id", put(update_user))
        .route("/user-create", post(create_user))
        .route("/user-delete/:id", delete(delete_user))
}

/// Returns the bare array, without the `{message, data}` envelope the other
/// endpoints use.
#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.users.all().await?;
    Ok(Json(users))
}

#[instrument(skip(state))]
pub async fn find_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FoundUserResponse>, ApiError> {
    let user = load(&state, &id, FIND_NOT_FOUND).await?;
    Ok(Json(FoundUserResponse {
        message: "User found successfully.",
        data: user,
    }))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Payload,
) -> Result<(StatusCode, Json<CreatedUserResponse>), ApiError> {
    let input = validated_input(&state, &payload.0, None).await?;
    let user = state.users.create(&input).await.map_err(write_failed)?;

    info!(user_id = user.id, email = %user.email, "user created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedUserResponse {
            message: "User created successfully",
            user,
        }),
    ))
}

/// The record must exist before the payload is looked at: a missing id is a
/// 404 whatever the body contains.
#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Payload,
) -> Result<Json<UpdatedUserResponse>, ApiError> {
    let current = load(&state, &id, NOT_FOUND).await?;
    let input = validated_input(&state, &payload.0, Some(current.id)).await?;
    let user = state
        .users
        .update(current.id, &input)
        .await
        .map_err(write_failed)?
        .ok_or(ApiError::NotFound(NOT_FOUND))?;

    info!(user_id = user.id, "user updated");
    Ok(Json(UpdatedUserResponse {
        message: "User updated successfully",
        update_user: user,
    }))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let user = load(&state, &id, NOT_FOUND).await?;
    if !state.users.delete(user.id).await? {
        return Err(ApiError::NotFound(NOT_FOUND));
    }

    info!(user_id = user.id, "user deleted");
    Ok(Json(MessageResponse {
        message: "User deleted successfully",
    }))
}

// --- helpers ---

/// Ids that are not positive integers can never match a row.
fn parse_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id > 0)
}

async fn load(state: &AppState, raw_id: &str, not_found: &'static str) -> Result<User, ApiError> {
    let Some(id) = parse_id(raw_id) else {
        warn!(id = raw_id, "malformed user id");
        return Err(ApiError::NotFound(not_found));
    };
    match state.users.find(id).await? {
        Some(user) => Ok(user),
        None => {
            warn!(id, "user not found");
            Err(ApiError::NotFound(not_found))
        }
    }
}

async fn validated_input(
    state: &AppState,
    input: &Input,
    ignore_id: Option<i64>,
) -> Result<UserInput, ApiError> {
    let validated = match validate(input, USER_RULES, state.users.as_ref(), ignore_id).await {
        Ok(v) => v,
        Err(ValidateError::Invalid(errors)) => {
            warn!(fields = %errors, "user payload rejected");
            return Err(ApiError::Validation(errors));
        }
        Err(ValidateError::Lookup(e)) => return Err(ApiError::Internal(e)),
    };
    Ok(UserInput::try_from(validated)?)
}

/// A unique-constraint race lost at the storage layer reads the same as a
/// failed uniqueness rule.
fn write_failed(e: WriteError) -> ApiError {
    match e {
        WriteError::DuplicateEmail => {
            warn!("email unique constraint violated");
            let mut errors = ValidationErrors::default();
            errors.add("email", EMAIL_TAKEN);
            ApiError::Validation(errors)
        }
        WriteError::Other(e) => ApiError::Internal(e),
    }
}
