use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::common::{created_response, no_content_response, success_response};
use crate::auth::AuthenticatedUser;
use crate::errors::ServiceError;
use crate::services::users::{NewUser, UpdateUser};
use crate::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ResetPasswordRequest {
    #[validate(length(min = 6))]
    pub new_password: String,
}

async fn list_users(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    user.require_admin()?;
    let users = state.services.users.list().await?;
    Ok(success_response(users))
}

async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    user.require_admin()?;
    let found = state.services.users.get(id).await?;
    Ok(success_response(found))
}

async fn create_user(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(input): Json<NewUser>,
) -> Result<impl IntoResponse, ServiceError> {
    user.require_admin()?;
    let created = state.services.users.create(input, &user.username).await?;
    state
        .event_sender
        .send_or_log(crate::events::Event::UserCreated(created.id));
    Ok(created_response(created))
}

async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    user: AuthenticatedUser,
    Json(input): Json<UpdateUser>,
) -> Result<impl IntoResponse, ServiceError> {
    user.require_admin()?;
    let updated = state.services.users.update(id, input).await?;
    Ok(success_response(updated))
}

async fn toggle_user_status(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    user.require_admin()?;
    let updated = state.services.users.toggle_status(id).await?;
    Ok(success_response(updated))
}

async fn reset_password(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    user: AuthenticatedUser,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    user.require_admin()?;
    request.validate()?;
    state
        .services
        .users
        .reset_password(id, &request.new_password)
        .await?;
    Ok(no_content_response())
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/", post(create_user))
        .route("/:id", get(get_user))
        .route("/:id", put(update_user))
        .route("/:id/toggle-status", post(toggle_user_status))
        .route("/:id/reset-password", post(reset_password))
}
