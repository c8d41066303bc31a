use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::common::{no_content_response, success_response};
use crate::auth::AuthenticatedUser;
use crate::entities::user::UserRole;
use crate::errors::ServiceError;
use crate::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1))]
    pub username: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: i32,
    pub username: String,
    pub full_name: String,
    pub role: UserRole,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1))]
    pub current_password: String,
    #[validate(length(min = 6))]
    pub new_password: String,
}

/// Log in and open a session
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session opened", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = crate::errors::ErrorResponse),
        (status = 429, description = "Too many attempts", body = crate::errors::ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    request.validate()?;

    // Brute-force guard keyed by the attempted username
    if !state
        .rate_limiter
        .check(&format!("login:{}", request.username))
    {
        return Err(ServiceError::RateLimitExceeded);
    }

    let (token, user) = state
        .services
        .auth
        .login(&request.username, &request.password)
        .await?;
    state
        .event_sender
        .send_or_log(crate::events::Event::UserLoggedIn(user.id));

    Ok(success_response(LoginResponse {
        token,
        user_id: user.id,
        username: user.username,
        full_name: user.full_name,
        role: user.role,
    }))
}

async fn logout(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.auth.logout(&user.token);
    Ok(no_content_response())
}

async fn me(user: AuthenticatedUser) -> Result<impl IntoResponse, ServiceError> {
    Ok(success_response(serde_json::json!({
        "user_id": user.user_id,
        "username": user.username,
        "full_name": user.full_name,
        "role": user.role,
    })))
}

/// Self-service password change for the logged-in user
async fn change_password(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<impl IntoResponse, ServiceError> {
    request.validate()?;
    state
        .services
        .users
        .change_password(user.user_id, &request.current_password, &request.new_password)
        .await?;
    Ok(no_content_response())
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route("/change-password", post(change_password))
}
