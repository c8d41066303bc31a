use axum::{
    extract::{Json, Path, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::common::{no_content_response, success_response};
use crate::auth::{bearer_token, AuthenticatedUser};
use crate::entities::page_lock::LockMode;
use crate::errors::ServiceError;
use crate::AppState;

/// Route prefix of the page-lock administration surface; gated by the
/// master password rather than a per-page one
const MASTER_LOCK_URL: &str = "/api/v1/page-locks";

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PasswordBody {
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct VerifyPageBody {
    #[validate(length(min = 1))]
    pub page_url: String,
    #[validate(length(min = 1))]
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct LockModeBody {
    pub lock_mode: LockMode,
}

/// The admin screen is reachable only after verifying the master password.
/// In JustView mode the clearance is spent by this check, so the next visit
/// asks again.
async fn require_master_unlock(
    state: &AppState,
    user: &AuthenticatedUser,
) -> Result<(), ServiceError> {
    let master_row = state
        .services
        .page_locks
        .list()
        .await?
        .into_iter()
        .find(|l| l.page_url == MASTER_LOCK_URL);
    let consume = master_row
        .map(|l| l.lock_mode == LockMode::JustView)
        .unwrap_or(true);

    if state
        .services
        .auth
        .sessions()
        .check_unlock(&user.token, MASTER_LOCK_URL, consume)
    {
        Ok(())
    } else {
        Err(ServiceError::Forbidden(
            "Master password verification required".into(),
        ))
    }
}

/// Lists the page locks, seeding defaults on first use
async fn list_page_locks(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.page_locks.ensure_defaults().await?;
    require_master_unlock(&state, &user).await?;
    let locks = state.services.page_locks.list().await?;
    Ok(success_response(locks))
}

/// Verifies the master password, granting this session access to the
/// page-lock administration surface
async fn verify_master_password(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<PasswordBody>,
) -> Result<impl IntoResponse, ServiceError> {
    body.validate()?;
    state.services.page_locks.ensure_defaults().await?;

    if !state
        .rate_limiter
        .check(&format!("master-lock:{}", user.token))
    {
        return Err(ServiceError::RateLimitExceeded);
    }

    if state
        .services
        .page_locks
        .verify_master_password(&body.password)
        .await?
    {
        state
            .services
            .auth
            .sessions()
            .unlock_page(&user.token, MASTER_LOCK_URL);
        Ok(success_response(serde_json::json!({ "unlocked": true })))
    } else {
        Err(ServiceError::AuthError("Incorrect password".into()))
    }
}

/// Verifies a page password and stores the unlock in the session
async fn verify_page_password(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<VerifyPageBody>,
) -> Result<impl IntoResponse, ServiceError> {
    body.validate()?;

    if !state
        .rate_limiter
        .check(&format!("page-lock:{}", user.token))
    {
        return Err(ServiceError::RateLimitExceeded);
    }

    if state
        .services
        .page_locks
        .verify_page_password(&body.page_url, &body.password)
        .await?
    {
        state
            .services
            .auth
            .sessions()
            .unlock_page(&user.token, &body.page_url);
        Ok(success_response(serde_json::json!({ "unlocked": true })))
    } else {
        Err(ServiceError::AuthError("Incorrect password".into()))
    }
}

async fn toggle_lock(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    let updated = state.services.page_locks.toggle(id, &user.username).await?;
    Ok(success_response(updated))
}

async fn update_lock_password(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    user: AuthenticatedUser,
    Json(body): Json<PasswordBody>,
) -> Result<impl IntoResponse, ServiceError> {
    body.validate()?;
    state
        .services
        .page_locks
        .update_password(id, body.password, &user.username)
        .await?;
    Ok(no_content_response())
}

async fn update_lock_mode(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    user: AuthenticatedUser,
    Json(body): Json<LockModeBody>,
) -> Result<impl IntoResponse, ServiceError> {
    let updated = state
        .services
        .page_locks
        .update_lock_mode(id, body.lock_mode, &user.username)
        .await?;
    Ok(success_response(updated))
}

async fn update_master_password(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<PasswordBody>,
) -> Result<impl IntoResponse, ServiceError> {
    body.validate()?;
    state
        .services
        .page_locks
        .update_master_password(body.password, &user.username)
        .await?;
    Ok(no_content_response())
}

/// Router middleware enforcing the page locks: a request whose path falls
/// under a locked page is blocked with 403 and a lock payload unless the
/// session holds an unlock. JustView unlocks are consumed by the request
/// they admit; Login unlocks persist for the session.
pub async fn page_lock_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_string();

    // The lock administration and auth surfaces are never themselves gated
    if path.starts_with(MASTER_LOCK_URL) || path.starts_with("/auth") {
        return next.run(request).await;
    }

    let matched = match state.services.page_locks.find_matching_lock(&path).await {
        Ok(matched) => matched,
        Err(e) => return e.into_response(),
    };

    if let Some(lock) = matched {
        let token = bearer_token(request.headers());
        let unlocked = token
            .map(|token| {
                state.services.auth.sessions().check_unlock(
                    &token,
                    &lock.page_url,
                    lock.lock_mode == LockMode::JustView,
                )
            })
            .unwrap_or(false);

        if !unlocked {
            let payload = serde_json::json!({
                "locked": true,
                "page_name": lock.page_name,
                "page_url": lock.page_url,
                "message": "This page is locked. Please enter the password.",
            });
            return (axum::http::StatusCode::FORBIDDEN, axum::Json(payload)).into_response();
        }
    }

    next.run(request).await
}

pub fn page_lock_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_page_locks))
        .route("/verify-master", post(verify_master_password))
        .route("/verify", post(verify_page_password))
        .route("/master-password", put(update_master_password))
        .route("/:id/toggle", post(toggle_lock))
        .route("/:id/password", put(update_lock_password))
        .route("/:id/lock-mode", put(update_lock_mode))
}
