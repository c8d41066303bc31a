use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;

use super::common::{created_response, no_content_response, success_response};
use crate::auth::AuthenticatedUser;
use crate::errors::ServiceError;
use crate::services::mon_multipliers::MonMultiplierInput;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    pub voucher_type: String,
}

async fn list_multipliers(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    let multipliers = state.services.mon_multipliers.list().await?;
    Ok(success_response(multipliers))
}

/// Active multiplier for a voucher type, used by clients to pre-fill
/// quantities from mon weights
async fn lookup_multiplier(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    let multiplier = state
        .services
        .mon_multipliers
        .for_voucher_type(&query.voucher_type)
        .await?;
    Ok(success_response(multiplier))
}

async fn create_multiplier(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(input): Json<MonMultiplierInput>,
) -> Result<impl IntoResponse, ServiceError> {
    user.require_admin()?;
    let created = state
        .services
        .mon_multipliers
        .create(input, &user.username)
        .await?;
    Ok(created_response(created))
}

async fn update_multiplier(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    user: AuthenticatedUser,
    Json(input): Json<MonMultiplierInput>,
) -> Result<impl IntoResponse, ServiceError> {
    user.require_admin()?;
    let updated = state
        .services
        .mon_multipliers
        .update(id, input, &user.username)
        .await?;
    Ok(success_response(updated))
}

async fn delete_multiplier(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    user.require_admin()?;
    state.services.mon_multipliers.delete(id).await?;
    Ok(no_content_response())
}

pub fn mon_multiplier_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_multipliers))
        .route("/", post(create_multiplier))
        .route("/lookup", get(lookup_multiplier))
        .route("/:id", put(update_multiplier))
        .route("/:id", delete(delete_multiplier))
}
