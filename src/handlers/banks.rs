use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;

use super::common::{created_response, no_content_response, success_response, ActiveFilter};
use crate::auth::AuthenticatedUser;
use crate::errors::ServiceError;
use crate::services::banks::{NewBank, UpdateBank};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    pub as_of: Option<NaiveDate>,
}

async fn list_banks(
    State(state): State<AppState>,
    Query(filter): Query<ActiveFilter>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    let banks = state.services.banks.list(filter.include_inactive).await?;
    Ok(success_response(banks))
}

async fn get_bank(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    let bank = state.services.banks.get(id).await?;
    Ok(success_response(bank))
}

async fn create_bank(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(input): Json<NewBank>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state.services.banks.create(input, &user.username).await?;
    Ok(created_response(created))
}

async fn update_bank(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    user: AuthenticatedUser,
    Json(input): Json<UpdateBank>,
) -> Result<impl IntoResponse, ServiceError> {
    let updated = state
        .services
        .banks
        .update(id, input, &user.username)
        .await?;
    Ok(success_response(updated))
}

async fn deactivate_bank(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.banks.deactivate(id).await?;
    Ok(no_content_response())
}

async fn bank_balance(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<BalanceQuery>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    let balance = state.services.banks.balance(id, query.as_of).await?;
    Ok(success_response(balance))
}

pub fn bank_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_banks))
        .route("/", post(create_bank))
        .route("/:id", get(get_bank))
        .route("/:id", put(update_bank))
        .route("/:id", delete(deactivate_bank))
        .route("/:id/balance", get(bank_balance))
}
