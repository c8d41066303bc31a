use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::common::{created_response, no_content_response, success_response, ActiveFilter};
use crate::auth::AuthenticatedUser;
use crate::errors::ServiceError;
use crate::services::customers::{NewCustomer, UpdateCustomer};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct BalanceQuery {
    pub as_of: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub struct RateBody {
    pub rate: Decimal,
}

async fn list_customers(
    State(state): State<AppState>,
    Query(filter): Query<ActiveFilter>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    let customers = state
        .services
        .customers
        .list(filter.include_inactive)
        .await?;
    Ok(success_response(customers))
}

async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    let customer = state.services.customers.get(id).await?;
    Ok(success_response(customer))
}

async fn create_customer(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(input): Json<NewCustomer>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state
        .services
        .customers
        .create(input, &user.username)
        .await?;
    Ok(created_response(created))
}

async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    user: AuthenticatedUser,
    Json(input): Json<UpdateCustomer>,
) -> Result<impl IntoResponse, ServiceError> {
    let updated = state
        .services
        .customers
        .update(id, input, &user.username)
        .await?;
    Ok(success_response(updated))
}

async fn deactivate_customer(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.customers.deactivate(id).await?;
    Ok(no_content_response())
}

async fn customer_balance(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<BalanceQuery>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    let balance = state.services.customers.balance(id, query.as_of).await?;
    Ok(success_response(balance))
}

async fn list_rates(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    let rates = state.services.customers.rates(id).await?;
    Ok(success_response(rates))
}

async fn upsert_rate(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(i32, i32)>,
    _user: AuthenticatedUser,
    Json(body): Json<RateBody>,
) -> Result<impl IntoResponse, ServiceError> {
    let rate = state
        .services
        .customers
        .upsert_rate(id, item_id, body.rate)
        .await?;
    Ok(success_response(rate))
}

async fn delete_rate(
    State(state): State<AppState>,
    Path((id, item_id)): Path<(i32, i32)>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.customers.delete_rate(id, item_id).await?;
    Ok(no_content_response())
}

pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_customers))
        .route("/", post(create_customer))
        .route("/:id", get(get_customer))
        .route("/:id", put(update_customer))
        .route("/:id", delete(deactivate_customer))
        .route("/:id/balance", get(customer_balance))
        .route("/:id/rates", get(list_rates))
        .route("/:id/rates/:item_id", put(upsert_rate))
        .route("/:id/rates/:item_id", delete(delete_rate))
}
