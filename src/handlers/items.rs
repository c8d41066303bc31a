use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;

use super::common::{created_response, no_content_response, success_response, ActiveFilter};
use crate::auth::AuthenticatedUser;
use crate::errors::ServiceError;
use crate::services::items::{NewItem, UpdateItem};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RateQuery {
    pub customer_id: Option<i32>,
}

async fn list_items(
    State(state): State<AppState>,
    Query(filter): Query<ActiveFilter>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    let items = state.services.items.list(filter.include_inactive).await?;
    Ok(success_response(items))
}

async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    let item = state.services.items.get(id).await?;
    Ok(success_response(item))
}

async fn create_item(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(input): Json<NewItem>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state.services.items.create(input, &user.username).await?;
    Ok(created_response(created))
}

async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    user: AuthenticatedUser,
    Json(input): Json<UpdateItem>,
) -> Result<impl IntoResponse, ServiceError> {
    let updated = state
        .services
        .items
        .update(id, input, &user.username)
        .await?;
    Ok(success_response(updated))
}

async fn deactivate_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.items.deactivate(id).await?;
    Ok(no_content_response())
}

async fn item_stock(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    let stock = state.services.items.stock(id).await?;
    Ok(success_response(stock))
}

/// Rate lookup for voucher entry: negotiated customer rate when present,
/// otherwise the item default
async fn item_rate(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Query(query): Query<RateQuery>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    let rate = state
        .services
        .items
        .rate_for_customer(id, query.customer_id)
        .await?;
    Ok(success_response(rate))
}

pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_items))
        .route("/", post(create_item))
        .route("/:id", get(get_item))
        .route("/:id", put(update_item))
        .route("/:id", delete(deactivate_item))
        .route("/:id/stock", get(item_stock))
        .route("/:id/rate", get(item_rate))
}
