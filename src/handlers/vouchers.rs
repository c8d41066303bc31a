use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use serde::Deserialize;

use super::common::{
    created_response, no_content_response, success_response, PaginatedResponse, PaginationParams,
};
use crate::auth::AuthenticatedUser;
use crate::entities::voucher::VoucherType;
use crate::errors::ServiceError;
use crate::services::vouchers::{VoucherFilter, VoucherInput};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct NextNumberQuery {
    pub voucher_type: VoucherType,
}

/// List vouchers newest-first with progressive filters
#[utoipa::path(
    get,
    path = "/api/v1/vouchers",
    params(VoucherFilter, PaginationParams),
    responses((status = 200, description = "Voucher page")),
    tag = "vouchers"
)]
pub async fn list_vouchers(
    State(state): State<AppState>,
    Query(filter): Query<VoucherFilter>,
    Query(pagination): Query<PaginationParams>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    let (vouchers, total) = state
        .services
        .vouchers
        .list(filter, pagination.page, pagination.per_page)
        .await?;
    Ok(success_response(PaginatedResponse::new(
        vouchers,
        pagination.page,
        pagination.per_page,
        total,
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/vouchers/{id}",
    responses(
        (status = 200, description = "The voucher"),
        (status = 404, description = "Voucher not found", body = crate::errors::ErrorResponse)
    ),
    tag = "vouchers"
)]
pub async fn get_voucher(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    let voucher = state.services.vouchers.get(id).await?;
    Ok(success_response(voucher))
}

/// Create a voucher. The transaction number is generated server-side and
/// the amount falls back to quantity x rate when omitted.
#[utoipa::path(
    post,
    path = "/api/v1/vouchers",
    request_body = VoucherInput,
    responses(
        (status = 201, description = "Voucher created"),
        (status = 400, description = "Validation failed", body = crate::errors::ErrorResponse)
    ),
    tag = "vouchers"
)]
pub async fn create_voucher(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(input): Json<VoucherInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state
        .services
        .vouchers
        .create(input, &user.username)
        .await?;
    Ok(created_response(created))
}

#[utoipa::path(
    put,
    path = "/api/v1/vouchers/{id}",
    request_body = VoucherInput,
    responses(
        (status = 200, description = "Voucher updated"),
        (status = 404, description = "Voucher not found", body = crate::errors::ErrorResponse)
    ),
    tag = "vouchers"
)]
pub async fn update_voucher(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    user: AuthenticatedUser,
    Json(input): Json<VoucherInput>,
) -> Result<impl IntoResponse, ServiceError> {
    let updated = state
        .services
        .vouchers
        .update(id, input, &user.username)
        .await?;
    Ok(success_response(updated))
}

#[utoipa::path(
    delete,
    path = "/api/v1/vouchers/{id}",
    responses(
        (status = 204, description = "Voucher deleted"),
        (status = 404, description = "Voucher not found", body = crate::errors::ErrorResponse)
    ),
    tag = "vouchers"
)]
pub async fn delete_voucher(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.vouchers.delete(id).await?;
    Ok(no_content_response())
}

/// Preview the next transaction number for a voucher type
async fn next_transaction_number(
    State(state): State<AppState>,
    Query(query): Query<NextNumberQuery>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    let transaction_number = state
        .services
        .vouchers
        .next_transaction_number(query.voucher_type)
        .await?;
    Ok(success_response(serde_json::json!({
        "transaction_number": transaction_number
    })))
}

pub fn voucher_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_vouchers))
        .route("/", post(create_voucher))
        .route("/next-number", get(next_transaction_number))
        .route("/:id", get(get_voucher))
        .route("/:id", put(update_voucher))
        .route("/:id", delete(delete_voucher))
}
