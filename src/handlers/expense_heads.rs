use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};

use super::common::{created_response, no_content_response, success_response, ActiveFilter};
use crate::auth::AuthenticatedUser;
use crate::errors::ServiceError;
use crate::services::expense_heads::{NewExpenseHead, UpdateExpenseHead};
use crate::AppState;

async fn list_expense_heads(
    State(state): State<AppState>,
    Query(filter): Query<ActiveFilter>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    let heads = state
        .services
        .expense_heads
        .list(filter.include_inactive)
        .await?;
    Ok(success_response(heads))
}

async fn get_expense_head(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    let head = state.services.expense_heads.get(id).await?;
    Ok(success_response(head))
}

async fn create_expense_head(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Json(input): Json<NewExpenseHead>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state.services.expense_heads.create(input).await?;
    Ok(created_response(created))
}

async fn update_expense_head(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    _user: AuthenticatedUser,
    Json(input): Json<UpdateExpenseHead>,
) -> Result<impl IntoResponse, ServiceError> {
    let updated = state.services.expense_heads.update(id, input).await?;
    Ok(success_response(updated))
}

async fn deactivate_expense_head(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.expense_heads.deactivate(id).await?;
    Ok(no_content_response())
}

pub fn expense_head_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_expense_heads))
        .route("/", post(create_expense_head))
        .route("/:id", get(get_expense_head))
        .route("/:id", put(update_expense_head))
        .route("/:id", delete(deactivate_expense_head))
}
