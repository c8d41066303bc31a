use axum::{
    extract::{Json, Path, Query, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};

use super::common::{created_response, no_content_response, success_response, ActiveFilter};
use crate::auth::AuthenticatedUser;
use crate::errors::ServiceError;
use crate::services::projects::{NewProject, UpdateProject};
use crate::AppState;

async fn list_projects(
    State(state): State<AppState>,
    Query(filter): Query<ActiveFilter>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    let projects = state.services.projects.list(filter.include_inactive).await?;
    Ok(success_response(projects))
}

async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    let project = state.services.projects.get(id).await?;
    Ok(success_response(project))
}

async fn create_project(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
    Json(input): Json<NewProject>,
) -> Result<impl IntoResponse, ServiceError> {
    let created = state.services.projects.create(input).await?;
    Ok(created_response(created))
}

async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    _user: AuthenticatedUser,
    Json(input): Json<UpdateProject>,
) -> Result<impl IntoResponse, ServiceError> {
    let updated = state.services.projects.update(id, input).await?;
    Ok(success_response(updated))
}

async fn deactivate_project(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    state.services.projects.deactivate(id).await?;
    Ok(no_content_response())
}

pub fn project_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_projects))
        .route("/", post(create_project))
        .route("/:id", get(get_project))
        .route("/:id", put(update_project))
        .route("/:id", delete(deactivate_project))
}
