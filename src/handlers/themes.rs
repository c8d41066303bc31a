use axum::{
    extract::{Json, State},
    response::IntoResponse,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;

use super::common::success_response;
use crate::auth::AuthenticatedUser;
use crate::errors::ServiceError;
use crate::services::themes::ThemeInput;
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct PresetBody {
    /// Light, Dark, or SemiDark
    pub theme_mode: String,
}

/// Reading the theme is open to every logged-in user; the UI needs it on
/// every page load
async fn get_theme(
    State(state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, ServiceError> {
    let theme = state.services.themes.current().await?;
    Ok(success_response(theme))
}

async fn save_theme(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(input): Json<ThemeInput>,
) -> Result<impl IntoResponse, ServiceError> {
    user.require_admin()?;
    let saved = state.services.themes.save(input, &user.username).await?;
    Ok(success_response(saved))
}

async fn apply_preset(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<PresetBody>,
) -> Result<impl IntoResponse, ServiceError> {
    user.require_admin()?;
    let saved = state
        .services
        .themes
        .apply_preset(&body.theme_mode, &user.username)
        .await?;
    Ok(success_response(saved))
}

pub fn theme_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_theme))
        .route("/", put(save_theme))
        .route("/preset", post(apply_preset))
}
