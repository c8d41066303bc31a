use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use serde::Deserialize;
use tracing::instrument;
use utoipa::ToSchema;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::theme_setting;
use crate::errors::ServiceError;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ThemeInput {
    #[validate(length(min = 1, max = 20))]
    pub theme_mode: String,
    #[validate(length(equal = 7))]
    pub primary_color: String,
    #[validate(length(equal = 7))]
    pub secondary_color: String,
    #[validate(length(equal = 7))]
    pub success_color: String,
    #[validate(length(equal = 7))]
    pub danger_color: String,
    #[validate(length(equal = 7))]
    pub warning_color: String,
    #[validate(length(equal = 7))]
    pub info_color: String,
    #[validate(length(equal = 7))]
    pub background_color: String,
    #[validate(length(equal = 7))]
    pub text_color: String,
    #[validate(length(equal = 7))]
    pub card_background_color: String,
    #[validate(length(equal = 7))]
    pub navbar_background_color: String,
    #[validate(length(equal = 7))]
    pub sidebar_background_color: String,
    #[validate(length(equal = 7))]
    pub footer_background_color: String,
}

/// Bundled palettes selectable by name
fn preset(theme_mode: &str) -> Option<ThemeInput> {
    match theme_mode {
        "Light" => Some(ThemeInput {
            theme_mode: "Light".into(),
            primary_color: "#0d6efd".into(),
            secondary_color: "#6c757d".into(),
            success_color: "#198754".into(),
            danger_color: "#dc3545".into(),
            warning_color: "#ffc107".into(),
            info_color: "#0dcaf0".into(),
            background_color: "#ffffff".into(),
            text_color: "#212529".into(),
            card_background_color: "#ffffff".into(),
            navbar_background_color: "#ffffff".into(),
            sidebar_background_color: "#ffffff".into(),
            footer_background_color: "#f8f9fa".into(),
        }),
        "Dark" => Some(ThemeInput {
            theme_mode: "Dark".into(),
            primary_color: "#375a7f".into(),
            secondary_color: "#444444".into(),
            success_color: "#00bc8c".into(),
            danger_color: "#e74c3c".into(),
            warning_color: "#f39c12".into(),
            info_color: "#3498db".into(),
            background_color: "#222222".into(),
            text_color: "#ffffff".into(),
            card_background_color: "#303030".into(),
            navbar_background_color: "#303030".into(),
            sidebar_background_color: "#303030".into(),
            footer_background_color: "#303030".into(),
        }),
        "SemiDark" => Some(ThemeInput {
            theme_mode: "SemiDark".into(),
            primary_color: "#0d6efd".into(),
            secondary_color: "#6c757d".into(),
            success_color: "#198754".into(),
            danger_color: "#dc3545".into(),
            warning_color: "#ffc107".into(),
            info_color: "#0dcaf0".into(),
            background_color: "#ffffff".into(),
            text_color: "#212529".into(),
            card_background_color: "#ffffff".into(),
            navbar_background_color: "#343a40".into(),
            sidebar_background_color: "#343a40".into(),
            footer_background_color: "#f8f9fa".into(),
        }),
        _ => None,
    }
}

/// Service managing the single active theme row
#[derive(Clone)]
pub struct ThemeService {
    db: Arc<DbPool>,
}

impl ThemeService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Active theme, or the bundled Light palette when none was saved yet
    #[instrument(skip(self))]
    pub async fn current(&self) -> Result<theme_setting::Model, ServiceError> {
        let db = &*self.db;
        let existing = theme_setting::Entity::find()
            .filter(theme_setting::Column::IsActive.eq(true))
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        match existing {
            Some(model) => Ok(model),
            None => self.save(preset("Light").expect("bundled palette"), "system").await,
        }
    }

    /// Saves the theme, updating the active row in place or creating it
    #[instrument(skip(self, input))]
    pub async fn save(
        &self,
        input: ThemeInput,
        actor: &str,
    ) -> Result<theme_setting::Model, ServiceError> {
        input.validate()?;
        let db = &*self.db;
        let existing = theme_setting::Entity::find()
            .filter(theme_setting::Column::IsActive.eq(true))
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        match existing {
            Some(model) => {
                let mut active: theme_setting::ActiveModel = model.into();
                active.theme_mode = Set(input.theme_mode);
                active.primary_color = Set(input.primary_color);
                active.secondary_color = Set(input.secondary_color);
                active.success_color = Set(input.success_color);
                active.danger_color = Set(input.danger_color);
                active.warning_color = Set(input.warning_color);
                active.info_color = Set(input.info_color);
                active.background_color = Set(input.background_color);
                active.text_color = Set(input.text_color);
                active.card_background_color = Set(input.card_background_color);
                active.navbar_background_color = Set(input.navbar_background_color);
                active.sidebar_background_color = Set(input.sidebar_background_color);
                active.footer_background_color = Set(input.footer_background_color);
                active.updated_at = Set(Utc::now());
                active.updated_by = Set(Some(actor.to_string()));
                active.update(db).await.map_err(ServiceError::DatabaseError)
            }
            None => {
                let model = theme_setting::ActiveModel {
                    theme_mode: Set(input.theme_mode),
                    primary_color: Set(input.primary_color),
                    secondary_color: Set(input.secondary_color),
                    success_color: Set(input.success_color),
                    danger_color: Set(input.danger_color),
                    warning_color: Set(input.warning_color),
                    info_color: Set(input.info_color),
                    background_color: Set(input.background_color),
                    text_color: Set(input.text_color),
                    card_background_color: Set(input.card_background_color),
                    navbar_background_color: Set(input.navbar_background_color),
                    sidebar_background_color: Set(input.sidebar_background_color),
                    footer_background_color: Set(input.footer_background_color),
                    is_active: Set(true),
                    updated_at: Set(Utc::now()),
                    updated_by: Set(Some(actor.to_string())),
                    ..Default::default()
                };
                model.insert(db).await.map_err(ServiceError::DatabaseError)
            }
        }
    }

    /// Applies one of the bundled palettes
    #[instrument(skip(self))]
    pub async fn apply_preset(
        &self,
        theme_mode: &str,
        actor: &str,
    ) -> Result<theme_setting::Model, ServiceError> {
        let palette = preset(theme_mode).ok_or_else(|| {
            ServiceError::InvalidInput(format!(
                "Unknown theme preset '{}'; expected Light, Dark, or SemiDark",
                theme_mode
            ))
        })?;
        self.save(palette, actor).await
    }
}
