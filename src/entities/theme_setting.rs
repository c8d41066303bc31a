use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Application-wide color theme. One active row at a time.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "theme_settings")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Light, Dark, or SemiDark
    pub theme_mode: String,
    pub primary_color: String,
    pub secondary_color: String,
    pub success_color: String,
    pub danger_color: String,
    pub warning_color: String,
    pub info_color: String,
    pub background_color: String,
    pub text_color: String,
    pub card_background_color: String,
    pub navbar_background_color: String,
    pub sidebar_background_color: String,
    pub footer_background_color: String,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
