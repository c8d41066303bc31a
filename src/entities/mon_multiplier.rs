use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Conversion factor from mon (maund) to the item unit, configurable per
/// voucher type. Consulted by clients when pre-filling quantities; never
/// applied silently to voucher math.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mon_multipliers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub voucher_type: String,
    pub multiplier: Decimal,
    pub description: Option<String>,
    pub is_active: bool,
    pub updated_at: DateTime<Utc>,
    pub updated_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
