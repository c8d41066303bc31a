use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A stock-tracked good. The current stock level is never stored; it is
/// derived as `opening_stock` plus the fold of stock-affecting vouchers.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub unit: Option<String>,
    pub stock_tracking_enabled: bool,
    /// Stock on hand when the item was first recorded
    pub opening_stock: Decimal,
    pub default_rate: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::customer_item_rate::Entity")]
    CustomerItemRates,
}

impl Related<super::customer_item_rate::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CustomerItemRates.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
