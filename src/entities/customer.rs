use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A counterparty. The same customer can appear on the purchase side of one
/// voucher and the sale side of another.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "customers")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
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
