use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Direction of an admin cash adjustment
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum CashAdjustmentType {
    #[sea_orm(string_value = "CashIn")]
    CashIn,
    #[sea_orm(string_value = "CashOut")]
    CashOut,
}

/// Manual cash-drawer correction outside the voucher flow. Participates in
/// the cash ledger alongside cash vouchers.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cash_adjustments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub adjustment_date: NaiveDate,
    pub adjustment_type: CashAdjustmentType,
    pub amount: Decimal,
    pub description: Option<String>,
    pub reference_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Positive for cash-in, negative for cash-out
    pub fn signed_amount(&self) -> Decimal {
        match self.adjustment_type {
            CashAdjustmentType::CashIn => self.amount,
            CashAdjustmentType::CashOut => -self.amount,
        }
    }
}
