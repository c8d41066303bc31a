use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::{bank, voucher};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::ledger;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewBank {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 50))]
    pub account_number: Option<String>,
    #[serde(default)]
    pub opening_balance: Decimal,
    #[validate(length(max = 500))]
    pub details: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateBank {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 50))]
    pub account_number: Option<String>,
    pub opening_balance: Decimal,
    #[validate(length(max = 500))]
    pub details: Option<String>,
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Derived balance of a bank account
#[derive(Debug, Serialize, ToSchema)]
pub struct BankBalance {
    pub bank_id: i32,
    pub as_of: Option<NaiveDate>,
    pub opening_balance: Decimal,
    /// Opening balance plus the fold of bank-touching vouchers
    pub balance: Decimal,
}

/// Service for managing banks and balance derivation
#[derive(Clone)]
pub struct BankService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl BankService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, include_inactive: bool) -> Result<Vec<bank::Model>, ServiceError> {
        let db = &*self.db;
        let mut query = bank::Entity::find().order_by_asc(bank::Column::Name);
        if !include_inactive {
            query = query.filter(bank::Column::IsActive.eq(true));
        }
        query.all(db).await.map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<bank::Model, ServiceError> {
        let db = &*self.db;
        bank::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Bank with ID {} not found", id)))
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: NewBank, actor: &str) -> Result<bank::Model, ServiceError> {
        input.validate()?;
        if input.opening_balance < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Balance cannot be negative".into(),
            ));
        }
        let db = &*self.db;
        let model = bank::ActiveModel {
            name: Set(input.name),
            account_number: Set(input.account_number),
            opening_balance: Set(input.opening_balance),
            details: Set(input.details),
            is_active: Set(input.is_active),
            created_at: Set(Utc::now()),
            created_by: Set(Some(actor.to_string())),
            ..Default::default()
        };
        let created = model.insert(db).await.map_err(ServiceError::DatabaseError)?;
        self.event_sender.send_or_log(Event::BankCreated(created.id));
        Ok(created)
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i32,
        input: UpdateBank,
        actor: &str,
    ) -> Result<bank::Model, ServiceError> {
        input.validate()?;
        let existing = self.get(id).await?;
        let db = &*self.db;
        let mut active: bank::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.account_number = Set(input.account_number);
        active.opening_balance = Set(input.opening_balance);
        active.details = Set(input.details);
        active.is_active = Set(input.is_active);
        active.updated_at = Set(Some(Utc::now()));
        active.updated_by = Set(Some(actor.to_string()));
        active.update(db).await.map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn deactivate(&self, id: i32) -> Result<(), ServiceError> {
        let existing = self.get(id).await?;
        let db = &*self.db;
        let mut active: bank::ActiveModel = existing.into();
        active.is_active = Set(false);
        active.update(db).await.map_err(ServiceError::DatabaseError)?;
        self.event_sender.send_or_log(Event::BankDeactivated(id));
        Ok(())
    }

    /// Derived balance: opening balance plus every voucher paying from or
    /// receiving into this bank up to `as_of` (inclusive)
    #[instrument(skip(self))]
    pub async fn balance(
        &self,
        id: i32,
        as_of: Option<NaiveDate>,
    ) -> Result<BankBalance, ServiceError> {
        let bank = self.get(id).await?;
        let db = &*self.db;

        let mut query = voucher::Entity::find().filter(
            Condition::any()
                .add(voucher::Column::PayingBankId.eq(id))
                .add(voucher::Column::ReceivingBankId.eq(id)),
        );
        if let Some(date) = as_of {
            query = query.filter(voucher::Column::VoucherDate.lte(date));
        }
        let vouchers = query.all(db).await.map_err(ServiceError::DatabaseError)?;

        let balance = bank.opening_balance + ledger::bank_movement(vouchers.iter(), id);
        Ok(BankBalance {
            bank_id: id,
            as_of,
            opening_balance: bank.opening_balance,
            balance,
        })
    }
}
