use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::{customer, customer_item_rate, voucher};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::ledger;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewCustomer {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    #[validate(length(max = 250))]
    pub address: Option<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCustomer {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 30))]
    pub phone: Option<String>,
    #[validate(length(max = 250))]
    pub address: Option<String>,
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// Derived balance of a customer at a point in time
#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerBalance {
    pub customer_id: i32,
    pub as_of: Option<NaiveDate>,
    /// Dr-positive signed balance
    pub balance: Decimal,
    /// Rendered as the ledger prints it, e.g. `1250 Dr`
    pub label: String,
}

/// Service for managing customers and their negotiated item rates
#[derive(Clone)]
pub struct CustomerService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl CustomerService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    /// Lists customers ordered by name; inactive rows only when asked for
    #[instrument(skip(self))]
    pub async fn list(&self, include_inactive: bool) -> Result<Vec<customer::Model>, ServiceError> {
        let db = &*self.db;
        let mut query = customer::Entity::find().order_by_asc(customer::Column::Name);
        if !include_inactive {
            query = query.filter(customer::Column::IsActive.eq(true));
        }
        query.all(db).await.map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<customer::Model, ServiceError> {
        let db = &*self.db;
        customer::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Customer with ID {} not found", id)))
    }

    #[instrument(skip(self, input))]
    pub async fn create(
        &self,
        input: NewCustomer,
        actor: &str,
    ) -> Result<customer::Model, ServiceError> {
        input.validate()?;
        let db = &*self.db;
        let model = customer::ActiveModel {
            name: Set(input.name),
            phone: Set(input.phone),
            address: Set(input.address),
            is_active: Set(input.is_active),
            created_at: Set(Utc::now()),
            created_by: Set(Some(actor.to_string())),
            ..Default::default()
        };
        let created = model.insert(db).await.map_err(ServiceError::DatabaseError)?;
        self.event_sender.send_or_log(Event::CustomerCreated(created.id));
        info!(customer_id = created.id, "Customer created");
        Ok(created)
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i32,
        input: UpdateCustomer,
        _actor: &str,
    ) -> Result<customer::Model, ServiceError> {
        input.validate()?;
        let existing = self.get(id).await?;
        let db = &*self.db;
        let mut active: customer::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.phone = Set(input.phone);
        active.address = Set(input.address);
        active.is_active = Set(input.is_active);
        active.update(db).await.map_err(ServiceError::DatabaseError)
    }

    /// Soft delete: deactivated customers drop out of pickers but keep their
    /// voucher history intact
    #[instrument(skip(self))]
    pub async fn deactivate(&self, id: i32) -> Result<(), ServiceError> {
        let existing = self.get(id).await?;
        let db = &*self.db;
        let mut active: customer::ActiveModel = existing.into();
        active.is_active = Set(false);
        active.update(db).await.map_err(ServiceError::DatabaseError)?;
        self.event_sender.send_or_log(Event::CustomerDeactivated(id));
        Ok(())
    }

    /// Derived balance: fold of every voucher naming this customer up to
    /// `as_of` (inclusive), or the full history when no date is given
    #[instrument(skip(self))]
    pub async fn balance(
        &self,
        id: i32,
        as_of: Option<NaiveDate>,
    ) -> Result<CustomerBalance, ServiceError> {
        // 404 for unknown customers, not a zero balance
        self.get(id).await?;
        let db = &*self.db;

        let mut query = voucher::Entity::find().filter(
            Condition::any()
                .add(voucher::Column::PurchasingCustomerId.eq(id))
                .add(voucher::Column::ReceivingCustomerId.eq(id)),
        );
        if let Some(date) = as_of {
            query = query.filter(voucher::Column::VoucherDate.lte(date));
        }
        let vouchers = query.all(db).await.map_err(ServiceError::DatabaseError)?;

        let balance = ledger::customer_balance(vouchers.iter(), id);
        Ok(CustomerBalance {
            customer_id: id,
            as_of,
            balance,
            label: ledger::balance_label(balance),
        })
    }

    /// Negotiated per-item rates for a customer
    #[instrument(skip(self))]
    pub async fn rates(&self, id: i32) -> Result<Vec<customer_item_rate::Model>, ServiceError> {
        self.get(id).await?;
        let db = &*self.db;
        customer_item_rate::Entity::find()
            .filter(customer_item_rate::Column::CustomerId.eq(id))
            .order_by_asc(customer_item_rate::Column::ItemId)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    /// Creates or replaces the negotiated rate for (customer, item)
    #[instrument(skip(self))]
    pub async fn upsert_rate(
        &self,
        customer_id: i32,
        item_id: i32,
        rate: Decimal,
    ) -> Result<customer_item_rate::Model, ServiceError> {
        if rate < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Rate cannot be negative".into(),
            ));
        }
        let db = &*self.db;
        let existing = customer_item_rate::Entity::find()
            .filter(customer_item_rate::Column::CustomerId.eq(customer_id))
            .filter(customer_item_rate::Column::ItemId.eq(item_id))
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        match existing {
            Some(model) => {
                let mut active: customer_item_rate::ActiveModel = model.into();
                active.rate = Set(rate);
                active.update(db).await.map_err(ServiceError::DatabaseError)
            }
            None => {
                let model = customer_item_rate::ActiveModel {
                    customer_id: Set(customer_id),
                    item_id: Set(item_id),
                    rate: Set(rate),
                    ..Default::default()
                };
                model.insert(db).await.map_err(ServiceError::DatabaseError)
            }
        }
    }

    /// Negotiated rates are the one hard-deleted satellite of a customer
    #[instrument(skip(self))]
    pub async fn delete_rate(&self, customer_id: i32, item_id: i32) -> Result<(), ServiceError> {
        let db = &*self.db;
        let existing = customer_item_rate::Entity::find()
            .filter(customer_item_rate::Column::CustomerId.eq(customer_id))
            .filter(customer_item_rate::Column::ItemId.eq(item_id))
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!(
                    "No rate for customer {} and item {}",
                    customer_id, item_id
                ))
            })?;
        customer_item_rate::Entity::delete_by_id(existing.id)
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        Ok(())
    }
}
