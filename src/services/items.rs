use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use utoipa::ToSchema;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::{customer_item_rate, item, voucher};
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};
use crate::ledger;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewItem {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 50))]
    pub unit: Option<String>,
    #[serde(default = "default_true")]
    pub stock_tracking_enabled: bool,
    #[serde(default)]
    pub opening_stock: Decimal,
    #[serde(default)]
    pub default_rate: Decimal,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateItem {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 50))]
    pub unit: Option<String>,
    pub stock_tracking_enabled: bool,
    pub opening_stock: Decimal,
    pub default_rate: Decimal,
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Derived stock level of an item
#[derive(Debug, Serialize, ToSchema)]
pub struct ItemStock {
    pub item_id: i32,
    pub stock_tracking_enabled: bool,
    pub opening_stock: Decimal,
    /// Opening stock plus the fold of stock-affecting vouchers
    pub current_stock: Decimal,
}

/// Rate resolved for a (customer, item) pair
#[derive(Debug, Serialize, ToSchema)]
pub struct ResolvedRate {
    pub item_id: i32,
    pub customer_id: Option<i32>,
    pub rate: Decimal,
    /// True when a negotiated customer rate was found
    pub negotiated: bool,
}

/// Service for managing items and stock derivation
#[derive(Clone)]
pub struct ItemService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl ItemService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, include_inactive: bool) -> Result<Vec<item::Model>, ServiceError> {
        let db = &*self.db;
        let mut query = item::Entity::find().order_by_asc(item::Column::Name);
        if !include_inactive {
            query = query.filter(item::Column::IsActive.eq(true));
        }
        query.all(db).await.map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<item::Model, ServiceError> {
        let db = &*self.db;
        item::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Item with ID {} not found", id)))
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: NewItem, actor: &str) -> Result<item::Model, ServiceError> {
        input.validate()?;
        if input.opening_stock < Decimal::ZERO || input.default_rate < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Stock and rate cannot be negative".into(),
            ));
        }
        let db = &*self.db;
        let model = item::ActiveModel {
            name: Set(input.name),
            unit: Set(input.unit),
            stock_tracking_enabled: Set(input.stock_tracking_enabled),
            opening_stock: Set(input.opening_stock),
            default_rate: Set(input.default_rate),
            is_active: Set(input.is_active),
            created_at: Set(Utc::now()),
            created_by: Set(Some(actor.to_string())),
            ..Default::default()
        };
        let created = model.insert(db).await.map_err(ServiceError::DatabaseError)?;
        self.event_sender.send_or_log(Event::ItemCreated(created.id));
        Ok(created)
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i32,
        input: UpdateItem,
        actor: &str,
    ) -> Result<item::Model, ServiceError> {
        input.validate()?;
        if input.opening_stock < Decimal::ZERO || input.default_rate < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Stock and rate cannot be negative".into(),
            ));
        }
        let existing = self.get(id).await?;
        let db = &*self.db;
        let mut active: item::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.unit = Set(input.unit);
        active.stock_tracking_enabled = Set(input.stock_tracking_enabled);
        active.opening_stock = Set(input.opening_stock);
        active.default_rate = Set(input.default_rate);
        active.is_active = Set(input.is_active);
        active.updated_at = Set(Some(Utc::now()));
        active.updated_by = Set(Some(actor.to_string()));
        active.update(db).await.map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn deactivate(&self, id: i32) -> Result<(), ServiceError> {
        let existing = self.get(id).await?;
        let db = &*self.db;
        let mut active: item::ActiveModel = existing.into();
        active.is_active = Set(false);
        active.update(db).await.map_err(ServiceError::DatabaseError)?;
        self.event_sender.send_or_log(Event::ItemDeactivated(id));
        Ok(())
    }

    /// Current stock derived by replaying the item's voucher history
    #[instrument(skip(self))]
    pub async fn stock(&self, id: i32) -> Result<ItemStock, ServiceError> {
        let item = self.get(id).await?;
        let db = &*self.db;
        let vouchers = voucher::Entity::find()
            .filter(voucher::Column::ItemId.eq(id))
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        let current_stock = if item.stock_tracking_enabled {
            ledger::stock_level(item.opening_stock, vouchers.iter(), id)
        } else {
            item.opening_stock
        };
        Ok(ItemStock {
            item_id: id,
            stock_tracking_enabled: item.stock_tracking_enabled,
            opening_stock: item.opening_stock,
            current_stock,
        })
    }

    /// Rate for an item, preferring the customer's negotiated rate over the
    /// item default
    #[instrument(skip(self))]
    pub async fn rate_for_customer(
        &self,
        item_id: i32,
        customer_id: Option<i32>,
    ) -> Result<ResolvedRate, ServiceError> {
        let item = self.get(item_id).await?;
        let db = &*self.db;

        if let Some(customer_id) = customer_id {
            let negotiated = customer_item_rate::Entity::find()
                .filter(customer_item_rate::Column::CustomerId.eq(customer_id))
                .filter(customer_item_rate::Column::ItemId.eq(item_id))
                .one(db)
                .await
                .map_err(ServiceError::DatabaseError)?;
            if let Some(rate) = negotiated {
                return Ok(ResolvedRate {
                    item_id,
                    customer_id: Some(customer_id),
                    rate: rate.rate,
                    negotiated: true,
                });
            }
        }

        Ok(ResolvedRate {
            item_id,
            customer_id,
            rate: item.default_rate,
            negotiated: false,
        })
    }
}
