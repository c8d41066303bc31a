use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use tracing::instrument;
use utoipa::ToSchema;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::expense_head;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewExpenseHead {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    pub default_rate: Decimal,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateExpenseHead {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub default_rate: Decimal,
    #[validate(length(max = 500))]
    pub notes: Option<String>,
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Clone)]
pub struct ExpenseHeadService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl ExpenseHeadService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self))]
    pub async fn list(
        &self,
        include_inactive: bool,
    ) -> Result<Vec<expense_head::Model>, ServiceError> {
        let db = &*self.db;
        let mut query = expense_head::Entity::find().order_by_asc(expense_head::Column::Name);
        if !include_inactive {
            query = query.filter(expense_head::Column::IsActive.eq(true));
        }
        query.all(db).await.map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<expense_head::Model, ServiceError> {
        let db = &*self.db;
        expense_head::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Expense head with ID {} not found", id))
            })
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: NewExpenseHead) -> Result<expense_head::Model, ServiceError> {
        input.validate()?;
        if input.default_rate < Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Rate cannot be negative".into(),
            ));
        }
        let db = &*self.db;
        let model = expense_head::ActiveModel {
            name: Set(input.name),
            default_rate: Set(input.default_rate),
            notes: Set(input.notes),
            is_active: Set(input.is_active),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        let created = model.insert(db).await.map_err(ServiceError::DatabaseError)?;
        self.event_sender
            .send_or_log(Event::ExpenseHeadCreated(created.id));
        Ok(created)
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i32,
        input: UpdateExpenseHead,
    ) -> Result<expense_head::Model, ServiceError> {
        input.validate()?;
        let existing = self.get(id).await?;
        let db = &*self.db;
        let mut active: expense_head::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.default_rate = Set(input.default_rate);
        active.notes = Set(input.notes);
        active.is_active = Set(input.is_active);
        active.update(db).await.map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn deactivate(&self, id: i32) -> Result<(), ServiceError> {
        let existing = self.get(id).await?;
        let db = &*self.db;
        let mut active: expense_head::ActiveModel = existing.into();
        active.is_active = Set(false);
        active.update(db).await.map_err(ServiceError::DatabaseError)?;
        self.event_sender.send_or_log(Event::ExpenseHeadDeactivated(id));
        Ok(())
    }
}
