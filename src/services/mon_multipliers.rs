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
use crate::entities::mon_multiplier;
use crate::errors::ServiceError;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MonMultiplierInput {
    #[validate(length(min = 1, max = 20))]
    pub voucher_type: String,
    pub multiplier: Decimal,
    #[validate(length(max = 200))]
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

/// Service managing mon (maund) conversion multipliers
#[derive(Clone)]
pub struct MonMultiplierService {
    db: Arc<DbPool>,
}

impl MonMultiplierService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<mon_multiplier::Model>, ServiceError> {
        let db = &*self.db;
        mon_multiplier::Entity::find()
            .order_by_asc(mon_multiplier::Column::VoucherType)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<mon_multiplier::Model, ServiceError> {
        let db = &*self.db;
        mon_multiplier::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("Mon multiplier with ID {} not found", id))
            })
    }

    /// Active multiplier for a voucher type, if one is configured
    #[instrument(skip(self))]
    pub async fn for_voucher_type(
        &self,
        voucher_type: &str,
    ) -> Result<Option<mon_multiplier::Model>, ServiceError> {
        let db = &*self.db;
        mon_multiplier::Entity::find()
            .filter(mon_multiplier::Column::VoucherType.eq(voucher_type))
            .filter(mon_multiplier::Column::IsActive.eq(true))
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self, input))]
    pub async fn create(
        &self,
        input: MonMultiplierInput,
        actor: &str,
    ) -> Result<mon_multiplier::Model, ServiceError> {
        input.validate()?;
        if input.multiplier <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Multiplier must be greater than 0".into(),
            ));
        }
        let db = &*self.db;
        let model = mon_multiplier::ActiveModel {
            voucher_type: Set(input.voucher_type),
            multiplier: Set(input.multiplier),
            description: Set(input.description),
            is_active: Set(input.is_active),
            updated_at: Set(Utc::now()),
            updated_by: Set(Some(actor.to_string())),
            ..Default::default()
        };
        model.insert(db).await.map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i32,
        input: MonMultiplierInput,
        actor: &str,
    ) -> Result<mon_multiplier::Model, ServiceError> {
        input.validate()?;
        if input.multiplier <= Decimal::ZERO {
            return Err(ServiceError::ValidationError(
                "Multiplier must be greater than 0".into(),
            ));
        }
        let existing = self.get(id).await?;
        let db = &*self.db;
        let mut active: mon_multiplier::ActiveModel = existing.into();
        active.voucher_type = Set(input.voucher_type);
        active.multiplier = Set(input.multiplier);
        active.description = Set(input.description);
        active.is_active = Set(input.is_active);
        active.updated_at = Set(Utc::now());
        active.updated_by = Set(Some(actor.to_string()));
        active.update(db).await.map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<(), ServiceError> {
        let existing = self.get(id).await?;
        let db = &*self.db;
        mon_multiplier::Entity::delete_by_id(existing.id)
            .exec(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        Ok(())
    }
}
