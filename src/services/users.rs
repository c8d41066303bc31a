use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use tracing::{info, instrument};
use utoipa::ToSchema;
use validator::Validate;

use crate::auth::{hash_password, verify_password};
use crate::db::DbPool;
use crate::entities::user::{self, UserRole};
use crate::errors::ServiceError;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewUser {
    #[validate(length(min = 3, max = 100))]
    pub username: String,
    #[validate(length(min = 6, max = 100))]
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    pub full_name: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    pub role: UserRole,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(length(min = 1, max = 100))]
    pub full_name: String,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    pub role: UserRole,
    pub is_active: bool,
}

/// Service for user administration and credential changes
#[derive(Clone)]
pub struct UserService {
    db: Arc<DbPool>,
}

impl UserService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<user::Model>, ServiceError> {
        let db = &*self.db;
        user::Entity::find()
            .order_by_asc(user::Column::Username)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<user::Model, ServiceError> {
        let db = &*self.db;
        user::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("User with ID {} not found", id)))
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: NewUser, actor: &str) -> Result<user::Model, ServiceError> {
        input.validate()?;
        let db = &*self.db;

        let taken = user::Entity::find()
            .filter(user::Column::Username.eq(input.username.clone()))
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .is_some();
        if taken {
            return Err(ServiceError::Conflict(format!(
                "Username '{}' is already taken",
                input.username
            )));
        }

        let model = user::ActiveModel {
            username: Set(input.username),
            password_hash: Set(hash_password(&input.password)?),
            full_name: Set(input.full_name),
            email: Set(input.email),
            phone: Set(input.phone),
            role: Set(input.role),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            created_by: Set(Some(actor.to_string())),
            ..Default::default()
        };
        let created = model.insert(db).await.map_err(ServiceError::DatabaseError)?;
        info!(user_id = created.id, "User created");
        Ok(created)
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i32, input: UpdateUser) -> Result<user::Model, ServiceError> {
        input.validate()?;
        let existing = self.get(id).await?;
        let db = &*self.db;
        let mut active: user::ActiveModel = existing.into();
        active.full_name = Set(input.full_name);
        active.email = Set(input.email);
        active.phone = Set(input.phone);
        active.role = Set(input.role);
        active.is_active = Set(input.is_active);
        active.update(db).await.map_err(ServiceError::DatabaseError)
    }

    /// Flips the active flag; deactivated users cannot log in but keep their
    /// audit trail
    #[instrument(skip(self))]
    pub async fn toggle_status(&self, id: i32) -> Result<user::Model, ServiceError> {
        let existing = self.get(id).await?;
        let next = !existing.is_active;
        let db = &*self.db;
        let mut active: user::ActiveModel = existing.into();
        active.is_active = Set(next);
        active.update(db).await.map_err(ServiceError::DatabaseError)
    }

    /// Admin-side password reset, no knowledge of the old password required
    #[instrument(skip(self, new_password))]
    pub async fn reset_password(&self, id: i32, new_password: &str) -> Result<(), ServiceError> {
        if new_password.len() < 6 {
            return Err(ServiceError::ValidationError(
                "Password must be at least 6 characters".into(),
            ));
        }
        let existing = self.get(id).await?;
        let db = &*self.db;
        let mut active: user::ActiveModel = existing.into();
        active.password_hash = Set(hash_password(new_password)?);
        active.update(db).await.map_err(ServiceError::DatabaseError)?;
        info!(user_id = id, "Password reset");
        Ok(())
    }

    /// Self-service password change, verifying the current password first
    #[instrument(skip(self, current_password, new_password))]
    pub async fn change_password(
        &self,
        id: i32,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ServiceError> {
        let existing = self.get(id).await?;
        if !verify_password(current_password, &existing.password_hash)? {
            return Err(ServiceError::AuthError(
                "Current password is incorrect".into(),
            ));
        }
        self.reset_password(id, new_password).await
    }

    /// Bootstraps the default admin account on an empty users table so a
    /// fresh installation can log in
    #[instrument(skip(self, password))]
    pub async fn ensure_admin(&self, password: &str) -> Result<(), ServiceError> {
        let db = &*self.db;
        let count = user::Entity::find()
            .count(db)
            .await
            .map_err(ServiceError::DatabaseError)?;
        if count > 0 {
            return Ok(());
        }

        let model = user::ActiveModel {
            username: Set("admin".to_string()),
            password_hash: Set(hash_password(password)?),
            full_name: Set("Administrator".to_string()),
            email: Set(None),
            phone: Set(None),
            role: Set(UserRole::Admin),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            created_by: Set(Some("system".to_string())),
            ..Default::default()
        };
        let created = model.insert(db).await.map_err(ServiceError::DatabaseError)?;
        info!(user_id = created.id, "Bootstrapped default admin user");
        Ok(())
    }
}
