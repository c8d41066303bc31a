use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use tracing::{info, instrument};

use crate::db::DbPool;
use crate::entities::master_password::{self, MASTER_LOCK};
use crate::entities::page_lock::{self, LockMode};
use crate::errors::ServiceError;

/// Default password on freshly initialized page locks
const DEFAULT_PAGE_PASSWORD: &str = "1234";
/// Default master password until an admin changes it
const DEFAULT_MASTER_PASSWORD: &str = "112233";

/// Pages that can be locked, with their route prefixes
const DEFAULT_PAGES: &[(&str, &str)] = &[
    ("Customers", "/api/v1/customers"),
    ("Items", "/api/v1/items"),
    ("Banks", "/api/v1/banks"),
    ("Projects", "/api/v1/projects"),
    ("Expense Heads", "/api/v1/expense-heads"),
    ("All Vouchers", "/api/v1/vouchers"),
    ("Dashboard", "/api/v1/reports/dashboard"),
    ("Customer Ledger", "/api/v1/reports/customer-ledger"),
    ("Stock Report", "/api/v1/reports/stock"),
    ("Profit Loss", "/api/v1/reports/profit-loss"),
    ("Cash Flow", "/api/v1/reports/cash-flow"),
    ("Cash Statement", "/api/v1/reports/cash-statement"),
    ("Bank Statement", "/api/v1/reports/bank-statement"),
    ("Daily Cash Book", "/api/v1/reports/daily-cash-book"),
    ("Master Lock", "/api/v1/page-locks"),
];

/// Outcome of matching a request path against the locked pages
#[derive(Debug, Clone)]
pub struct MatchedLock {
    pub page_name: String,
    pub page_url: String,
    pub lock_mode: LockMode,
}

/// Service managing the page-lock soft gates and the master password
#[derive(Clone)]
pub struct PageLockService {
    db: Arc<DbPool>,
}

impl PageLockService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Seeds the default page-lock rows and the master password when absent
    #[instrument(skip(self))]
    pub async fn ensure_defaults(&self) -> Result<(), ServiceError> {
        let db = &*self.db;
        for (name, url) in DEFAULT_PAGES {
            let exists = page_lock::Entity::find()
                .filter(page_lock::Column::PageUrl.eq(*url))
                .one(db)
                .await
                .map_err(ServiceError::DatabaseError)?
                .is_some();
            if !exists {
                let model = page_lock::ActiveModel {
                    page_name: Set(name.to_string()),
                    page_url: Set(url.to_string()),
                    is_locked: Set(false),
                    password: Set(Some(DEFAULT_PAGE_PASSWORD.to_string())),
                    lock_mode: Set(LockMode::JustView),
                    updated_at: Set(Some(Utc::now())),
                    updated_by: Set(Some("system".to_string())),
                    ..Default::default()
                };
                model.insert(db).await.map_err(ServiceError::DatabaseError)?;
            }
        }

        let has_master = master_password::Entity::find()
            .filter(master_password::Column::PasswordType.eq(MASTER_LOCK))
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .is_some();
        if !has_master {
            let model = master_password::ActiveModel {
                password_type: Set(MASTER_LOCK.to_string()),
                password: Set(DEFAULT_MASTER_PASSWORD.to_string()),
                updated_at: Set(Some(Utc::now())),
                updated_by: Set(Some("system".to_string())),
                ..Default::default()
            };
            model.insert(db).await.map_err(ServiceError::DatabaseError)?;
            info!("Initialized default master password");
        }

        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<page_lock::Model>, ServiceError> {
        let db = &*self.db;
        page_lock::Entity::find()
            .order_by_asc(page_lock::Column::PageName)
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<page_lock::Model, ServiceError> {
        let db = &*self.db;
        page_lock::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Page lock with ID {} not found", id)))
    }

    /// Flips the lock on a page
    #[instrument(skip(self))]
    pub async fn toggle(&self, id: i32, actor: &str) -> Result<page_lock::Model, ServiceError> {
        let existing = self.get(id).await?;
        let next = !existing.is_locked;
        let db = &*self.db;
        let mut active: page_lock::ActiveModel = existing.into();
        active.is_locked = Set(next);
        active.updated_at = Set(Some(Utc::now()));
        active.updated_by = Set(Some(actor.to_string()));
        active.update(db).await.map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self, password))]
    pub async fn update_password(
        &self,
        id: i32,
        password: String,
        actor: &str,
    ) -> Result<(), ServiceError> {
        if password.is_empty() {
            return Err(ServiceError::ValidationError(
                "Password cannot be empty".into(),
            ));
        }
        let existing = self.get(id).await?;
        let db = &*self.db;
        let mut active: page_lock::ActiveModel = existing.into();
        active.password = Set(Some(password));
        active.updated_at = Set(Some(Utc::now()));
        active.updated_by = Set(Some(actor.to_string()));
        active.update(db).await.map_err(ServiceError::DatabaseError)?;
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn update_lock_mode(
        &self,
        id: i32,
        lock_mode: LockMode,
        actor: &str,
    ) -> Result<page_lock::Model, ServiceError> {
        let existing = self.get(id).await?;
        let db = &*self.db;
        let mut active: page_lock::ActiveModel = existing.into();
        active.lock_mode = Set(lock_mode);
        active.updated_at = Set(Some(Utc::now()));
        active.updated_by = Set(Some(actor.to_string()));
        active.update(db).await.map_err(ServiceError::DatabaseError)
    }

    /// Checks a page password; a page that is not locked always verifies
    #[instrument(skip(self, password))]
    pub async fn verify_page_password(
        &self,
        page_url: &str,
        password: &str,
    ) -> Result<bool, ServiceError> {
        let db = &*self.db;
        let lock = page_lock::Entity::find()
            .filter(page_lock::Column::PageUrl.eq(page_url))
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        match lock {
            Some(lock) if lock.is_locked => Ok(lock.password.as_deref() == Some(password)),
            _ => Ok(true),
        }
    }

    #[instrument(skip(self, password))]
    pub async fn verify_master_password(&self, password: &str) -> Result<bool, ServiceError> {
        let db = &*self.db;
        let master = master_password::Entity::find()
            .filter(master_password::Column::PasswordType.eq(MASTER_LOCK))
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::InvalidOperation("Master password not configured".into())
            })?;
        Ok(master.password == password)
    }

    #[instrument(skip(self, password))]
    pub async fn update_master_password(
        &self,
        password: String,
        actor: &str,
    ) -> Result<(), ServiceError> {
        if password.is_empty() {
            return Err(ServiceError::ValidationError(
                "Password cannot be empty".into(),
            ));
        }
        let db = &*self.db;
        let master = master_password::Entity::find()
            .filter(master_password::Column::PasswordType.eq(MASTER_LOCK))
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                ServiceError::InvalidOperation("Master password not configured".into())
            })?;
        let mut active: master_password::ActiveModel = master.into();
        active.password = Set(password);
        active.updated_at = Set(Some(Utc::now()));
        active.updated_by = Set(Some(actor.to_string()));
        active.update(db).await.map_err(ServiceError::DatabaseError)?;
        info!("Master password updated");
        Ok(())
    }

    /// Finds the locked page guarding a request path, if any
    #[instrument(skip(self))]
    pub async fn find_matching_lock(
        &self,
        path: &str,
    ) -> Result<Option<MatchedLock>, ServiceError> {
        let db = &*self.db;
        let locked = page_lock::Entity::find()
            .filter(page_lock::Column::IsLocked.eq(true))
            .all(db)
            .await
            .map_err(ServiceError::DatabaseError)?;

        Ok(locked.into_iter().find(|l| l.guards(path)).map(|l| MatchedLock {
            page_name: l.page_name,
            page_url: l.page_url,
            lock_mode: l.lock_mode,
        }))
    }
}
