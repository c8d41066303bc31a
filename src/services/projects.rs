use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use serde::Deserialize;
use tracing::instrument;
use utoipa::ToSchema;
use validator::Validate;

use crate::db::DbPool;
use crate::entities::project;
use crate::errors::ServiceError;
use crate::events::{Event, EventSender};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct NewProject {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateProject {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub is_active: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Clone)]
pub struct ProjectService {
    db: Arc<DbPool>,
    event_sender: EventSender,
}

impl ProjectService {
    pub fn new(db: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self { db, event_sender }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, include_inactive: bool) -> Result<Vec<project::Model>, ServiceError> {
        let db = &*self.db;
        let mut query = project::Entity::find().order_by_asc(project::Column::Name);
        if !include_inactive {
            query = query.filter(project::Column::IsActive.eq(true));
        }
        query.all(db).await.map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<project::Model, ServiceError> {
        let db = &*self.db;
        project::Entity::find_by_id(id)
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| ServiceError::NotFound(format!("Project with ID {} not found", id)))
    }

    #[instrument(skip(self, input))]
    pub async fn create(&self, input: NewProject) -> Result<project::Model, ServiceError> {
        input.validate()?;
        if let Some(end) = input.end_date {
            if end < input.start_date {
                return Err(ServiceError::ValidationError(
                    "End date cannot be before start date".into(),
                ));
            }
        }
        let db = &*self.db;
        let model = project::ActiveModel {
            name: Set(input.name),
            description: Set(input.description),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            is_active: Set(input.is_active),
            created_at: Set(Utc::now()),
            ..Default::default()
        };
        let created = model.insert(db).await.map_err(ServiceError::DatabaseError)?;
        self.event_sender.send_or_log(Event::ProjectCreated(created.id));
        Ok(created)
    }

    #[instrument(skip(self, input))]
    pub async fn update(
        &self,
        id: i32,
        input: UpdateProject,
    ) -> Result<project::Model, ServiceError> {
        input.validate()?;
        if let Some(end) = input.end_date {
            if end < input.start_date {
                return Err(ServiceError::ValidationError(
                    "End date cannot be before start date".into(),
                ));
            }
        }
        let existing = self.get(id).await?;
        let db = &*self.db;
        let mut active: project::ActiveModel = existing.into();
        active.name = Set(input.name);
        active.description = Set(input.description);
        active.start_date = Set(input.start_date);
        active.end_date = Set(input.end_date);
        active.is_active = Set(input.is_active);
        active.update(db).await.map_err(ServiceError::DatabaseError)
    }

    #[instrument(skip(self))]
    pub async fn deactivate(&self, id: i32) -> Result<(), ServiceError> {
        let existing = self.get(id).await?;
        let db = &*self.db;
        let mut active: project::ActiveModel = existing.into();
        active.is_active = Set(false);
        active.update(db).await.map_err(ServiceError::DatabaseError)?;
        self.event_sender.send_or_log(Event::ProjectDeactivated(id));
        Ok(())
    }
}
