use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// How an unlocked page behaves for the rest of the session
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum LockMode {
    /// Unlock is consumed by the next matching request
    #[sea_orm(string_value = "JustView")]
    JustView,
    /// Unlock persists until the session ends
    #[sea_orm(string_value = "Login")]
    Login,
}

/// Admin-configurable, password-gated soft restriction on an application
/// page. Unrelated to authentication.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "page_locks")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub page_name: String,
    #[sea_orm(unique)]
    pub page_url: String,
    pub is_locked: bool,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub lock_mode: LockMode,
    pub updated_at: Option<DateTime<Utc>>,
    pub updated_by: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// A lock guards its exact URL and everything nested below it
    pub fn guards(&self, path: &str) -> bool {
        let prefix = self.page_url.trim_end_matches('/');
        let path = path.trim_end_matches('/');
        path.eq_ignore_ascii_case(prefix)
            || (path.len() > prefix.len()
                && path[..prefix.len()].eq_ignore_ascii_case(prefix)
                && path.as_bytes()[prefix.len()] == b'/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn lock(url: &str) -> Model {
        Model {
            id: 1,
            page_name: "Vouchers".into(),
            page_url: url.into(),
            is_locked: true,
            password: Some("1234".into()),
            lock_mode: LockMode::JustView,
            updated_at: Some(Utc::now()),
            updated_by: None,
        }
    }

    #[test]
    fn guards_exact_and_nested_paths() {
        let l = lock("/api/v1/vouchers");
        assert!(l.guards("/api/v1/vouchers"));
        assert!(l.guards("/api/v1/vouchers/"));
        assert!(l.guards("/api/v1/vouchers/42"));
        assert!(l.guards("/API/V1/Vouchers/42"));
    }

    #[test]
    fn does_not_guard_sibling_prefixes() {
        let l = lock("/api/v1/vouchers");
        assert!(!l.guards("/api/v1/voucher-types"));
        assert!(!l.guards("/api/v1"));
    }
}
