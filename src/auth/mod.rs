//! Session-token authentication.
//!
//! Login verifies an argon2 hash and mints an opaque bearer token backed by
//! a server-side session holding the user identity, the page-unlock flags,
//! and a last-seen timestamp. Sessions expire after the configured idle
//! timeout; every authenticated request refreshes the timestamp.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use base64::Engine;
use chrono::Utc;
use dashmap::DashMap;
use rand::RngCore;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use tracing::{info, instrument, warn};

use crate::db::DbPool;
use crate::entities::user::{self, UserRole};
use crate::errors::ServiceError;

/// Server-side state behind one bearer token
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: i32,
    pub username: String,
    pub full_name: String,
    pub role: UserRole,
    created: Instant,
    last_seen: Instant,
    unlocked_pages: HashSet<String>,
}

impl Session {
    fn new(user: &user::Model) -> Self {
        let now = Instant::now();
        Self {
            user_id: user.id,
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
            created: now,
            last_seen: now,
            unlocked_pages: HashSet::new(),
        }
    }

    pub fn age(&self) -> Duration {
        self.created.elapsed()
    }
}

/// In-memory session store with idle expiry
#[derive(Debug)]
pub struct SessionStore {
    sessions: DashMap<String, Session>,
    idle_timeout: Duration,
}

impl SessionStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            idle_timeout,
        }
    }

    fn mint_token() -> String {
        let mut bytes = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Creates a session for the user and returns its token
    pub fn create(&self, user: &user::Model) -> String {
        let token = Self::mint_token();
        self.sessions.insert(token.clone(), Session::new(user));
        token
    }

    /// Looks up a live session, refreshing its idle timer. Expired sessions
    /// are removed on access.
    pub fn touch(&self, token: &str) -> Option<Session> {
        let expired = match self.sessions.get_mut(token) {
            Some(mut entry) => {
                if entry.last_seen.elapsed() > self.idle_timeout {
                    true
                } else {
                    entry.last_seen = Instant::now();
                    return Some(entry.clone());
                }
            }
            None => return None,
        };
        if expired {
            self.sessions.remove(token);
        }
        None
    }

    pub fn remove(&self, token: &str) {
        self.sessions.remove(token);
    }

    /// Marks a page as unlocked for this session
    pub fn unlock_page(&self, token: &str, page_url: &str) {
        if let Some(mut entry) = self.sessions.get_mut(token) {
            entry.unlocked_pages.insert(page_url.to_string());
        }
    }

    /// Checks whether the session holds an unlock for the page; when
    /// `consume` is set (JustView locks) the unlock is spent by the check.
    pub fn check_unlock(&self, token: &str, page_url: &str, consume: bool) -> bool {
        match self.sessions.get_mut(token) {
            Some(mut entry) => {
                if consume {
                    entry.unlocked_pages.remove(page_url)
                } else {
                    entry.unlocked_pages.contains(page_url)
                }
            }
            None => false,
        }
    }

    /// Drops sessions past their idle timeout
    pub fn purge_expired(&self) {
        let timeout = self.idle_timeout;
        self.sessions
            .retain(|_, session| session.last_seen.elapsed() <= timeout);
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// Hashes a password for storage
pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::HashError(e.to_string()))
}

/// Verifies a password against a stored hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ServiceError> {
    let parsed = PasswordHash::new(hash).map_err(|e| ServiceError::HashError(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Authentication service: credential verification plus session lifecycle
#[derive(Clone)]
pub struct AuthService {
    db: Arc<DbPool>,
    sessions: Arc<SessionStore>,
}

impl AuthService {
    pub fn new(db: Arc<DbPool>, sessions: Arc<SessionStore>) -> Self {
        Self { db, sessions }
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Verifies credentials, stamps the login time, and opens a session
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        username: &str,
        password: &str,
    ) -> Result<(String, user::Model), ServiceError> {
        let db = &*self.db;
        let user = user::Entity::find()
            .filter(user::Column::Username.eq(username))
            .filter(user::Column::IsActive.eq(true))
            .one(db)
            .await
            .map_err(ServiceError::DatabaseError)?
            .ok_or_else(|| {
                warn!(username, "Login attempt for unknown or inactive user");
                ServiceError::AuthError("Invalid username or password".into())
            })?;

        if !verify_password(password, &user.password_hash)? {
            warn!(username, "Login attempt with wrong password");
            return Err(ServiceError::AuthError(
                "Invalid username or password".into(),
            ));
        }

        let mut active: user::ActiveModel = user.clone().into();
        active.last_login_at = Set(Some(Utc::now()));
        let user = active.update(db).await.map_err(ServiceError::DatabaseError)?;

        let token = self.sessions.create(&user);
        info!(user_id = user.id, "User logged in");
        Ok((token, user))
    }

    pub fn logout(&self, token: &str) {
        self.sessions.remove(token);
    }
}

/// Extractor for the authenticated caller. Reads the bearer token, resolves
/// the live session, and refreshes its idle timer.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: i32,
    pub username: String,
    pub full_name: String,
    pub role: UserRole,
    pub token: String,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    /// Admin gate used by the user-admin, theme, and multiplier surfaces
    pub fn require_admin(&self) -> Result<(), ServiceError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ServiceError::Forbidden(
                "Only administrators can perform this action".into(),
            ))
        }
    }
}

pub fn bearer_token(headers: &axum::http::HeaderMap) -> Option<String> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::to_string)
        .or_else(|| {
            headers
                .get("x-session-token")
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        })
}

#[async_trait::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let sessions = parts
            .extensions
            .get::<Arc<SessionStore>>()
            .cloned()
            .ok_or(ServiceError::InternalServerError)?;

        let token = bearer_token(&parts.headers)
            .ok_or_else(|| ServiceError::Unauthorized("Missing session token".into()))?;

        let session = sessions
            .touch(&token)
            .ok_or_else(|| ServiceError::Unauthorized("Session expired or invalid".into()))?;

        Ok(AuthenticatedUser {
            user_id: session.user_id,
            username: session.username,
            full_name: session.full_name,
            role: session.role,
            token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn test_user() -> user::Model {
        user::Model {
            id: 1,
            username: "admin".into(),
            password_hash: "unused".into(),
            full_name: "Administrator".into(),
            email: None,
            phone: None,
            role: UserRole::Admin,
            is_active: true,
            created_at: Utc::now(),
            created_by: None,
            last_login_at: None,
        }
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &hash).unwrap());
        assert!(!verify_password("hunter3", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn sessions_expire_after_idle_timeout() {
        let store = SessionStore::new(Duration::from_millis(0));
        let token = store.create(&test_user());
        // Idle timeout of zero: the session is already expired on first touch
        assert!(store.touch(&token).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn touch_refreshes_and_returns_the_session() {
        let store = SessionStore::new(Duration::from_secs(60));
        let token = store.create(&test_user());
        let session = store.touch(&token).expect("session should be live");
        assert_eq!(session.username, "admin");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn just_view_unlocks_are_consumed() {
        let store = SessionStore::new(Duration::from_secs(60));
        let token = store.create(&test_user());
        store.unlock_page(&token, "/api/v1/vouchers");

        assert!(store.check_unlock(&token, "/api/v1/vouchers", true));
        // Spent by the previous check
        assert!(!store.check_unlock(&token, "/api/v1/vouchers", true));
    }

    #[test]
    fn login_mode_unlocks_persist() {
        let store = SessionStore::new(Duration::from_secs(60));
        let token = store.create(&test_user());
        store.unlock_page(&token, "/api/v1/reports");

        assert!(store.check_unlock(&token, "/api/v1/reports", false));
        assert!(store.check_unlock(&token, "/api/v1/reports", false));
    }

    #[test]
    fn unknown_tokens_hold_no_unlocks() {
        let store = SessionStore::new(Duration::from_secs(60));
        assert!(!store.check_unlock("nope", "/api/v1/reports", false));
    }
}
