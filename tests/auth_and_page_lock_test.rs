mod common;

use assert_matches::assert_matches;
use common::TestHarness;

use munshi_api::entities::page_lock::LockMode;
use munshi_api::entities::user::UserRole;
use munshi_api::errors::ServiceError;
use munshi_api::services::users::NewUser;

async fn seed_user(app: &TestHarness, username: &str, password: &str, role: UserRole) -> i32 {
    app.services
        .users
        .create(
            NewUser {
                username: username.to_string(),
                password: password.to_string(),
                full_name: "Test User".to_string(),
                email: None,
                phone: None,
                role,
            },
            "system",
        )
        .await
        .expect("user created")
        .id
}

#[tokio::test]
async fn login_opens_a_session_and_logout_closes_it() {
    let app = TestHarness::new().await;
    let user_id = seed_user(&app, "munim", "khata123", UserRole::User).await;

    let (token, user) = app
        .services
        .auth
        .login("munim", "khata123")
        .await
        .expect("login succeeds");
    assert_eq!(user.id, user_id);
    assert!(user.last_login_at.is_some());
    assert!(app.sessions.touch(&token).is_some());

    app.services.auth.logout(&token);
    assert!(app.sessions.touch(&token).is_none());
}

#[tokio::test]
async fn wrong_password_and_inactive_users_are_rejected() {
    let app = TestHarness::new().await;
    let user_id = seed_user(&app, "munim", "khata123", UserRole::User).await;

    let err = app
        .services
        .auth
        .login("munim", "wrong")
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::AuthError(_));

    app.services.users.toggle_status(user_id).await.unwrap();
    let err = app
        .services
        .auth
        .login("munim", "khata123")
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::AuthError(_));
}

#[tokio::test]
async fn duplicate_usernames_conflict() {
    let app = TestHarness::new().await;
    seed_user(&app, "munim", "khata123", UserRole::User).await;

    let err = app
        .services
        .users
        .create(
            NewUser {
                username: "munim".to_string(),
                password: "another123".to_string(),
                full_name: "Someone Else".to_string(),
                email: None,
                phone: None,
                role: UserRole::User,
            },
            "system",
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::Conflict(_));
}

#[tokio::test]
async fn change_password_requires_the_current_one() {
    let app = TestHarness::new().await;
    let user_id = seed_user(&app, "munim", "khata123", UserRole::User).await;

    let err = app
        .services
        .users
        .change_password(user_id, "nope", "fresh-password")
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::AuthError(_));

    app.services
        .users
        .change_password(user_id, "khata123", "fresh-password")
        .await
        .unwrap();
    app.services
        .auth
        .login("munim", "fresh-password")
        .await
        .expect("new password works");
}

#[tokio::test]
async fn ensure_admin_bootstraps_exactly_once() {
    let app = TestHarness::new().await;
    app.services.users.ensure_admin("secret-admin").await.unwrap();
    app.services.users.ensure_admin("secret-admin").await.unwrap();

    let users = app.services.users.list().await.unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].username, "admin");
    assert_eq!(users[0].role, UserRole::Admin);

    app.services
        .auth
        .login("admin", "secret-admin")
        .await
        .expect("bootstrapped admin can log in");
}

#[tokio::test]
async fn page_lock_defaults_are_seeded_and_master_password_verifies() {
    let app = TestHarness::new().await;
    app.services.page_locks.ensure_defaults().await.unwrap();

    let locks = app.services.page_locks.list().await.unwrap();
    assert!(!locks.is_empty());
    assert!(locks.iter().all(|l| !l.is_locked));
    assert!(locks.iter().any(|l| l.page_url == "/api/v1/vouchers"));

    assert!(app
        .services
        .page_locks
        .verify_master_password("112233")
        .await
        .unwrap());
    assert!(!app
        .services
        .page_locks
        .verify_master_password("000000")
        .await
        .unwrap());

    // Seeding again must not duplicate rows
    app.services.page_locks.ensure_defaults().await.unwrap();
    assert_eq!(app.services.page_locks.list().await.unwrap().len(), locks.len());
}

#[tokio::test]
async fn locked_pages_match_their_route_prefix() {
    let app = TestHarness::new().await;
    app.services.page_locks.ensure_defaults().await.unwrap();

    let locks = app.services.page_locks.list().await.unwrap();
    let vouchers_lock = locks
        .iter()
        .find(|l| l.page_url == "/api/v1/vouchers")
        .unwrap();

    // Unlocked pages never match
    assert!(app
        .services
        .page_locks
        .find_matching_lock("/api/v1/vouchers/42")
        .await
        .unwrap()
        .is_none());

    app.services
        .page_locks
        .toggle(vouchers_lock.id, "admin")
        .await
        .unwrap();

    let matched = app
        .services
        .page_locks
        .find_matching_lock("/api/v1/vouchers/42")
        .await
        .unwrap()
        .expect("locked page matches nested path");
    assert_eq!(matched.page_url, "/api/v1/vouchers");

    assert!(app
        .services
        .page_locks
        .find_matching_lock("/api/v1/customers")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn page_password_verification_follows_the_lock_state() {
    let app = TestHarness::new().await;
    app.services.page_locks.ensure_defaults().await.unwrap();
    let locks = app.services.page_locks.list().await.unwrap();
    let lock = locks
        .iter()
        .find(|l| l.page_url == "/api/v1/reports/stock")
        .unwrap();

    // Not locked: any password passes
    assert!(app
        .services
        .page_locks
        .verify_page_password("/api/v1/reports/stock", "whatever")
        .await
        .unwrap());

    app.services.page_locks.toggle(lock.id, "admin").await.unwrap();
    assert!(app
        .services
        .page_locks
        .verify_page_password("/api/v1/reports/stock", "1234")
        .await
        .unwrap());
    assert!(!app
        .services
        .page_locks
        .verify_page_password("/api/v1/reports/stock", "4321")
        .await
        .unwrap());

    app.services
        .page_locks
        .update_password(lock.id, "9876".to_string(), "admin")
        .await
        .unwrap();
    assert!(app
        .services
        .page_locks
        .verify_page_password("/api/v1/reports/stock", "9876")
        .await
        .unwrap());
}

#[tokio::test]
async fn lock_mode_changes_are_persisted() {
    let app = TestHarness::new().await;
    app.services.page_locks.ensure_defaults().await.unwrap();
    let lock = app.services.page_locks.list().await.unwrap()[0].clone();
    assert_eq!(lock.lock_mode, LockMode::JustView);

    let updated = app
        .services
        .page_locks
        .update_lock_mode(lock.id, LockMode::Login, "admin")
        .await
        .unwrap();
    assert_eq!(updated.lock_mode, LockMode::Login);
}
