use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use http::HeaderValue;
use tokio::{signal, sync::mpsc};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
};
use tracing::{error, info};

use munshi_api as api;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cfg = api::config::load_config()?;
    api::config::init_tracing(cfg.log_level(), cfg.log_json);

    // Init DB
    let db_pool = api::db::establish_connection_from_app_config(&cfg).await?;
    if cfg.auto_migrate {
        api::db::run_migrations(&db_pool).await.map_err(|e| {
            error!("Failed running migrations: {}", e);
            e
        })?;
    }

    let db_arc = Arc::new(db_pool);

    // Init events
    let (event_tx, event_rx) = mpsc::channel(cfg.event_channel_capacity);
    let event_sender = api::events::EventSender::new(event_tx);
    tokio::spawn(api::events::process_events(event_rx));

    // Session store and auth service
    let sessions = Arc::new(api::auth::SessionStore::new(cfg.session_idle_timeout()));
    let auth_service = Arc::new(api::auth::AuthService::new(
        db_arc.clone(),
        sessions.clone(),
    ));

    // Aggregate app services used by HTTP handlers
    let services = api::services::AppServices::new(
        db_arc.clone(),
        event_sender.clone(),
        auth_service.clone(),
        cfg.whatsapp_country_code.clone(),
    );

    // Bootstrap default admin, page locks, and master password
    if cfg.seed_defaults {
        services.users.ensure_admin(&cfg.bootstrap_admin_password).await?;
        services.page_locks.ensure_defaults().await?;
    }

    // Rate limiter guarding the credential endpoints
    let rate_limiter = Arc::new(api::rate_limiter::RateLimiter::new(
        cfg.rate_limit_attempts_per_window,
        Duration::from_secs(cfg.rate_limit_window_seconds),
    ));

    // Periodic sweep of expired sessions and rate-limit windows
    {
        let sessions = sessions.clone();
        let rate_limiter = rate_limiter.clone();
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(60));
            loop {
                interval.tick().await;
                sessions.purge_expired();
                rate_limiter.purge_expired();
            }
        });
    }

    // Compose shared app state
    let app_state = api::AppState {
        db: db_arc.clone(),
        config: cfg.clone(),
        event_sender,
        services,
        rate_limiter,
    };

    // Build CORS layer from config
    let configured_origins: Option<Vec<HeaderValue>> = cfg
        .cors_allowed_origins
        .as_ref()
        .map(|raw| {
            raw.split(',')
                .filter_map(|origin| {
                    let trimmed = origin.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        HeaderValue::from_str(trimmed).ok()
                    }
                })
                .collect::<Vec<_>>()
        })
        .filter(|origins| !origins.is_empty());

    let cors_layer = if let Some(origins) = configured_origins {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    } else if cfg.should_allow_permissive_cors() {
        info!(
            "Using permissive CORS because explicit origins were not configured ({})",
            if cfg.is_development() {
                "development environment"
            } else {
                "explicit override enabled"
            }
        );
        CorsLayer::permissive()
    } else {
        error!("Missing CORS configuration detected; set APP__CORS_ALLOWED_ORIGINS or APP__CORS_ALLOW_ANY_ORIGIN=true");
        return Err("Missing CORS configuration: set APP__CORS_ALLOWED_ORIGINS or APP__CORS_ALLOW_ANY_ORIGIN=true".into());
    };

    // Build router: status/health + full v1 API + auth + Swagger UI
    let app = Router::<api::AppState>::new()
        .route("/", axum::routing::get(|| async { "munshi-api up" }))
        .nest("/api/v1", api::api_v1_routes())
        .nest("/auth", api::handlers::auth::auth_routes())
        .merge(api::openapi::swagger_ui())
        // Page locks gate their routes before handlers run
        .layer(axum::middleware::from_fn_with_state(
            app_state.clone(),
            api::handlers::page_locks::page_lock_middleware,
        ))
        // HTTP tracing layer for consistent request/response telemetry
        .layer(api::tracing::configure_http_tracing())
        // Apply compression and CORS
        .layer(CompressionLayer::new())
        .layer(cors_layer)
        // Inject the session store for the AuthenticatedUser extractor
        .layer(axum::Extension(sessions))
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            api::tracing::request_id_middleware,
        ))
        .with_state(app_state);

    let addr: SocketAddr = format!("{}:{}", cfg.host, cfg.port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
