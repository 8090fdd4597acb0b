use portal_service::{
    build_router,
    config::PortalConfig,
    services::{AllowlistService, Database, EmailService, PortalAuthService, SlugResolver},
    AppState,
};
use service_core::middleware::rate_limit::create_ip_rate_limiter;
use service_core::observability::logging::init_tracing;
use std::net::SocketAddr;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), service_core::error::AppError> {
    // Load configuration - fail fast if invalid
    let config = PortalConfig::from_env()?;

    init_tracing(&config.service_name, &config.log_level);

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
        "Starting portal service"
    );

    // Initialize database connection and schema
    let pool = portal_service::db::create_pool(&config.database)
        .await
        .map_err(|e| service_core::error::AppError::InternalError(anyhow::Error::new(e)))?;
    portal_service::db::run_migrations(&pool)
        .await
        .map_err(|e| service_core::error::AppError::InternalError(anyhow::Error::new(e)))?;
    let db = Database::new(pool);
    tracing::info!("Database initialized successfully");

    // Initialize email service
    let email = std::sync::Arc::new(EmailService::new(&config.smtp)?);

    // Initialize rate limiters using shared logic
    let magic_link_rate_limiter = create_ip_rate_limiter(
        config.rate_limit.magic_link_attempts,
        config.rate_limit.magic_link_window_seconds,
    );
    let ip_rate_limiter = create_ip_rate_limiter(
        config.rate_limit.global_ip_limit,
        config.rate_limit.global_ip_window_seconds,
    );
    tracing::info!("Rate limiters initialized: Magic Link and Global IP");

    // Initialize services
    let resolver = SlugResolver::new(db.clone());
    let portal_auth = PortalAuthService::new(
        db.clone(),
        resolver.clone(),
        email.clone(),
        config.portal.base_url.clone(),
        config.portal.magic_link_ttl_minutes,
        config.portal.session_ttl_hours,
    );
    let allowlist = AllowlistService::new(db.clone(), resolver);

    // Create application state
    let state = AppState {
        config: config.clone(),
        db,
        email,
        portal_auth,
        allowlist,
        magic_link_rate_limiter,
        ip_rate_limiter,
    };

    // Build application router
    let app = build_router(state).await?;

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));

    tracing::info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    service_core::axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Service shutdown complete");
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
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
