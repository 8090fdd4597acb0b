pub mod config;
pub mod db;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;

use service_core::axum::{
    middleware::{from_fn, from_fn_with_state},
    routing::{get, patch, post},
    Router,
};
use service_core::middleware::{
    rate_limit::ip_rate_limit_middleware, security_headers::security_headers_middleware,
    tracing::request_id_middleware,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::PortalConfig;
use crate::services::{AllowlistService, Database, EmailProvider, PortalAuthService};
use service_core::error::AppError;
use std::sync::Arc;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health::health_check,
        handlers::portal::magic_link::send_magic_link,
        handlers::portal::session::validate_token,
        handlers::portal::session::validate_session,
        handlers::portal::session::refresh_session,
        handlers::portal::password::setup_password,
        handlers::portal::password::verify_password,
        handlers::portal::lookup::check_portal,
        handlers::portal::lookup::client_slug,
        handlers::portal::members::add_members,
        handlers::portal::members::list_members,
        handlers::portal::members::update_member_role,
        handlers::portal::members::remove_member,
    ),
    components(
        schemas(
            dtos::ErrorResponse,
            dtos::portal::MagicLinkRequest,
            dtos::portal::MagicLinkResponse,
            dtos::portal::MemberIdentity,
            dtos::portal::ValidateTokenRequest,
            dtos::portal::SessionResponse,
            dtos::portal::ValidateSessionRequest,
            dtos::portal::SessionIdentityResponse,
            dtos::portal::RefreshSessionRequest,
            dtos::portal::SetupPasswordRequest,
            dtos::portal::VerifyPasswordRequest,
            dtos::portal::VerifyPasswordResponse,
            dtos::portal::CheckPortalRequest,
            dtos::portal::CheckPortalResponse,
            dtos::portal::ClientSlugRequest,
            dtos::portal::MemberLocationResponse,
            dtos::portal::NewMember,
            dtos::portal::AddMembersRequest,
            dtos::portal::AddMembersResponse,
            dtos::portal::UpdateMemberRoleRequest,
            dtos::portal::MemberSummary,
            dtos::portal::MembersListResponse,
            models::MemberRole,
        )
    ),
    tags(
        (name = "Portal Auth", description = "Magic link and session authentication"),
        (name = "Portal Lookup", description = "Slug resolution for portal frontends"),
        (name = "Portal Members", description = "Allowlist management"),
        (name = "Health", description = "Service health"),
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub config: PortalConfig,
    pub db: Database,
    pub email: Arc<dyn EmailProvider>,
    pub portal_auth: PortalAuthService,
    pub allowlist: AllowlistService,
    pub magic_link_rate_limiter: service_core::middleware::rate_limit::IpRateLimiter,
    pub ip_rate_limiter: service_core::middleware::rate_limit::IpRateLimiter,
}

pub async fn build_router(state: AppState) -> Result<Router, AppError> {
    // Magic link issuance is the abuse magnet; it gets its own tighter limit
    let magic_link_limiter = state.magic_link_rate_limiter.clone();
    let magic_link_route = Router::new()
        .route(
            "/portal/magic-link",
            post(handlers::portal::magic_link::send_magic_link),
        )
        .layer(from_fn_with_state(
            magic_link_limiter,
            ip_rate_limit_middleware,
        ));

    let ip_limiter = state.ip_rate_limiter.clone();

    let mut app = Router::new().route("/health", get(handlers::health::health_check));

    let swagger_enabled = match state.config.environment {
        crate::config::Environment::Dev => true,
        crate::config::Environment::Prod => {
            state.config.swagger.enabled == crate::config::SwaggerMode::Public
        }
    };

    if swagger_enabled {
        app =
            app.merge(SwaggerUi::new("/docs").url("/.well-known/openapi.json", ApiDoc::openapi()));
    } else {
        app = app.route(
            "/.well-known/openapi.json",
            get(|| async { service_core::axum::Json(ApiDoc::openapi()) }),
        );
    }

    let app = app
        .merge(magic_link_route)
        .route(
            "/portal/validate-token",
            post(handlers::portal::session::validate_token),
        )
        .route(
            "/portal/validate-session",
            post(handlers::portal::session::validate_session),
        )
        .route(
            "/portal/refresh-session",
            post(handlers::portal::session::refresh_session),
        )
        .route(
            "/portal/setup-password",
            post(handlers::portal::password::setup_password),
        )
        .route(
            "/portal/verify-password",
            post(handlers::portal::password::verify_password),
        )
        .route("/portal/check", post(handlers::portal::lookup::check_portal))
        .route(
            "/portal/client-slug",
            post(handlers::portal::lookup::client_slug),
        )
        .route("/portal/members", post(handlers::portal::members::add_members))
        .route(
            "/portal/clients/:client_id/members",
            get(handlers::portal::members::list_members),
        )
        .route(
            "/portal/members/:member_id",
            patch(handlers::portal::members::update_member_role)
                .delete(handlers::portal::members::remove_member),
        )
        .with_state(state.clone())
        // Global IP rate limiting
        .layer(from_fn_with_state(ip_limiter, ip_rate_limit_middleware))
        // Add tracing layer
        .layer(TraceLayer::new_for_http().make_span_with(
            |request: &service_core::axum::http::Request<_>| {
                let request_id = request
                    .headers()
                    .get("x-request-id")
                    .and_then(|value| value.to_str().ok())
                    .unwrap_or("-");

                tracing::info_span!(
                    "http_request",
                    request_id = %request_id,
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            },
        ))
        // Add tracing middleware for request_id
        .layer(from_fn(request_id_middleware))
        // Add security headers middleware
        .layer(from_fn(security_headers_middleware))
        // Add CORS layer
        .layer(
            CorsLayer::new()
                .allow_origin(
                    state
                        .config
                        .security
                        .allowed_origins
                        .iter()
                        .map(|o| {
                            o.parse::<service_core::axum::http::HeaderValue>()
                                .unwrap_or_else(|e| {
                                    tracing::error!(
                                        "Invalid CORS origin '{}': {}. Using fallback.",
                                        o,
                                        e
                                    );
                                    service_core::axum::http::HeaderValue::from_static("*")
                                })
                        })
                        .collect::<Vec<service_core::axum::http::HeaderValue>>(),
                )
                .allow_methods([
                    service_core::axum::http::Method::GET,
                    service_core::axum::http::Method::POST,
                    service_core::axum::http::Method::PATCH,
                    service_core::axum::http::Method::DELETE,
                    service_core::axum::http::Method::OPTIONS,
                ])
                .allow_headers([
                    service_core::axum::http::header::AUTHORIZATION,
                    service_core::axum::http::header::CONTENT_TYPE,
                    service_core::axum::http::header::HeaderName::from_static("x-request-id"),
                ]),
        );

    Ok(app)
}
