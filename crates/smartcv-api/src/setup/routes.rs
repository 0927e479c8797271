//! Route configuration and setup

use crate::auth::{auth_middleware, AuthState};
use crate::constants::API_PREFIX;
use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use smartcv_core::Config;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router, anyhow::Error> {
    let cors = setup_cors(config)?;
    let auth_state = Arc::new(AuthState {
        jwt_secret: config.jwt_secret.clone(),
    });

    let public_routes = public_routes(state.clone());

    let protected_routes = protected_routes(state.clone()).layer(
        axum::middleware::from_fn_with_state(auth_state, auth_middleware),
    );

    // Multipart bodies carry framing overhead beyond the file itself
    let body_limit = config.max_document_size_bytes + 64 * 1024;

    let app = public_routes
        .merge(protected_routes)
        .nest(
            "/docs",
            utoipa_rapidoc::RapiDoc::new("/api/openapi.json")
                .path("/docs")
                .into(),
        )
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let cors = if config.cors_origins.contains(&"*".to_string()) {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any)
    } else {
        let origins: Result<Vec<HeaderValue>, _> =
            config.cors_origins.iter().map(|o| o.parse()).collect();

        CorsLayer::new()
            .allow_origin(origins.unwrap_or_default())
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers(Any)
    };
    Ok(cors)
}

/// Public routes (no authentication required)
fn public_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/health",
            get({
                let state = state.clone();
                move || {
                    let state = state.clone();
                    async { handlers::health::health_check(state).await }
                }
            }),
        )
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
}

/// Protected routes (require authentication).
fn protected_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            &format!("{}/cv", API_PREFIX),
            post(handlers::upload::upload_cv),
        )
        .route(
            &format!("{}/documents", API_PREFIX),
            get(handlers::documents::list_documents),
        )
        .route(
            &format!("{}/documents/{{id}}", API_PREFIX),
            get(handlers::documents::get_document)
                .delete(handlers::documents::delete_document),
        )
        .route(
            &format!("{}/documents/{{id}}/render", API_PREFIX),
            get(handlers::documents::render_document),
        )
        .route(
            &format!("{}/backups/sweep", API_PREFIX),
            post(handlers::backups::sweep_backups),
        )
        .route(
            &format!("{}/backups/{{id}}", API_PREFIX),
            post(handlers::backups::backup_document),
        )
        .with_state(state)
}
