//! HTTP gateway for Tutorly.
//!
//! Serves the embedded single-page UI at `/`, a health probe, and the v1
//! JSON API the page calls for each tab.
//!
//! Built on Axum.

pub mod api_v1;
pub mod frontend;

use axum::extract::DefaultBodyLimit;
use axum::{Router, response::Json, routing::get};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use tutorly_catalog::Catalog;
use tutorly_config::AppConfig;
use tutorly_sessions::InMemorySessionStore;
use tutorly_tutor::{Tutor, TutorSettings};

/// Build the full router: health, v1 API, and frontend.
///
/// Layers applied:
/// - Request body size limit (`gateway.max_body_bytes`)
/// - HTTP trace logging
pub fn build_router(api_state: api_v1::SharedApiState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .nest("/v1", api_v1::v1_router(api_state))
        .merge(frontend::frontend_router())
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Assemble the tutor from configuration: catalog, provider, session store.
pub fn build_tutor(config: &AppConfig) -> Result<Tutor, Box<dyn std::error::Error>> {
    let catalog = Catalog::load(config.catalog.path.as_deref())?;
    let provider = tutorly_providers::router::build_from_config(config)?.active()?;
    let store = InMemorySessionStore::new();

    Ok(Tutor::new(
        provider,
        Arc::new(store),
        Arc::new(catalog),
        TutorSettings::from_config(config),
    ))
}

/// Start the gateway HTTP server.
///
/// Fails before binding if no API key is available for the active provider.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    config.require_api_key()?;

    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);
    let tutor = Arc::new(build_tutor(&config)?);
    let api_state = Arc::new(api_v1::ApiV1State::new(tutor));
    let app = build_router(api_state, config.gateway.max_body_bytes);

    info!(addr = %addr, provider = %config.provider, model = %config.model, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    fn test_config() -> AppConfig {
        AppConfig {
            api_key: Some("gsk-test".into()),
            ..AppConfig::default()
        }
    }

    fn test_router(max_body_bytes: usize) -> Router {
        let tutor = build_tutor(&test_config()).unwrap();
        build_router(Arc::new(api_v1::ApiV1State::new(Arc::new(tutor))), max_body_bytes)
    }

    #[tokio::test]
    async fn health_endpoint() {
        let app = test_router(1024 * 1024);

        let req = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn v1_is_nested() {
        let app = test_router(1024 * 1024);

        let req = Request::builder()
            .uri("/v1/catalog/paths")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn oversized_body_is_rejected() {
        let app = test_router(64);
        let goals = "x".repeat(256);
        let body = format!(
            r#"{{"age":"20","goals":"{goals}","knowledge_level":"beginner"}}"#
        );

        let req = Request::builder()
            .method("POST")
            .uri("/v1/sessions/6f1c8a52-2d1e-4b7a-9a53-0d6a1f6f7b21/profile")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn start_without_api_key_fails_fast() {
        let err = start(AppConfig::default()).await.unwrap_err();
        assert!(err.to_string().contains("No API key"));
    }

    #[test]
    fn tutor_uses_configured_model() {
        let mut config = test_config();
        config.model = "llama-3.1-8b-instant".into();
        let tutor = build_tutor(&config).unwrap();
        assert_eq!(tutor.settings().model, "llama-3.1-8b-instant");
        assert_eq!(tutor.provider_name(), "groq");
    }
}
