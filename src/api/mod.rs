use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::SharedState;

mod detect;
mod error;
mod observability;
mod recommend;
mod system;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &crate::config::Config {
        &self.shared.config
    }

    #[must_use]
    pub fn emotion(&self) -> &crate::clients::emotion::EmotionClient {
        &self.shared.emotion
    }

    /// The recommender, or a `ConfigurationError` when no API key was set.
    pub fn recommender(&self) -> Result<&crate::services::Recommender, ApiError> {
        self.shared
            .recommender
            .as_ref()
            .ok_or(ApiError::ConfigurationError)
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        prometheus_handle,
    })
}

#[must_use]
pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.config().server.cors_allowed_origins.clone();

    let api_router = Router::new()
        .route("/health", get(system::health))
        .route("/detect-emotion", post(detect::detect_emotion))
        .route("/detect-and-recommend", post(detect::detect_and_recommend))
        .route("/recommend", post(recommend::recommend))
        .route("/languages", get(recommend::list_languages))
        .route("/stats", get(recommend::get_stats));

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .nest("/api", api_router)
        .route("/metrics", get(system::get_metrics))
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(observability::logging_middleware))
        .with_state(state)
}
