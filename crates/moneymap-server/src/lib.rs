//! MoneyMap Web Server
//!
//! Axum-based REST API for the MoneyMap personal finance backend.
//!
//! State lives in an in-memory [`Store`]; the LLM and text-analytics
//! collaborators are optional and configured from the environment. Handlers
//! return [`AppError`], which maps domain errors onto HTTP statuses:
//! unknown ids are 404, finalizing an empty conversation is 400, and an
//! LLM reply that cannot be parsed into the requested structure is 422.

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use moneymap_core::ai::{LlmBackend, LlmClient};
use moneymap_core::analytics::AnalyticsClient;
use moneymap_core::categorize::Categorizer;

mod handlers;
mod store;

pub use store::Store;

/// Maximum statement upload size (10 MB)
pub const MAX_UPLOAD_SIZE: usize = 10 * 1024 * 1024;

/// Shared application state
pub struct AppState {
    pub store: Store,
    pub llm: Option<LlmClient>,
    pub analytics: Option<AnalyticsClient>,
}

impl AppState {
    /// Categorizer wired to whatever collaborators are configured
    fn categorizer(&self) -> Categorizer {
        Categorizer::new(self.analytics.clone(), self.llm.clone())
    }

    /// The LLM client, or a 503 for endpoints that cannot work without one
    fn require_llm(&self) -> Result<&LlmClient, AppError> {
        self.llm
            .as_ref()
            .ok_or_else(|| AppError::service_unavailable("LLM backend not configured"))
    }
}

/// Success response
#[derive(Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Create the application router with collaborators from the environment
pub fn create_router() -> Router {
    let llm = LlmClient::from_env();
    match llm {
        Some(ref client) => {
            info!("LLM backend configured: {} (model: {})", client.host(), client.model());
        }
        None => {
            info!("LLM backend not configured (set OLLAMA_HOST to enable chat features)");
        }
    }

    let analytics = AnalyticsClient::from_env();
    if analytics.is_none() {
        info!("Text analytics not configured (set ANALYTICS_HOST to enable)");
    }

    create_router_with_backends(Store::new(), llm, analytics)
}

/// Create the application router with explicit collaborators (for testing)
pub fn create_router_with_backends(
    store: Store,
    llm: Option<LlmClient>,
    analytics: Option<AnalyticsClient>,
) -> Router {
    let state = Arc::new(AppState {
        store,
        llm,
        analytics,
    });

    let api_routes = Router::new()
        // Onboarding
        .route("/users/onboard", post(handlers::onboard_user))
        // Goal planning
        .route("/goals/chat/:user_id", post(handlers::goal_chat))
        .route("/goals/finalize/:user_id", post(handlers::goal_finalize))
        .route("/goals/:user_id", get(handlers::list_goals))
        .route(
            "/goals/:user_id/:goal_id",
            get(handlers::get_goal)
                .patch(handlers::update_goal)
                .delete(handlers::delete_goal),
        )
        // Missions
        .route(
            "/goals/:user_id/:goal_id/missions/generate",
            post(handlers::generate_missions),
        )
        .route(
            "/goals/:user_id/:goal_id/missions/:mission_id",
            axum::routing::patch(handlers::update_mission_status),
        )
        .route("/missions/:user_id", get(handlers::list_missions))
        // Credit optimization
        .route("/credit/chat/:user_id", post(handlers::credit_chat))
        .route("/credit/finalize/:user_id", post(handlers::credit_finalize))
        // Reports
        .route("/budget/:user_id", get(handlers::get_budget))
        .route("/dashboard/:user_id", get(handlers::get_dashboard));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_SIZE))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Start the server
pub async fn serve(host: &str, port: u16) -> anyhow::Result<()> {
    check_llm_connection().await;

    let app = create_router();
    let addr = format!("{}:{}", host, port);

    info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Check and log LLM backend connection status
async fn check_llm_connection() {
    match LlmClient::from_env() {
        Some(client) => {
            if client.health_check().await {
                info!(
                    "LLM backend connected: {} (model: {})",
                    client.host(),
                    client.model()
                );
            } else {
                warn!(
                    "LLM backend configured but not responding: {} (model: {})",
                    client.host(),
                    client.model()
                );
            }
        }
        None => {
            info!("LLM backend not configured (set OLLAMA_HOST to enable chat features)");
        }
    }
}

// ============================================================================
// Error Handling
// ============================================================================

/// Application error type with proper HTTP status codes
pub struct AppError {
    status: StatusCode,
    message: String,
    internal: Option<anyhow::Error>,
}

impl AppError {
    pub fn bad_request(msg: &str) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn not_found(msg: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn unprocessable(msg: &str) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn service_unavailable(msg: &str) -> Self {
        Self {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: msg.to_string(),
            internal: None,
        }
    }

    pub fn internal(msg: &str) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            internal: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log the full internal error if present
        if let Some(err) = &self.internal {
            error!(error = %err, "Internal error");
        }

        let body = Json(serde_json::json!({
            "error": self.message
        }));

        (self.status, body).into_response()
    }
}

impl From<moneymap_core::Error> for AppError {
    fn from(err: moneymap_core::Error) -> Self {
        use moneymap_core::Error;
        match err {
            Error::NotFound(msg) => Self::not_found(&msg),
            Error::InvalidData(_) | Error::NoJson(_) | Error::Statement(_) => {
                Self::unprocessable(&err.to_string())
            }
            other => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "An internal error occurred".to_string(),
                internal: Some(other.into()),
            },
        }
    }
}

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        Self::bad_request(&format!("Invalid multipart form: {}", err))
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            // Return generic message to client
            message: "An internal error occurred".to_string(),
            // Keep full error for logging
            internal: Some(err),
        }
    }
}

#[cfg(test)]
mod tests;
