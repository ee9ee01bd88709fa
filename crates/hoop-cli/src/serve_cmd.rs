use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use hoop_core::remote::GENERATE_PATH;
use hoop_core::{GenerateError, PlanRequest, Planner};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

pub struct AppError {
    status: StatusCode,
    error: String,
    details: Option<String>,
}

impl AppError {
    fn bad_request(error: impl Into<String>, details: Option<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: error.into(),
            details,
        }
    }

    fn internal(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

impl From<GenerateError> for AppError {
    fn from(err: GenerateError) -> Self {
        match err {
            GenerateError::MissingFields(_) => Self::bad_request("Missing required fields", None),
            GenerateError::InvalidFormat => Self::internal(
                "Failed to generate a valid workout plan",
                GenerateError::InvalidFormat.to_string(),
            ),
            other => Self::internal("Failed to generate workout plan", other.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request("Invalid request body", Some(rejection.body_text()))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let body = match self.details {
            Some(details) => serde_json::json!({ "error": self.error, "details": details }),
            None => serde_json::json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct AppState {
    planner: Arc<dyn Planner>,
}

pub fn build_router(planner: Arc<dyn Planner>) -> Router {
    Router::new()
        .route(GENERATE_PATH, post(generate_workout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(AppState { planner })
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

pub async fn run_serve(planner: Arc<dyn Planner>, bind: &str, port: u16) -> Result<()> {
    let app = build_router(planner);
    let addr: SocketAddr = format!("{bind}:{port}")
        .parse()
        .with_context(|| format!("invalid bind address {bind}:{port}"))?;
    tracing::info!("hoopbuddy serve listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("hoopbuddy serve shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn generate_workout(
    State(state): State<AppState>,
    payload: Result<Json<PlanRequest>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(request) = payload?;
    match state.planner.plan(&request).await {
        Ok(plan) => Ok(Json(plan)),
        Err(e) => {
            if !e.is_validation() {
                tracing::error!(error = %e, "workout plan generation failed");
            }
            Err(e.into())
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
