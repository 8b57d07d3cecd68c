// Axum API Server Module
//
// Purpose: HTTP surface over the planner. The catalog is loaded once at
// startup and only read afterwards; each request runs its own optimizer pass
// on the blocking thread pool.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::catalog::{CatalogProvider, StaticCatalogProvider};
use crate::error::{OptimizeError, PlanError};
use crate::optimizer::{Optimizer, OptimizerConfig};
use crate::planner::{Planner, RecommendRequest};
use crate::types::{AllocationResult, Location};

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub planner: Planner,
    pub provider: Arc<dyn CatalogProvider>,
}

impl AppState {
    /// Load the catalog file and build the planner
    pub fn new(catalog_path: &str, config: OptimizerConfig) -> anyhow::Result<Self> {
        tracing::info!("Loading plant catalog from {}...", catalog_path);
        let provider = StaticCatalogProvider::from_path(catalog_path)
            .with_context(|| format!("Failed to load catalog: {}", catalog_path))?;
        tracing::info!(
            "Catalog ready: {} plants in categories {:?}",
            provider.inner().len(),
            provider.inner().category_names()
        );

        Ok(Self::from_provider(Arc::new(provider), config))
    }

    pub fn from_provider(provider: Arc<dyn CatalogProvider>, config: OptimizerConfig) -> Self {
        Self {
            planner: Planner::new(provider.clone(), Optimizer::new(config)),
            provider,
        }
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(health_check))

        // Catalog overview
        .route("/api/categories", get(list_categories))

        // Planting plan
        .route("/recommend_crops", post(recommend_crops))

        // Middleware (applied in reverse order)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Categories available for selection, with plant counts
async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<serde_json::Value>, AppError> {
    let catalog = state.provider.catalog(&Location::default(), None)?;

    let categories: Vec<serde_json::Value> = catalog
        .categories()
        .map(|group| {
            serde_json::json!({
                "name": group.name,
                "plants": group.plants.len(),
            })
        })
        .collect();

    Ok(Json(serde_json::json!({ "categories": categories })))
}

async fn recommend_crops(
    State(state): State<AppState>,
    payload: Result<Json<RecommendRequest>, JsonRejection>,
) -> Result<Json<AllocationResult>, AppError> {
    // Malformed bodies get the same error shape as invalid requests
    let Json(payload) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;

    tracing::info!(
        "Recommending crops for {} m² terrace, budget {}, categories {:?}",
        payload.terrace_size,
        payload.budget,
        payload.types
    );

    // CPU-bound work: run in blocking thread pool
    let planner = state.planner.clone();
    let result = tokio::task::spawn_blocking(move || planner.recommend(&payload))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    Ok(Json(result))
}

// ============================================================================
// Error Handling
// ============================================================================

/// Failures are reported with the result's field names, zeroed, so clients
/// can read one shape for success and failure
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    Catalog(String),
    Internal(String),
}

impl From<PlanError> for AppError {
    fn from(err: PlanError) -> Self {
        match err {
            PlanError::Optimize(OptimizeError::Validation(msg)) => AppError::Validation(msg),
            PlanError::Catalog(e) => AppError::Catalog(e.to_string()),
        }
    }
}

impl From<crate::error::CatalogError> for AppError {
    fn from(err: crate::error::CatalogError) -> Self {
        AppError::Catalog(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::Catalog(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        tracing::warn!("Request failed ({}): {}", status, message);

        let body = Json(serde_json::json!({
            "error": message,
            "total_savings": 0,
            "total_carbon_absorbed": 0,
            "total_plants_grown": 0,
            "total_budget_used": 0,
            "recommended_plants": [],
        }));

        (status, body).into_response()
    }
}
