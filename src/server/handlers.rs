//! HTTP request handlers

use std::sync::Arc;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Html,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::features::CarListing;
use crate::insights;

use super::error::{Result, ServerError};
use super::state::AppState;

/// Upper bound on listings per batch request
const MAX_BATCH_SIZE: usize = 1000;

// ============================================================================
// Catalog Handlers
// ============================================================================

pub async fn get_options(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!(state.estimator.catalog().options()))
}

pub async fn get_brand_models(
    State(state): State<Arc<AppState>>,
    Path(brand): Path<String>,
) -> Json<serde_json::Value> {
    // Unknown brands simply have no models
    let models = state.estimator.catalog().models_for(&brand);
    Json(serde_json::json!({
        "brand": brand,
        "models": models,
    }))
}

// ============================================================================
// Prediction Handlers
// ============================================================================

pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<CarListing>, JsonRejection>,
) -> Result<Json<serde_json::Value>> {
    let Json(listing) = payload?;
    let estimate = state.estimator.estimate(&listing)?;

    info!(
        marque = %listing.marque,
        modele = %listing.modele,
        annee = listing.annee_modele,
        price = %estimate.formatted,
        "Prediction served"
    );

    Ok(Json(serde_json::json!({
        "success": true,
        "estimate": estimate,
    })))
}

#[derive(Deserialize)]
pub struct BatchPredictRequest {
    listings: Vec<CarListing>,
}

pub async fn predict_batch(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<BatchPredictRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>> {
    let Json(request) = payload?;
    if request.listings.is_empty() {
        return Err(ServerError::BadRequest("Listings array is empty".to_string()));
    }
    if request.listings.len() > MAX_BATCH_SIZE {
        return Err(ServerError::BadRequest(format!(
            "Too many listings: {} (max {})",
            request.listings.len(),
            MAX_BATCH_SIZE
        )));
    }

    let estimator = Arc::clone(&state.estimator);
    let listings = request.listings;
    let n = listings.len();
    let results = tokio::task::spawn_blocking(move || estimator.estimate_batch(&listings))
        .await
        .map_err(|e| ServerError::Internal(format!("Batch estimation task failed: {}", e)))?;

    let results: Vec<serde_json::Value> = results
        .into_iter()
        .map(|r| match r {
            Ok(estimate) => serde_json::json!({ "ok": true, "estimate": estimate }),
            Err(e) => serde_json::json!({ "ok": false, "error": e.to_string() }),
        })
        .collect();
    let failed = results.iter().filter(|r| r["ok"] == false).count();

    info!(count = n, failed, "Batch prediction served");

    Ok(Json(serde_json::json!({
        "success": true,
        "count": n,
        "failed": failed,
        "results": results,
    })))
}

pub async fn encode_features(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<CarListing>, JsonRejection>,
) -> Result<Json<serde_json::Value>> {
    let Json(listing) = payload?;
    let features = state.estimator.encode(&listing)?;
    Ok(Json(serde_json::json!(features.named())))
}

// ============================================================================
// Insight Handlers
// ============================================================================

pub async fn get_insights() -> Json<serde_json::Value> {
    Json(serde_json::json!(insights::market_insights()))
}

pub async fn get_about(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let model = state.estimator.model();
    let mut importances = model.feature_importances();
    importances.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    let top: Vec<serde_json::Value> = importances
        .into_iter()
        .take(8)
        .map(|(name, weight)| serde_json::json!({ "feature": name, "importance": weight }))
        .collect();

    Json(serde_json::json!({
        "model_card": insights::model_card(),
        "model": {
            "kind": model.kind(),
            "n_features": model.n_features(),
            "n_trees": model.n_trees(),
            "max_depth": model.max_depth(),
            "top_features": top,
        },
    }))
}

// ============================================================================
// System Handlers
// ============================================================================

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "estimator": state.estimator.stats(),
        "uptime_secs": state.uptime_secs(),
        "started_at": state.started_at.to_rfc3339(),
    }))
}

pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

// ============================================================================
// UI Handler
// ============================================================================

pub async fn serve_index() -> Html<&'static str> {
    // Embedded HTML for portability
    Html(EMBEDDED_INDEX_HTML)
}

const EMBEDDED_INDEX_HTML: &str = include_str!("index.html");
