//! HTTP routes and handlers for the nutrimap daemon API.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use nutrimap_core::{aggregate_detailed, nutrition_for, Measurement, NutritionFacts, RecipeLineItem};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::debug;

use super::error::ApiError;
use super::state::AppState;
use nutrimap_core::MappingResult;

/// Create the main router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health and status
        .route("/health", get(health))
        .route("/status", get(status))
        // Mapping
        .route("/map-ingredient", post(map_ingredient))
        .route("/update-mapping", post(update_mapping))
        .route("/get-mapping", get(get_mapping))
        // Nutrition
        .route("/ingredients/:id/nutrition", get(ingredient_nutrition))
        .route("/recipes/aggregate-nutrition", post(aggregate_nutrition))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

fn bad_json(rejection: JsonRejection) -> ApiError {
    ApiError::BadRequest(rejection.body_text())
}

fn bad_query(rejection: QueryRejection) -> ApiError {
    ApiError::BadRequest(rejection.body_text())
}

// =============================================================================
// Health & Status
// =============================================================================

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "nutrimap-daemon"
    }))
}

#[derive(Serialize)]
struct StatusResponse {
    status: String,
    ingredient_count: usize,
    index: String,
    namespace: String,
    model: String,
    default_top_k: usize,
    corrections: usize,
    uptime_seconds: f64,
}

async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "running".to_string(),
        ingredient_count: state.table.len(),
        index: state.index_name.clone(),
        namespace: state.mapper.namespace().to_string(),
        model: state.mapper.model_name().to_string(),
        default_top_k: state.mapper.default_top_k(),
        corrections: state.corrections.count().await,
        uptime_seconds: state.uptime_seconds(),
    })
}

// =============================================================================
// Mapping
// =============================================================================

#[derive(Deserialize)]
struct MapIngredientRequest {
    ingredient_text: String,
    #[serde(default)]
    top_k: Option<usize>,
}

async fn map_ingredient(
    State(state): State<Arc<AppState>>,
    body: Result<Json<MapIngredientRequest>, JsonRejection>,
) -> Result<Json<MappingResult>, ApiError> {
    let Json(req) = body.map_err(bad_json)?;
    let result = state.mapper.map(&req.ingredient_text, req.top_k).await?;
    Ok(Json(result))
}

#[derive(Deserialize)]
struct UpdateMappingRequest {
    user_id: String,
    ingredient_id: String,
    mapped_ingredient: String,
}

#[derive(Serialize)]
struct UpdateMappingResponse {
    message: String,
    user_id: String,
    ingredient_id: String,
    mapped_ingredient: String,
}

async fn update_mapping(
    State(state): State<Arc<AppState>>,
    body: Result<Json<UpdateMappingRequest>, JsonRejection>,
) -> Result<Json<UpdateMappingResponse>, ApiError> {
    let Json(req) = body.map_err(bad_json)?;
    let stored = state
        .corrections
        .upsert(&req.user_id, &req.ingredient_id, &req.mapped_ingredient)
        .await;
    Ok(Json(UpdateMappingResponse {
        message: "Mapping updated successfully".to_string(),
        user_id: stored.user_id,
        ingredient_id: stored.ingredient_id,
        mapped_ingredient: stored.mapped_ingredient,
    }))
}

#[derive(Deserialize)]
struct GetMappingParams {
    user_id: String,
    ingredient_id: String,
}

#[derive(Serialize)]
struct GetMappingResponse {
    user_id: String,
    ingredient_id: String,
    mapped_ingredient: Option<String>,
}

async fn get_mapping(
    State(state): State<Arc<AppState>>,
    params: Result<Query<GetMappingParams>, QueryRejection>,
) -> Result<Json<GetMappingResponse>, ApiError> {
    let Query(params) = params.map_err(bad_query)?;
    let mapped = state
        .corrections
        .get(&params.user_id, &params.ingredient_id)
        .await
        .map(|c| c.mapped_ingredient);
    Ok(Json(GetMappingResponse {
        user_id: params.user_id,
        ingredient_id: params.ingredient_id,
        mapped_ingredient: mapped,
    }))
}

// =============================================================================
// Nutrition
// =============================================================================

#[derive(Deserialize)]
struct NutritionParams {
    measurement: Option<String>,
}

async fn ingredient_nutrition(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    params: Result<Query<NutritionParams>, QueryRejection>,
) -> Result<Json<NutritionFacts>, ApiError> {
    let Query(params) = params.map_err(bad_query)?;
    let measurement = match params.measurement.as_deref() {
        Some(raw) => raw.parse::<Measurement>()?,
        None => Measurement::default(),
    };
    let facts = nutrition_for(&state.table, &id, measurement)?;
    Ok(Json(facts))
}

async fn aggregate_nutrition(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Vec<RecipeLineItem>>, JsonRejection>,
) -> Result<Json<NutritionFacts>, ApiError> {
    let Json(items) = body.map_err(bad_json)?;
    let report = aggregate_detailed(&state.table, &items)?;
    let skipped = report.skipped().count();
    if skipped > 0 {
        debug!("Aggregated {} items, skipped {}", items.len(), skipped);
    }
    Ok(Json(report.facts))
}
