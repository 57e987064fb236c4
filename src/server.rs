use crate::error::Result;
use crate::models::{AdviceRequest, IrrigationAdvisory};
use crate::planner;
use crate::provider::NasaPowerClient;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<NasaPowerClient>,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/irrigation-advice", post(irrigation_advice))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

/// Compute an irrigation advisory for the posted farm parameters, using the
/// current UTC date as the start of the advisory window.
async fn irrigation_advice(
    State(state): State<AppState>,
    Json(request): Json<AdviceRequest>,
) -> Result<Json<IrrigationAdvisory>> {
    let reference_date = chrono::Utc::now().date_naive();
    info!(
        "Advice requested for ({}, {}), {} ha, planted {}",
        request.latitude, request.longitude, request.field_size, request.planting_date
    );

    let advisory = planner::plan(&request, reference_date, state.provider.as_ref()).await?;
    Ok(Json(advisory))
}
