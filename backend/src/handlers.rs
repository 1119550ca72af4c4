use std::time::Duration;

use axum::{
    extract::rejection::JsonRejection,
    routing::{get, post},
    Json, Router,
};
use common::{PipelineRequest, PipelineStats};
use serde_json::{json, Value};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::settings::{ServerConfig, ValidationError};

pub fn build_router(config: &ServerConfig) -> Result<Router, ValidationError> {
    let cors = cors_layer(config)?;

    let router = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/pipelines/parse", post(parse_pipeline))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    Ok(router)
}

// Con credenciales no se pueden usar comodines: se reflejan método y headers
fn cors_layer(config: &ServerConfig) -> Result<CorsLayer, ValidationError> {
    let origins = config.cors_header_values()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request()))
}

/* ---------------- handlers HTTP ---------------- */

async fn root() -> Json<Value> {
    Json(json!({ "message": "Pipeline Backend API" }))
}

async fn health() -> &'static str {
    "ok"
}

// Cuenta nodos/aristas y revisa si el pipeline es un DAG
async fn parse_pipeline(
    payload: Result<Json<PipelineRequest>, JsonRejection>,
) -> Result<Json<PipelineStats>, ApiError> {
    let Json(pipeline) = payload.map_err(|rejection| {
        let err = ApiError::from(rejection);
        debug!("pipeline rechazado ({}): {}", err.code(), err);
        err
    })?;

    let stats = pipeline.stats();
    info!(
        "pipeline parseado: num_nodes={} num_edges={} is_dag={}",
        stats.num_nodes, stats.num_edges, stats.is_dag
    );

    Ok(Json(stats))
}
