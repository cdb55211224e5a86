//! HTTP routes and handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderValue,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, warn};

use phishguard_classifiers::{analyze as analyze_features, FeatureClassifier, FeatureVector};
use phishguard_core::{PhishingClass, RiskLevel};

use crate::config::CorsConfig;
use crate::error::AppError;
use crate::state::AppState;

/// URL reported back when the caller did not send one
const UNKNOWN_URL: &str = "Unknown";

pub fn create_router(state: AppState, cors: &CorsConfig) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/predict", post(predict))
        .route("/analyze", post(analyze))
        .layer(cors_layer(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if config.allow_any_origin {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(origins))
}

// ============================================================================
// Request / response types
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
}

/// Body of `/predict`
#[derive(Debug, Deserialize)]
pub struct PredictRequest {
    #[serde(default)]
    pub features: Option<Vec<f64>>,
}

/// Body of `/analyze`
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub features: Option<Vec<f64>>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PredictResponse {
    pub is_phishing: bool,
    pub confidence: f32,
    pub class: PhishingClass,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub url: String,
    pub is_phishing: bool,
    pub confidence: f32,
    pub class: PhishingClass,
    pub suspicious_features: Vec<String>,
    pub risk_level: RiskLevel,
}

// ============================================================================
// Handlers
// ============================================================================

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model_loaded: state.model_loaded(),
    })
}

async fn metrics(State(state): State<AppState>) -> String {
    state.render_metrics()
}

async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> Result<Json<PredictResponse>, AppError> {
    metrics::counter!("phishguard_requests_total", "endpoint" => "predict").increment(1);

    let model = state.model()?;
    let Json(req) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    let features = validate_features(req.features)?;

    let prediction = run_inference(model, features, |model, features| {
        model.classify(features)
    })
    .await?;

    metrics::counter!("phishguard_predictions_total", "class" => prediction.class.as_str())
        .increment(1);
    debug!(
        "Predicted {} with confidence {:.3}",
        prediction.class, prediction.confidence
    );

    Ok(Json(PredictResponse {
        is_phishing: prediction.is_phishing(),
        confidence: prediction.confidence,
        class: prediction.class,
    }))
}

async fn analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    metrics::counter!("phishguard_requests_total", "endpoint" => "analyze").increment(1);

    let model = state.model()?;
    let Json(req) = payload.map_err(|e| AppError::Validation(e.body_text()))?;
    let features = validate_features(req.features)?;
    let url = req.url.unwrap_or_else(|| UNKNOWN_URL.to_string());

    let analysis = run_inference(model, features, |model, features| {
        analyze_features(model, features)
    })
    .await?;

    let prediction = analysis.prediction;
    metrics::counter!("phishguard_predictions_total", "class" => prediction.class.as_str())
        .increment(1);
    debug!(
        "Analyzed {}: {} ({}), {} flags",
        url,
        prediction.class,
        analysis.risk_level,
        analysis.suspicious_features.len()
    );

    Ok(Json(AnalyzeResponse {
        url,
        is_phishing: prediction.is_phishing(),
        confidence: prediction.confidence,
        class: prediction.class,
        suspicious_features: analysis.suspicious_features,
        risk_level: analysis.risk_level,
    }))
}

/// Presence, then length, against the canonical schema
fn validate_features(features: Option<Vec<f64>>) -> Result<FeatureVector, AppError> {
    let values =
        features.ok_or_else(|| AppError::Validation("Missing features in request".to_string()))?;
    Ok(FeatureVector::new(values)?)
}

/// Run CPU-bound inference off the async workers
///
/// A panic inside the model surfaces as an inference error instead of
/// taking the connection down.
async fn run_inference<T, F>(
    model: Arc<dyn FeatureClassifier>,
    features: FeatureVector,
    infer: F,
) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&dyn FeatureClassifier, &FeatureVector) -> phishguard_core::Result<T>
        + Send
        + 'static,
{
    let start = Instant::now();
    let result = tokio::task::spawn_blocking(move || infer(model.as_ref(), &features))
        .await
        .map_err(|e| AppError::Inference(format!("inference task failed: {}", e)))?;

    metrics::histogram!("phishguard_inference_latency_us")
        .record(start.elapsed().as_micros() as f64);

    Ok(result?)
}
