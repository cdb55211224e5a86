//! Shared application state

use metrics_exporter_prometheus::PrometheusHandle;
use phishguard_classifiers::{FeatureClassifier, ModelLoader};
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::config::ServerConfig;
use crate::error::AppError;

/// Application state shared across all requests
///
/// Built once before the listener starts and never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    /// Classifier installed at startup, if the artifact loaded
    model: Option<Arc<dyn FeatureClassifier>>,

    /// Prometheus metrics handle for rendering
    metrics_handle: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(model: Option<Arc<dyn FeatureClassifier>>) -> Self {
        Self {
            model,
            metrics_handle: None,
        }
    }

    /// Load the configured model; a failed load leaves the state without one
    pub fn from_config(config: &ServerConfig) -> Self {
        let loader = ModelLoader::new(&config.model_path);
        let model: Option<Arc<dyn FeatureClassifier>> = match loader.load() {
            Ok(model) => {
                info!("Model loaded successfully");
                Some(Arc::new(model))
            }
            Err(e) => {
                error!(
                    "Error loading model from {}: {}",
                    loader.path().display(),
                    e
                );
                warn!("Server starting without model - predictions will fail");
                None
            }
        };
        Self::new(model)
    }

    pub fn with_metrics(mut self, handle: PrometheusHandle) -> Self {
        self.metrics_handle = Some(handle);
        self
    }

    pub fn model_loaded(&self) -> bool {
        self.model.is_some()
    }

    /// The installed classifier, or `ModelUnavailable`
    pub fn model(&self) -> Result<Arc<dyn FeatureClassifier>, AppError> {
        self.model.clone().ok_or(AppError::ModelUnavailable)
    }

    /// Prometheus text exposition, empty when no exporter is installed
    pub fn render_metrics(&self) -> String {
        self.metrics_handle
            .as_ref()
            .map(PrometheusHandle::render)
            .unwrap_or_default()
    }
}
