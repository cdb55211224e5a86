//! Model loading for the gradient-boosted phishing classifier

use crate::classifier::FeatureClassifier;
use crate::features::{FEATURE_COUNT, FEATURE_NAMES};
use crate::xgboost::GradientBoostedClassifier;
use phishguard_core::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Number of most-used features logged after a successful load
const LOGGED_TOP_FEATURES: usize = 10;

/// Loads an XGBoost JSON artifact and checks it against the feature schema
#[derive(Debug, Clone)]
pub struct ModelLoader {
    path: PathBuf,
}

impl ModelLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read, parse and validate the artifact
    pub fn load(&self) -> Result<GradientBoostedClassifier> {
        info!("Loading model from: {}", self.path.display());

        let bytes = std::fs::read(&self.path)?;
        let name = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "xgboost".to_string());
        let model = GradientBoostedClassifier::from_json_slice(&bytes)?.with_name(name);

        if model.num_features() != FEATURE_COUNT {
            return Err(Error::model(format!(
                "model expects {} features but the schema defines {}",
                model.num_features(),
                FEATURE_COUNT
            )));
        }

        let embedded = model.feature_names();
        if !embedded.is_empty() {
            let mismatched = embedded
                .iter()
                .zip(FEATURE_NAMES.iter())
                .filter(|(model_name, schema_name)| model_name.as_str() != **schema_name)
                .count();
            if mismatched > 0 {
                warn!(
                    "{} of the model's feature names differ from the canonical schema; \
                     inputs are matched by position",
                    mismatched
                );
            }
        }

        info!(
            "Loaded model '{}': {} trees, {} features, objective {}{}",
            model.name(),
            model.tree_count(),
            model.num_features(),
            model.objective().as_str(),
            model
                .version()
                .map(|v| format!(", written by XGBoost {}", v))
                .unwrap_or_default()
        );

        for (feature, splits) in model.feature_importance().iter().take(LOGGED_TOP_FEATURES) {
            debug!("Feature importance: {} = {} splits", feature, splits);
        }

        Ok(model)
    }
}

/// Load a model from a file path
pub fn load_model(path: impl AsRef<Path>) -> Result<GradientBoostedClassifier> {
    ModelLoader::new(path.as_ref()).load()
}
