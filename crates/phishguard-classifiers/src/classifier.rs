//! Classifier trait

use crate::features::FeatureVector;
use phishguard_core::{Prediction, Result};

/// Trait for all feature-vector classifiers
pub trait FeatureClassifier: Send + Sync {
    /// Probability that the vector describes a phishing page
    fn predict_proba(&self, features: &FeatureVector) -> Result<f32>;

    /// Get the classifier name
    fn name(&self) -> &str;

    /// Label and confidence for a single vector
    fn classify(&self, features: &FeatureVector) -> Result<Prediction> {
        let probability = self.predict_proba(features)?;
        Ok(Prediction::from_probability(probability))
    }
}
