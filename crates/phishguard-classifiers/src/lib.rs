//! PhishGuard Classifiers
//!
//! Inference for the phishing classifier.
//!
//! - [`features`]: the canonical 77-feature schema and validated vectors
//! - [`xgboost`] / [`tree`]: XGBoost JSON models and tree-ensemble evaluation
//! - [`model_loader`]: loading and schema checks for the model artifact
//! - [`analysis`]: risk tiers and rule-based suspicious-feature flags
//!
//! Models are immutable once loaded and safe to share across threads.

pub mod analysis;
pub mod classifier;
pub mod features;
pub mod model_loader;
pub mod tree;
pub mod xgboost;

pub use analysis::{analyze, suspicious_features, Analysis, MAX_SUSPICIOUS_FEATURES};
pub use classifier::FeatureClassifier;
pub use features::{feature_index, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use model_loader::{load_model, ModelLoader};
pub use xgboost::{GradientBoostedClassifier, Objective};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::analysis::{analyze, Analysis};
    pub use crate::classifier::FeatureClassifier;
    pub use crate::features::FeatureVector;
    pub use crate::model_loader::ModelLoader;
    pub use crate::xgboost::GradientBoostedClassifier;
}
