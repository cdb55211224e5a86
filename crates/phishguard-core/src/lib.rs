//! PhishGuard Core
//!
//! Core types and utilities shared across PhishGuard components.
//!
//! This crate provides:
//! - Error types and result handling
//! - Prediction results, class labels and risk tiers

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{Prediction, PhishingClass, RiskLevel};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{Prediction, PhishingClass, RiskLevel};
}
