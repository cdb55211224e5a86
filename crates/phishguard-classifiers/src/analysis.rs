//! Rule-based annotation of feature vectors
//!
//! A handful of features are strong phishing signals on their own. Each rule
//! inspects one named feature against a fixed threshold and produces a short
//! human-readable flag. Rules are evaluated in declaration order and at most
//! [`MAX_SUSPICIOUS_FEATURES`] flags are reported.

use crate::classifier::FeatureClassifier;
use crate::features::FeatureVector;
use phishguard_core::{Prediction, Result, RiskLevel};

/// Upper bound on reported flags
pub const MAX_SUSPICIOUS_FEATURES: usize = 5;

/// Trigger condition of a rule
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Condition {
    /// Binary flag set
    Equals(f64),
    /// Count strictly above a bound
    GreaterThan(f64),
}

impl Condition {
    fn matches(&self, value: f64) -> bool {
        match self {
            Self::Equals(expected) => value == *expected,
            Self::GreaterThan(bound) => value > *bound,
        }
    }
}

/// A single threshold rule over a named feature
#[derive(Debug, Clone, Copy)]
pub struct SuspicionRule {
    pub feature: &'static str,
    pub condition: Condition,
    /// Flag text; `{}` is replaced by the integer part of the value
    pub message: &'static str,
}

impl SuspicionRule {
    fn evaluate(&self, features: &FeatureVector) -> Option<String> {
        let value = features.get(self.feature)?;
        if !self.condition.matches(value) {
            return None;
        }
        Some(self.message.replace("{}", &(value.trunc() as i64).to_string()))
    }
}

/// Built-in rules, in reporting order
pub const SUSPICION_RULES: [SuspicionRule; 6] = [
    SuspicionRule {
        feature: "ip",
        condition: Condition::Equals(1.0),
        message: "IP address in URL",
    },
    SuspicionRule {
        feature: "https_token",
        condition: Condition::Equals(1.0),
        message: "Not using HTTPS",
    },
    SuspicionRule {
        feature: "suspecious_tld",
        condition: Condition::Equals(1.0),
        message: "Suspicious TLD",
    },
    SuspicionRule {
        feature: "login_form",
        condition: Condition::Equals(1.0),
        message: "Has login form",
    },
    SuspicionRule {
        feature: "shortening_service",
        condition: Condition::Equals(1.0),
        message: "URL shortener detected",
    },
    SuspicionRule {
        feature: "phish_hints",
        condition: Condition::GreaterThan(2.0),
        message: "Phishing keywords found ({})",
    },
];

/// Flags raised by the built-in rules, capped at [`MAX_SUSPICIOUS_FEATURES`]
pub fn suspicious_features(features: &FeatureVector) -> Vec<String> {
    SUSPICION_RULES
        .iter()
        .filter_map(|rule| rule.evaluate(features))
        .take(MAX_SUSPICIOUS_FEATURES)
        .collect()
}

/// Prediction enriched with risk tier and rule flags
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub prediction: Prediction,
    pub risk_level: RiskLevel,
    pub suspicious_features: Vec<String>,
}

/// Classify a vector and annotate it
pub fn analyze(classifier: &dyn FeatureClassifier, features: &FeatureVector) -> Result<Analysis> {
    let prediction = classifier.classify(features)?;
    Ok(Analysis {
        risk_level: prediction.risk_level(),
        suspicious_features: suspicious_features(features),
        prediction,
    })
}
