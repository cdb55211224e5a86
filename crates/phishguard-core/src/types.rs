//! Shared prediction types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Probability above which a page is labelled phishing
pub const PHISHING_THRESHOLD: f32 = 0.5;

/// Probability above which a page is considered high risk
pub const HIGH_RISK_THRESHOLD: f32 = 0.8;

/// Binary class label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhishingClass {
    Phishing,
    Legitimate,
}

impl PhishingClass {
    /// Label a probability of the positive class
    pub fn from_probability(probability: f32) -> Self {
        if probability > PHISHING_THRESHOLD {
            Self::Phishing
        } else {
            Self::Legitimate
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Phishing => "phishing",
            Self::Legitimate => "legitimate",
        }
    }
}

impl fmt::Display for PhishingClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Human-facing bucketing of the phishing probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Bucket a confidence: `> 0.8` is high, `> 0.5` is medium, anything else low
    pub fn from_confidence(confidence: f32) -> Self {
        if confidence > HIGH_RISK_THRESHOLD {
            Self::High
        } else if confidence > PHISHING_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of classifying a single feature vector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    /// Predicted label
    pub class: PhishingClass,

    /// Probability of the phishing class (0.0-1.0)
    pub confidence: f32,
}

impl Prediction {
    /// Build a prediction from the positive-class probability
    pub fn from_probability(probability: f32) -> Self {
        let confidence = probability.clamp(0.0, 1.0);
        Self {
            class: PhishingClass::from_probability(confidence),
            confidence,
        }
    }

    pub fn is_phishing(&self) -> bool {
        self.class == PhishingClass::Phishing
    }

    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_confidence(self.confidence)
    }
}
