//! Canonical feature schema and validated feature vectors
//!
//! Clients compute the features from a URL and its page and send them as a
//! flat numeric array. Position is the only thing that identifies a value, so
//! the order of [`FEATURE_NAMES`] is part of the wire contract.

use phishguard_core::{Error, Result};

/// Canonical feature names, in the order the model was trained on
pub const FEATURE_NAMES: [&str; 77] = [
    // URL lexical features
    "length_url",
    "length_hostname",
    "ip",
    "nb_dots",
    "nb_hyphens",
    "nb_at",
    "nb_qm",
    "nb_and",
    "nb_or",
    "nb_eq",
    "nb_underscore",
    "nb_tilde",
    "nb_percent",
    "nb_slash",
    "nb_star",
    "nb_colon",
    "nb_comma",
    "nb_semicolumn",
    "nb_dollar",
    "nb_space",
    "nb_www",
    "nb_com",
    "nb_dslash",
    "http_in_path",
    "https_token",
    "ratio_digits_url",
    "ratio_digits_host",
    "punycode",
    "port",
    "tld_in_path",
    "tld_in_subdomain",
    "abnormal_subdomain",
    "nb_subdomains",
    "prefix_suffix",
    "random_domain",
    "shortening_service",
    "path_extension",
    "nb_redirection",
    "nb_external_redirection",
    // Word statistics over the raw URL, host and path
    "length_words_raw",
    "char_repeat",
    "shortest_words_raw",
    "shortest_word_host",
    "shortest_word_path",
    "longest_words_raw",
    "longest_word_host",
    "longest_word_path",
    "avg_words_raw",
    "avg_word_host",
    "avg_word_path",
    "phish_hints",
    "suspecious_tld",
    "statistical_report",
    // Page content features
    "nb_hyperlinks",
    "ratio_intHyperlinks",
    "ratio_extHyperlinks",
    "ratio_nullHyperlinks",
    "nb_extCSS",
    "ratio_intRedirection",
    "ratio_extRedirection",
    "ratio_intErrors",
    "ratio_extErrors",
    "login_form",
    "external_favicon",
    "links_in_tags",
    "submit_email",
    "ratio_intMedia",
    "ratio_extMedia",
    "sfh",
    "iframe",
    "popup_window",
    "safe_anchor",
    "onmouseover",
    "right_clic",
    "empty_title",
    "domain_in_title",
    "domain_with_copyright",
];

/// Number of features every vector must carry
pub const FEATURE_COUNT: usize = FEATURE_NAMES.len();

/// Position of a feature in the canonical schema
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_NAMES.iter().position(|n| *n == name)
}

/// A feature vector whose length matches the canonical schema
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    /// Validate raw values against the schema length
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if values.len() != FEATURE_COUNT {
            return Err(Error::schema(FEATURE_COUNT, values.len()));
        }
        Ok(Self { values })
    }

    /// Build a vector from `(name, value)` pairs, every other feature zero
    pub fn from_named<'a>(pairs: impl IntoIterator<Item = (&'a str, f64)>) -> Result<Self> {
        let mut values = vec![0.0; FEATURE_COUNT];
        for (name, value) in pairs {
            let index = feature_index(name)
                .ok_or_else(|| Error::config(format!("unknown feature '{}'", name)))?;
            values[index] = value;
        }
        Ok(Self { values })
    }

    /// Value of a named feature
    pub fn get(&self, name: &str) -> Option<f64> {
        feature_index(name).map(|i| self.values[i])
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Single-row input for the tree ensemble, which splits on `f32`
    pub fn to_row(&self) -> Vec<f32> {
        self.values.iter().map(|v| *v as f32).collect()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl TryFrom<Vec<f64>> for FeatureVector {
    type Error = Error;

    fn try_from(values: Vec<f64>) -> Result<Self> {
        Self::new(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_schema_has_77_unique_names() {
        assert_eq!(FEATURE_COUNT, 77);
        let unique: HashSet<_> = FEATURE_NAMES.iter().collect();
        assert_eq!(unique.len(), FEATURE_COUNT);
    }

    #[test]
    fn test_rule_features_are_in_schema() {
        assert_eq!(feature_index("length_url"), Some(0));
        assert_eq!(feature_index("ip"), Some(2));
        assert_eq!(feature_index("domain_with_copyright"), Some(76));
        for name in [
            "https_token",
            "suspecious_tld",
            "login_form",
            "shortening_service",
            "phish_hints",
        ] {
            assert!(feature_index(name).is_some(), "missing {}", name);
        }
        assert_eq!(feature_index("not_a_feature"), None);
    }

    #[test]
    fn test_wrong_length_rejected() {
        let err = FeatureVector::new(vec![0.0; 10]).unwrap_err();
        assert_eq!(err.to_string(), "Expected 77 features, got 10");

        assert!(FeatureVector::new(vec![0.0; 78]).is_err());
        assert!(FeatureVector::new(Vec::new()).is_err());
    }

    #[test]
    fn test_named_lookup() {
        let vector = FeatureVector::from_named([("ip", 1.0), ("phish_hints", 3.0)]).unwrap();
        assert_eq!(vector.len(), FEATURE_COUNT);
        assert_eq!(vector.get("ip"), Some(1.0));
        assert_eq!(vector.get("phish_hints"), Some(3.0));
        assert_eq!(vector.get("login_form"), Some(0.0));
        assert_eq!(vector.get("nope"), None);

        assert!(FeatureVector::from_named([("nope", 1.0)]).is_err());
    }
}
