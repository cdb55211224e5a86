//! Regression trees of a boosted ensemble
//!
//! Trees are stored as flat node arrays. Construction validates the
//! structure so evaluation never indexes out of bounds and always
//! terminates: every child sits at a higher index than its parent.

use phishguard_core::{Error, Result};

/// A single tree node
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Internal split: go left iff `row[feature] < threshold`
    Split {
        feature: usize,
        threshold: f32,
        left: usize,
        right: usize,
        /// Direction taken when the feature value is missing (NaN)
        default_left: bool,
    },
    /// Terminal node carrying the leaf score
    Leaf { value: f32 },
}

/// A validated regression tree
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
}

impl Tree {
    /// Build a tree from its nodes, validating child and feature indices
    pub fn new(nodes: Vec<Node>, num_features: usize) -> Result<Self> {
        if nodes.is_empty() {
            return Err(Error::model("tree has no nodes"));
        }

        for (index, node) in nodes.iter().enumerate() {
            if let Node::Split {
                feature,
                threshold,
                left,
                right,
                ..
            } = node
            {
                if *feature >= num_features {
                    return Err(Error::model(format!(
                        "node {} splits on feature {} but the model has {} features",
                        index, feature, num_features
                    )));
                }
                for child in [*left, *right] {
                    if child <= index || child >= nodes.len() {
                        return Err(Error::model(format!(
                            "node {} has invalid child index {}",
                            index, child
                        )));
                    }
                }
                if threshold.is_nan() {
                    return Err(Error::model(format!("node {} has a NaN threshold", index)));
                }
            }
        }

        Ok(Self { nodes })
    }

    /// Leaf score reached by a single row
    pub fn predict(&self, row: &[f32]) -> f32 {
        let mut index = 0;
        loop {
            match &self.nodes[index] {
                Node::Leaf { value } => return *value,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                    default_left,
                } => {
                    let value = row.get(*feature).copied().unwrap_or(f32::NAN);
                    index = if value.is_nan() {
                        if *default_left {
                            *left
                        } else {
                            *right
                        }
                    } else if value < *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    /// Feature index of every split node
    pub fn split_features(&self) -> impl Iterator<Item = usize> + '_ {
        self.nodes.iter().filter_map(|node| match node {
            Node::Split { feature, .. } => Some(*feature),
            Node::Leaf { .. } => None,
        })
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}
