//! Model training module
//!
//! Tree-ensemble models consumed by the recommendation engine purely
//! through their fit/predict contract:
//! - [`DecisionTree`] - CART for classification and regression
//! - [`RandomForest`] - bootstrap-aggregated trees, seeded for determinism

pub mod decision_tree;
pub mod random_forest;

pub use decision_tree::DecisionTree;
pub use random_forest::RandomForest;

use serde::{Deserialize, Serialize};

/// Supervised task kind, selects the split criterion and the leaf/vote
/// aggregation (Gini + majority vote vs. variance + mean).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Task {
    Classification,
    Regression,
}
