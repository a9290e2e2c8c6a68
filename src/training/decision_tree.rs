//! Decision tree (CART)

use super::Task;
use crate::error::{AgrifertError, Result};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A node of the fitted tree
#[derive(Debug, Clone, Serialize, Deserialize)]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

/// CART decision tree.
///
/// Classification trees split on Gini impurity and predict the majority
/// class of a leaf; regression trees split on variance and predict the
/// leaf mean. Class labels are carried as `f64` codes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTree {
    root: Option<Node>,
    task: Task,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    n_features: usize,
}

impl DecisionTree {
    pub fn new(task: Task) -> Self {
        Self {
            root: None,
            task,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            n_features: 0,
        }
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_min_samples_split(mut self, n: usize) -> Self {
        self.min_samples_split = n;
        self
    }

    pub fn with_min_samples_leaf(mut self, n: usize) -> Self {
        self.min_samples_leaf = n;
        self
    }

    /// Fit the tree to training data
    pub fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<&mut Self> {
        let n_samples = x.nrows();

        if n_samples != y.len() {
            return Err(AgrifertError::ShapeError {
                expected: format!("y length = {}", n_samples),
                actual: format!("y length = {}", y.len()),
            });
        }
        if n_samples == 0 {
            return Err(AgrifertError::TrainingError(
                "cannot fit a tree on an empty dataset".to_string(),
            ));
        }

        self.n_features = x.ncols();
        let indices: Vec<usize> = (0..n_samples).collect();
        self.root = Some(self.build(x, y, &indices, 0));

        Ok(self)
    }

    fn build(&self, x: &Array2<f64>, y: &Array1<f64>, indices: &[usize], depth: usize) -> Node {
        let targets: Vec<f64> = indices.iter().map(|&i| y[i]).collect();

        let at_depth_limit = self.max_depth.map_or(false, |d| depth >= d);
        if indices.len() < self.min_samples_split || at_depth_limit || Self::is_pure(&targets) {
            return Node::Leaf {
                value: self.leaf_value(&targets),
            };
        }

        let Some((feature, threshold)) = self.best_split(x, y, indices) else {
            return Node::Leaf {
                value: self.leaf_value(&targets),
            };
        };

        let (left_idx, right_idx): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&i| x[[i, feature]] <= threshold);

        if left_idx.len() < self.min_samples_leaf || right_idx.len() < self.min_samples_leaf {
            return Node::Leaf {
                value: self.leaf_value(&targets),
            };
        }

        Node::Split {
            feature,
            threshold,
            left: Box::new(self.build(x, y, &left_idx, depth + 1)),
            right: Box::new(self.build(x, y, &right_idx, depth + 1)),
        }
    }

    fn best_split(&self, x: &Array2<f64>, y: &Array1<f64>, indices: &[usize]) -> Option<(usize, f64)> {
        let n_features = self.n_features;
        let targets: Vec<f64> = indices.iter().map(|&i| y[i]).collect();
        let parent_impurity = self.impurity(&targets);

        let mut best: Option<(usize, f64, f64)> = None; // (feature, threshold, gain)

        for feature in 0..n_features {
            let mut values: Vec<f64> = indices.iter().map(|&i| x[[i, feature]]).collect();
            values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
            values.dedup();

            for window in values.windows(2) {
                let threshold = (window[0] + window[1]) / 2.0;

                let mut left = Vec::new();
                let mut right = Vec::new();
                for &i in indices {
                    if x[[i, feature]] <= threshold {
                        left.push(y[i]);
                    } else {
                        right.push(y[i]);
                    }
                }

                if left.len() < self.min_samples_leaf || right.len() < self.min_samples_leaf {
                    continue;
                }

                let n = indices.len() as f64;
                let weighted = (left.len() as f64 * self.impurity(&left)
                    + right.len() as f64 * self.impurity(&right))
                    / n;
                let gain = parent_impurity - weighted;

                if gain > 1e-12 && best.map_or(true, |(_, _, g)| gain > g) {
                    best = Some((feature, threshold, gain));
                }
            }
        }

        best.map(|(feature, threshold, _)| (feature, threshold))
    }

    fn impurity(&self, targets: &[f64]) -> f64 {
        if targets.is_empty() {
            return 0.0;
        }
        match self.task {
            Task::Classification => {
                // Gini
                let n = targets.len() as f64;
                let mut counts: HashMap<i64, usize> = HashMap::new();
                for &t in targets {
                    *counts.entry(t.round() as i64).or_insert(0) += 1;
                }
                1.0 - counts
                    .values()
                    .map(|&c| (c as f64 / n).powi(2))
                    .sum::<f64>()
            }
            Task::Regression => {
                // Variance
                let n = targets.len() as f64;
                let mean = targets.iter().sum::<f64>() / n;
                targets.iter().map(|&t| (t - mean).powi(2)).sum::<f64>() / n
            }
        }
    }

    fn leaf_value(&self, targets: &[f64]) -> f64 {
        if targets.is_empty() {
            return 0.0;
        }
        match self.task {
            Task::Classification => {
                let mut counts: HashMap<i64, usize> = HashMap::new();
                for &t in targets {
                    *counts.entry(t.round() as i64).or_insert(0) += 1;
                }
                // Ties break toward the lowest class code so repeated fits agree
                counts
                    .into_iter()
                    .max_by_key(|&(class, count)| (count, std::cmp::Reverse(class)))
                    .map(|(class, _)| class as f64)
                    .unwrap_or(0.0)
            }
            Task::Regression => targets.iter().sum::<f64>() / targets.len() as f64,
        }
    }

    fn is_pure(targets: &[f64]) -> bool {
        targets
            .windows(2)
            .all(|w| (w[0] - w[1]).abs() < 1e-10)
    }

    /// Predict one value per row of `x`
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let root = self.root.as_ref().ok_or(AgrifertError::ModelNotFitted)?;

        let predictions: Vec<f64> = (0..x.nrows())
            .map(|i| Self::traverse(root, &x.row(i).to_vec()))
            .collect();

        Ok(Array1::from_vec(predictions))
    }

    fn traverse(node: &Node, sample: &[f64]) -> f64 {
        match node {
            Node::Leaf { value } => *value,
            Node::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if sample[*feature] <= *threshold {
                    Self::traverse(left, sample)
                } else {
                    Self::traverse(right, sample)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_classification_separable() {
        let x = array![
            [25.0, 30.0],
            [26.0, 32.0],
            [27.0, 31.0],
            [34.0, 60.0],
            [35.0, 62.0],
            [36.0, 61.0],
        ];
        let y = array![0.0, 0.0, 0.0, 1.0, 1.0, 1.0];

        let mut tree = DecisionTree::new(Task::Classification);
        tree.fit(&x, &y).unwrap();

        let predictions = tree.predict(&x).unwrap();
        for (p, a) in predictions.iter().zip(y.iter()) {
            assert_eq!(p.round(), a.round());
        }
    }

    #[test]
    fn test_regression_monotone() {
        let x = array![[10.0], [20.0], [30.0], [40.0], [50.0]];
        let y = array![12.0, 22.0, 32.0, 42.0, 52.0];

        let mut tree = DecisionTree::new(Task::Regression);
        tree.fit(&x, &y).unwrap();

        let predictions = tree.predict(&x).unwrap();
        let mse: f64 = predictions
            .iter()
            .zip(y.iter())
            .map(|(p, a)| (p - a).powi(2))
            .sum::<f64>()
            / y.len() as f64;

        assert!(mse < 1.0, "MSE too high: {}", mse);
    }

    #[test]
    fn test_tied_leaf_is_deterministic() {
        // Identical rows with conflicting labels force a tied leaf;
        // repeated fits must all resolve it the same way.
        let x = array![[1.0], [1.0]];
        let y = array![0.0, 1.0];
        let query = array![[1.0]];

        let mut seen = std::collections::HashSet::new();
        for _ in 0..64 {
            let mut tree = DecisionTree::new(Task::Classification);
            tree.fit(&x, &y).unwrap();
            let p = tree.predict(&query).unwrap();
            seen.insert(p[0].round() as i64);
        }
        assert_eq!(seen.len(), 1, "tied leaf resolved inconsistently");
        assert!(seen.contains(&0));
    }

    #[test]
    fn test_unfitted_predict_fails() {
        let tree = DecisionTree::new(Task::Regression);
        let x = array![[1.0]];
        assert!(matches!(
            tree.predict(&x),
            Err(AgrifertError::ModelNotFitted)
        ));
    }

    #[test]
    fn test_shape_mismatch() {
        let x = array![[1.0], [2.0]];
        let y = array![1.0];
        let mut tree = DecisionTree::new(Task::Regression);
        assert!(matches!(
            tree.fit(&x, &y),
            Err(AgrifertError::ShapeError { .. })
        ));
    }
}
