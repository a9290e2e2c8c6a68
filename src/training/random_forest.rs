//! Random forest

use super::decision_tree::DecisionTree;
use super::Task;
use crate::error::{AgrifertError, Result};
use ndarray::{Array1, Array2, Axis};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Bootstrap-aggregated forest of [`DecisionTree`]s.
///
/// Classification aggregates by majority vote over tree predictions,
/// regression by the mean. Each tree is trained on a bootstrap sample
/// drawn from a ChaCha stream seeded with `random_state + tree index`,
/// so a fixed seed gives a fully deterministic fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForest {
    trees: Vec<DecisionTree>,
    task: Task,
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub random_state: Option<u64>,
    n_features: usize,
}

impl RandomForest {
    pub fn new(task: Task, n_estimators: usize) -> Self {
        Self {
            trees: Vec::new(),
            task,
            n_estimators,
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            random_state: None,
            n_features: 0,
        }
    }

    pub fn classifier(n_estimators: usize) -> Self {
        Self::new(Task::Classification, n_estimators)
    }

    pub fn regressor(n_estimators: usize) -> Self {
        Self::new(Task::Regression, n_estimators)
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

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = Some(seed);
        self
    }

    /// Fit the forest to training data
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
                "cannot fit a forest on an empty dataset".to_string(),
            ));
        }

        self.n_features = x.ncols();
        let base_seed = self.random_state.unwrap_or(42);

        let trees: Result<Vec<DecisionTree>> = (0..self.n_estimators)
            .into_par_iter()
            .map(|tree_idx| {
                let mut rng = ChaCha8Rng::seed_from_u64(base_seed.wrapping_add(tree_idx as u64));

                let sample_indices: Vec<usize> = (0..n_samples)
                    .map(|_| (rng.next_u64() as usize) % n_samples)
                    .collect();

                let x_boot = x.select(Axis(0), &sample_indices);
                let y_boot: Array1<f64> =
                    Array1::from_vec(sample_indices.iter().map(|&i| y[i]).collect());

                let mut tree = DecisionTree::new(self.task)
                    .with_min_samples_split(self.min_samples_split)
                    .with_min_samples_leaf(self.min_samples_leaf);
                if let Some(d) = self.max_depth {
                    tree = tree.with_max_depth(d);
                }

                tree.fit(&x_boot, &y_boot)?;
                Ok(tree)
            })
            .collect();

        self.trees = trees?;
        Ok(self)
    }

    /// Predict one value per row of `x`
    pub fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if self.trees.is_empty() {
            return Err(AgrifertError::ModelNotFitted);
        }

        let per_tree: Vec<Array1<f64>> = self
            .trees
            .par_iter()
            .map(|tree| tree.predict(x))
            .collect::<Result<_>>()?;

        let n_samples = x.nrows();
        let predictions: Vec<f64> = match self.task {
            Task::Classification => (0..n_samples)
                .map(|i| {
                    let mut votes: HashMap<i64, usize> = HashMap::new();
                    for preds in &per_tree {
                        *votes.entry(preds[i].round() as i64).or_insert(0) += 1;
                    }
                    votes
                        .into_iter()
                        // Tie-break on the class code so voting is deterministic
                        .max_by_key(|&(class, count)| (count, std::cmp::Reverse(class)))
                        .map(|(class, _)| class as f64)
                        .unwrap_or(0.0)
                })
                .collect(),
            Task::Regression => (0..n_samples)
                .map(|i| {
                    per_tree.iter().map(|p| p[i]).sum::<f64>() / per_tree.len() as f64
                })
                .collect(),
        };

        Ok(Array1::from_vec(predictions))
    }

    /// Predict for a single sample
    pub fn predict_one(&self, sample: &Array1<f64>) -> Result<f64> {
        let x = sample
            .clone()
            .into_shape_with_order((1, sample.len()))
            .map_err(AgrifertError::from)?;
        Ok(self.predict(&x)?[0])
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}
