//! Categorical label encoding

use crate::error::{AgrifertError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Bidirectional mapping between string labels and dense integer codes.
///
/// Codes are assigned in first-seen order at fit time. For any label or code
/// present at fit time, `encode` and `decode` are inverses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoder {
    // Labels in code order; classes[code] is the label for that code.
    classes: Vec<String>,
    // label -> code
    mapping: HashMap<String, usize>,
    is_fitted: bool,
}

impl Default for LabelEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelEncoder {
    /// Create a new, unfitted encoder
    pub fn new() -> Self {
        Self {
            classes: Vec::new(),
            mapping: HashMap::new(),
            is_fitted: false,
        }
    }

    /// Fit the encoder on a polars string column
    pub fn fit(&mut self, series: &Series) -> Result<&mut Self> {
        let ca = series
            .str()
            .map_err(|e| AgrifertError::DataError(e.to_string()))?;

        self.classes.clear();
        self.mapping.clear();

        for val in ca.into_iter().flatten() {
            if !self.mapping.contains_key(val) {
                self.mapping.insert(val.to_string(), self.classes.len());
                self.classes.push(val.to_string());
            }
        }

        self.is_fitted = true;
        Ok(self)
    }

    /// Fit the encoder on a slice of labels
    pub fn fit_labels<S: AsRef<str>>(&mut self, labels: &[S]) -> &mut Self {
        self.classes.clear();
        self.mapping.clear();

        for label in labels {
            let label = label.as_ref();
            if !self.mapping.contains_key(label) {
                self.mapping.insert(label.to_string(), self.classes.len());
                self.classes.push(label.to_string());
            }
        }

        self.is_fitted = true;
        self
    }

    /// Encode a label to its integer code
    pub fn encode(&self, column: &str, label: &str) -> Result<usize> {
        if !self.is_fitted {
            return Err(AgrifertError::ModelNotFitted);
        }
        self.mapping
            .get(label)
            .copied()
            .ok_or_else(|| AgrifertError::UnknownCategory {
                column: column.to_string(),
                value: label.to_string(),
            })
    }

    /// Decode an integer code back to its label
    pub fn decode(&self, column: &str, code: usize) -> Result<&str> {
        if !self.is_fitted {
            return Err(AgrifertError::ModelNotFitted);
        }
        self.classes
            .get(code)
            .map(|s| s.as_str())
            .ok_or_else(|| AgrifertError::UnknownCategory {
                column: column.to_string(),
                value: format!("code {code}"),
            })
    }

    /// Encode an entire string column into codes, fit-time labels only
    pub fn encode_series(&self, column: &str, series: &Series) -> Result<Vec<f64>> {
        let ca = series
            .str()
            .map_err(|e| AgrifertError::DataError(e.to_string()))?;

        ca.into_iter()
            .map(|v| match v {
                Some(label) => self.encode(column, label).map(|c| c as f64),
                None => Err(AgrifertError::DataError(format!(
                    "null value in column '{column}'"
                ))),
            })
            .collect()
    }

    /// The fit-time label set, in code order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Whether a label was seen at fit time
    pub fn contains(&self, label: &str) -> bool {
        self.mapping.contains_key(label)
    }

    /// Number of distinct labels seen at fit time
    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }
}
