//! NPK ratio parsing and decomposition

use crate::error::{AgrifertError, Result};
use serde::{Deserialize, Serialize};

/// An N-P-K ratio parsed from a fertilizer name such as `"10-26-26"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpkRatio {
    pub nitrogen: u32,
    pub phosphorous: u32,
    pub potassium: u32,
}

/// A total amount decomposed proportionally to an [`NpkRatio`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NpkSplit {
    pub nitrogen: f64,
    pub phosphorous: f64,
    pub potassium: f64,
}

impl NpkRatio {
    /// Parse a fertilizer name of the form `"N-P-K"`.
    ///
    /// Returns `None` unless splitting on `-` yields exactly three
    /// integer-parseable tokens. Names without that structure (e.g.
    /// `"Urea"`, `"DAP"`) carry no ratio, which is a valid state, not an
    /// error. This is a data-dependent convention of the fertilizer
    /// naming scheme, not a general parser.
    pub fn parse(name: &str) -> Option<Self> {
        if !name.contains('-') {
            return None;
        }

        let parts: Vec<&str> = name.split('-').collect();
        if parts.len() != 3 {
            return None;
        }

        let mut values = [0u32; 3];
        for (slot, part) in values.iter_mut().zip(&parts) {
            *slot = part.trim().parse().ok()?;
        }

        Some(Self {
            nitrogen: values[0],
            phosphorous: values[1],
            potassium: values[2],
        })
    }

    pub fn total(&self) -> u32 {
        self.nitrogen + self.phosphorous + self.potassium
    }

    /// Split `total_amount` proportionally to the ratio.
    ///
    /// The parts sum back to `total_amount` up to floating-point rounding.
    pub fn decompose(&self, total_amount: f64) -> Result<NpkSplit> {
        let total_ratio = self.total();
        if total_ratio == 0 {
            return Err(AgrifertError::InvalidInput(
                "NPK ratio sums to zero, cannot decompose".to_string(),
            ));
        }

        let total_ratio = total_ratio as f64;
        Ok(NpkSplit {
            nitrogen: self.nitrogen as f64 / total_ratio * total_amount,
            phosphorous: self.phosphorous as f64 / total_ratio * total_amount,
            potassium: self.potassium as f64 / total_ratio * total_amount,
        })
    }
}

/// Decompose `total_amount` according to the ratio in `fertilizer_name`.
///
/// `Ok(None)` when the name carries no parseable ratio (not applicable);
/// `InvalidInput` when the ratio sums to zero.
pub fn decompose_npk(fertilizer_name: &str, total_amount: f64) -> Result<Option<NpkSplit>> {
    match NpkRatio::parse(fertilizer_name) {
        Some(ratio) => Ok(Some(ratio.decompose(total_amount)?)),
        None => Ok(None),
    }
}
