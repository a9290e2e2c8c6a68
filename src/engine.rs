//! Recommendation engine
//!
//! Holds the fitted encoders and models as immutable values, constructed
//! once at startup and shared by the serving layer. Each call to
//! [`Recommender::recommend`] is independent and stateless.

use crate::dataset::{FertilizerDataset, COL_CROP_TYPE, COL_FERTILIZER, COL_SOIL_TYPE};
use crate::error::{AgrifertError, Result};
use crate::npk::{decompose_npk, NpkSplit};
use crate::preprocessing::LabelEncoder;
use crate::training::RandomForest;
use ndarray::Array1;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Number of trees per forest, matching the reference configuration
pub const DEFAULT_N_ESTIMATORS: usize = 100;
/// Fixed seed so that a given dataset always yields the same models
pub const DEFAULT_RANDOM_STATE: u64 = 42;

/// Raw per-request inputs supplied by the UI boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendRequest {
    pub temperature: f64,
    pub humidity: f64,
    pub moisture: f64,
    pub soil_type: String,
    pub crop_type: String,
    pub nitrogen: f64,
    pub potassium: f64,
    pub phosphorous: f64,
    pub land_area: f64,
}

/// Advice relative to the current nutrient total
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "amount")]
pub enum Suggestion {
    Reduce(f64),
    Increase(f64),
    Optimal,
}

impl Suggestion {
    /// Compare the recommended per-area amount against the current
    /// nutrient total (`nitrogen + potassium + phosphorous`).
    pub fn from_amounts(recommended: f64, current_total: f64) -> Self {
        if recommended < current_total {
            Suggestion::Reduce(current_total - recommended)
        } else if recommended > current_total {
            Suggestion::Increase(recommended - current_total)
        } else {
            Suggestion::Optimal
        }
    }
}

impl std::fmt::Display for Suggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Suggestion::Reduce(amount) => {
                write!(f, "Reduce total fertilizer by {amount:.2} units")
            }
            Suggestion::Increase(amount) => {
                write!(f, "Increase total fertilizer by {amount:.2} units")
            }
            Suggestion::Optimal => write!(f, "Current fertilizer amount is optimal"),
        }
    }
}

/// The full recommendation produced for one request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    /// Predicted fertilizer name, always one of the fit-time labels
    pub fertilizer: String,
    /// Predicted total nutrient amount (training-target units)
    pub total_amount: f64,
    /// `total_amount / land_area`; not clamped, may be zero or negative
    /// when the regressor extrapolates
    pub optimized_amount: f64,
    /// Proportional N/P/K split of `optimized_amount`, when the
    /// fertilizer name carries a parseable ratio
    pub npk: Option<NpkSplit>,
    pub suggestion: Suggestion,
    /// Set to the substituted label when the requested crop type was
    /// unknown and the first fit-time class was used instead
    pub crop_fallback: Option<String>,
}

/// Fitted encoders and models for fertilizer recommendation
#[derive(Debug, Clone)]
pub struct Recommender {
    soil_encoder: LabelEncoder,
    crop_encoder: LabelEncoder,
    fertilizer_encoder: LabelEncoder,
    classifier: RandomForest,
    regressor: RandomForest,
}

impl Recommender {
    /// Fit encoders and both models on the training dataset with the
    /// default forest configuration.
    pub fn fit(dataset: &FertilizerDataset) -> Result<Self> {
        Self::fit_with(dataset, DEFAULT_N_ESTIMATORS, DEFAULT_RANDOM_STATE)
    }

    /// Fit with an explicit tree count and seed
    pub fn fit_with(
        dataset: &FertilizerDataset,
        n_estimators: usize,
        random_state: u64,
    ) -> Result<Self> {
        let mut soil_encoder = LabelEncoder::new();
        let mut crop_encoder = LabelEncoder::new();
        let mut fertilizer_encoder = LabelEncoder::new();

        let soil_series = dataset.str_column(COL_SOIL_TYPE)?;
        let crop_series = dataset.str_column(COL_CROP_TYPE)?;
        let fertilizer_series = dataset.str_column(COL_FERTILIZER)?;

        soil_encoder.fit(&soil_series)?;
        crop_encoder.fit(&crop_series)?;
        fertilizer_encoder.fit(&fertilizer_series)?;

        let soil_codes = soil_encoder.encode_series(COL_SOIL_TYPE, &soil_series)?;
        let crop_codes = crop_encoder.encode_series(COL_CROP_TYPE, &crop_series)?;
        let fertilizer_codes = Array1::from_vec(
            fertilizer_encoder.encode_series(COL_FERTILIZER, &fertilizer_series)?,
        );

        let x = dataset.feature_matrix(&soil_codes, &crop_codes)?;
        let y_amount = dataset.total_nutrient()?;

        let mut classifier =
            RandomForest::classifier(n_estimators).with_random_state(random_state);
        classifier.fit(&x, &fertilizer_codes)?;

        let mut regressor =
            RandomForest::regressor(n_estimators).with_random_state(random_state);
        regressor.fit(&x, &y_amount)?;

        info!(
            rows = dataset.height(),
            soil_types = soil_encoder.n_classes(),
            crop_types = crop_encoder.n_classes(),
            fertilizers = fertilizer_encoder.n_classes(),
            n_estimators,
            "Recommender fitted"
        );

        Ok(Self {
            soil_encoder,
            crop_encoder,
            fertilizer_encoder,
            classifier,
            regressor,
        })
    }

    /// Produce a recommendation for one request.
    ///
    /// Fails with `UnknownCategory` for an unrecognized soil type and with
    /// `InvalidInput` for a non-positive land area. An unrecognized crop
    /// type is non-fatal: the first fit-time crop class is substituted and
    /// reported in `crop_fallback`.
    pub fn recommend(&self, request: &RecommendRequest) -> Result<Recommendation> {
        if request.land_area <= 0.0 {
            return Err(AgrifertError::InvalidInput(format!(
                "land area must be positive, got {}",
                request.land_area
            )));
        }

        let soil_code = self.soil_encoder.encode("soil type", &request.soil_type)?;

        let (crop_code, crop_fallback) = if self.crop_encoder.contains(&request.crop_type) {
            (
                self.crop_encoder.encode("crop type", &request.crop_type)?,
                None,
            )
        } else {
            let fallback = self.crop_encoder.classes()[0].clone();
            warn!(
                requested = %request.crop_type,
                substituted = %fallback,
                "Unrecognized crop type, defaulting to the first known crop"
            );
            (0, Some(fallback))
        };

        // Field order must match the fit-time feature matrix
        let features = Array1::from_vec(vec![
            request.temperature,
            request.humidity,
            request.moisture,
            soil_code as f64,
            crop_code as f64,
            request.nitrogen,
            request.potassium,
            request.phosphorous,
        ]);

        let fertilizer_code = self.classifier.predict_one(&features)?;
        let fertilizer = self
            .fertilizer_encoder
            .decode("fertilizer", fertilizer_code.round() as usize)?
            .to_string();

        let total_amount = self.regressor.predict_one(&features)?;
        let optimized_amount = total_amount / request.land_area;

        let npk = decompose_npk(&fertilizer, optimized_amount)?;

        let current_total = request.nitrogen + request.potassium + request.phosphorous;
        let suggestion = Suggestion::from_amounts(optimized_amount, current_total);

        Ok(Recommendation {
            fertilizer,
            total_amount,
            optimized_amount,
            npk,
            suggestion,
            crop_fallback,
        })
    }

    /// Soil type labels known at fit time
    pub fn soil_types(&self) -> &[String] {
        self.soil_encoder.classes()
    }

    /// Crop type labels known at fit time
    pub fn crop_types(&self) -> &[String] {
        self.crop_encoder.classes()
    }

    /// Fertilizer labels known at fit time
    pub fn fertilizer_names(&self) -> &[String] {
        self.fertilizer_encoder.classes()
    }
}
