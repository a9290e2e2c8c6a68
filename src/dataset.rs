//! Training dataset loading and feature assembly

use crate::error::{AgrifertError, Result};
use ndarray::{Array1, Array2};
use polars::prelude::*;
use std::fs::File;

pub const COL_TEMPERATURE: &str = "Temperature";
pub const COL_HUMIDITY: &str = "Humidity";
pub const COL_MOISTURE: &str = "Moisture";
pub const COL_SOIL_TYPE: &str = "Soil Type";
pub const COL_CROP_TYPE: &str = "Crop Type";
pub const COL_NITROGEN: &str = "Nitrogen";
pub const COL_POTASSIUM: &str = "Potassium";
pub const COL_PHOSPHOROUS: &str = "Phosphorous";
pub const COL_FERTILIZER: &str = "Fertilizer_Name";

const REQUIRED_COLUMNS: [&str; 9] = [
    COL_TEMPERATURE,
    COL_HUMIDITY,
    COL_MOISTURE,
    COL_SOIL_TYPE,
    COL_CROP_TYPE,
    COL_NITROGEN,
    COL_POTASSIUM,
    COL_PHOSPHOROUS,
    COL_FERTILIZER,
];

/// The fertilizer training table.
///
/// Wraps a validated polars DataFrame and produces the feature matrix in
/// the fixed column order used at both fit and predict time:
/// `[temperature, humidity, moisture, soil_code, crop_code, nitrogen,
/// potassium, phosphorous]`.
#[derive(Debug, Clone)]
pub struct FertilizerDataset {
    df: DataFrame,
}

impl FertilizerDataset {
    /// Load the dataset from a CSV file
    pub fn from_csv(path: &str) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| AgrifertError::DataError(format!("cannot open '{path}': {e}")))?;

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(100))
            .into_reader_with_file_handle(file)
            .finish()
            .map_err(|e| AgrifertError::DataError(e.to_string()))?;

        Self::from_dataframe(df)
    }

    /// Validate and wrap an already-loaded DataFrame
    pub fn from_dataframe(df: DataFrame) -> Result<Self> {
        for col in REQUIRED_COLUMNS {
            if df.column(col).is_err() {
                return Err(AgrifertError::DataError(format!(
                    "missing required column '{col}'"
                )));
            }
        }
        if df.height() == 0 {
            return Err(AgrifertError::DataError("dataset is empty".to_string()));
        }
        Ok(Self { df })
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    /// A categorical column as a string Series
    pub fn str_column(&self, name: &str) -> Result<Series> {
        Ok(self.df.column(name)?.as_materialized_series().clone())
    }

    /// A numeric column as f64 values; nulls are rejected
    pub fn numeric_column(&self, name: &str) -> Result<Vec<f64>> {
        let series = self
            .df
            .column(name)?
            .as_materialized_series()
            .cast(&DataType::Float64)
            .map_err(|e| AgrifertError::DataError(e.to_string()))?;

        let ca = series
            .f64()
            .map_err(|e| AgrifertError::DataError(e.to_string()))?;

        ca.into_iter()
            .map(|v| {
                v.ok_or_else(|| {
                    AgrifertError::DataError(format!("null value in column '{name}'"))
                })
            })
            .collect()
    }

    /// Assemble the feature matrix from the numeric columns plus the
    /// pre-encoded soil and crop codes, in the fixed field order.
    pub fn feature_matrix(&self, soil_codes: &[f64], crop_codes: &[f64]) -> Result<Array2<f64>> {
        let n = self.height();
        if soil_codes.len() != n || crop_codes.len() != n {
            return Err(AgrifertError::ShapeError {
                expected: format!("{n} codes"),
                actual: format!("{} soil / {} crop", soil_codes.len(), crop_codes.len()),
            });
        }

        let temperature = self.numeric_column(COL_TEMPERATURE)?;
        let humidity = self.numeric_column(COL_HUMIDITY)?;
        let moisture = self.numeric_column(COL_MOISTURE)?;
        let nitrogen = self.numeric_column(COL_NITROGEN)?;
        let potassium = self.numeric_column(COL_POTASSIUM)?;
        let phosphorous = self.numeric_column(COL_PHOSPHOROUS)?;

        let mut data = Vec::with_capacity(n * 8);
        for i in 0..n {
            data.extend_from_slice(&[
                temperature[i],
                humidity[i],
                moisture[i],
                soil_codes[i],
                crop_codes[i],
                nitrogen[i],
                potassium[i],
                phosphorous[i],
            ]);
        }

        Ok(Array2::from_shape_vec((n, 8), data)?)
    }

    /// Regression target: per-row sum of the three nutrient columns
    pub fn total_nutrient(&self) -> Result<Array1<f64>> {
        let nitrogen = self.numeric_column(COL_NITROGEN)?;
        let potassium = self.numeric_column(COL_POTASSIUM)?;
        let phosphorous = self.numeric_column(COL_PHOSPHOROUS)?;

        Ok(Array1::from_iter(
            nitrogen
                .iter()
                .zip(&potassium)
                .zip(&phosphorous)
                .map(|((n, k), p)| n + k + p),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_df() -> DataFrame {
        df!(
            COL_TEMPERATURE => &[26.0, 29.0, 34.0],
            COL_HUMIDITY => &[52.0, 58.0, 65.0],
            COL_MOISTURE => &[38.0, 45.0, 62.0],
            COL_SOIL_TYPE => &["Sandy", "Loamy", "Black"],
            COL_CROP_TYPE => &["Maize", "Sugarcane", "Cotton"],
            COL_NITROGEN => &[37.0, 12.0, 7.0],
            COL_POTASSIUM => &[0.0, 0.0, 9.0],
            COL_PHOSPHOROUS => &[0.0, 36.0, 30.0],
            COL_FERTILIZER => &["Urea", "DAP", "14-35-14"]
        )
        .unwrap()
    }

    #[test]
    fn test_from_csv() {
        use std::io::Write;

        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(
            file,
            "Temperature,Humidity,Moisture,Soil Type,Crop Type,Nitrogen,Potassium,Phosphorous,Fertilizer_Name"
        )
        .unwrap();
        writeln!(file, "26,52,38,Sandy,Maize,37,0,0,Urea").unwrap();
        writeln!(file, "29,58,45,Loamy,Sugarcane,12,0,36,DAP").unwrap();

        let ds = FertilizerDataset::from_csv(file.path().to_str().unwrap()).unwrap();
        assert_eq!(ds.height(), 2);
        assert_eq!(ds.total_nutrient().unwrap().to_vec(), vec![37.0, 48.0]);
    }

    #[test]
    fn test_from_dataframe_validates_columns() {
        let df = df!("Temperature" => &[26.0]).unwrap();
        let err = FertilizerDataset::from_dataframe(df).unwrap_err();
        assert!(matches!(err, AgrifertError::DataError(_)));
    }

    #[test]
    fn test_total_nutrient() {
        let ds = FertilizerDataset::from_dataframe(sample_df()).unwrap();
        let total = ds.total_nutrient().unwrap();
        assert_eq!(total.to_vec(), vec![37.0, 48.0, 46.0]);
    }

    #[test]
    fn test_feature_matrix_order() {
        let ds = FertilizerDataset::from_dataframe(sample_df()).unwrap();
        let x = ds
            .feature_matrix(&[0.0, 1.0, 2.0], &[0.0, 1.0, 2.0])
            .unwrap();

        assert_eq!(x.nrows(), 3);
        assert_eq!(x.ncols(), 8);
        // Row 1: temp, humidity, moisture, soil, crop, N, K, P
        assert_eq!(
            x.row(1).to_vec(),
            vec![29.0, 58.0, 45.0, 1.0, 1.0, 12.0, 0.0, 36.0]
        );
    }

    #[test]
    fn test_feature_matrix_code_length_mismatch() {
        let ds = FertilizerDataset::from_dataframe(sample_df()).unwrap();
        assert!(ds.feature_matrix(&[0.0], &[0.0, 1.0, 2.0]).is_err());
    }
}
