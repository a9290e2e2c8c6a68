//! Data preprocessing module
//!
//! Categorical label encoding for feeding text-valued features
//! (soil type, crop type, fertilizer name) into numeric models.

mod encoder;

pub use encoder::LabelEncoder;
