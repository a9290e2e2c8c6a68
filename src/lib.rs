//! agrifert - Fertilizer recommendation engine
//!
//! Recommends a fertilizer type and quantity for a farm from environmental
//! readings, soil and crop type, current nutrient levels, and land area.
//! Encoders and tree-ensemble models are fitted once at startup from a
//! training CSV and held read-only for the process lifetime.
//!
//! # Modules
//!
//! - [`dataset`] - training table loading and feature assembly
//! - [`preprocessing`] - categorical label encoding
//! - [`training`] - decision tree and random forest models
//! - [`engine`] - the recommendation engine
//! - [`npk`] - NPK ratio parsing and decomposition
//! - [`server`] - REST API serving layer
//! - [`cli`] - command-line interface

pub mod error;

pub mod dataset;
pub mod engine;
pub mod npk;
pub mod preprocessing;
pub mod training;

pub mod cli;
pub mod server;

pub use error::{AgrifertError, Result};
