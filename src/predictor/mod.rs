//! Client side of the external prediction service
//!
//! The predictor answers `GET /predict` with
//! `{ "prediction": "Normal" | "Abnormal", "latest_values": [number, ...] }`.
//! Anything else is treated as a malformed reading and skipped by the checker.

pub mod client;
pub mod reading;

pub use client::{HttpPredictor, PredictionSource, PredictorError};
pub use reading::{Malformed, PredictionReading};
