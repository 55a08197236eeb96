//! Application layer: Use cases and services.
//!
//! Orchestrates domain logic with the model port to implement the
//! prediction pipeline.

mod prediction;

pub use prediction::PredictionService;
