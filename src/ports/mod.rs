//! Ports layer: Trait definitions for external collaborators.
//!
//! Following Hexagonal Architecture, these traits define the boundary
//! between the scoring pipeline and the externally-trained models.

mod model;

pub use model::{ModelError, RiskModel};
