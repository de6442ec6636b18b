//! Procedural scene generation.
//!
//! Everything here runs once at startup and produces plain geometry
//! descriptors; the simulation layer turns them into live scene entities.

pub mod ring_layout;
pub mod star_field;

pub use ring_layout::{ring_layout, RingInterval};
pub use star_field::{star_field, StarPoint};

/// Rejected construction parameters. Generation never produces degenerate
/// geometry; bad inputs are turned back at the boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GenerationError {
    #[error("ring gap must be positive, got {0}")]
    NonPositiveGap(f32),
    #[error("minimum ring distance must be positive, got {0}")]
    NonPositiveMin(f32),
    #[error("distance bounds inverted: min {min} >= max {max}")]
    InvertedBounds { min: f32, max: f32 },
    #[error("star shell bounds invalid: inner {inner}, outer {outer}")]
    InvalidShell { inner: f32, outer: f32 },
}
