//! Colour vision simulation module
//!
//! Projects every pixel's RGB through a 3x3 matrix. Used to preview how an
//! image appears with a given colour vision deficiency.

mod engine;
mod matrix;
mod modes;

pub use engine::{simulate, transform, transform_cancellable};
pub use matrix::ColorTransformMatrix;
pub use modes::SimulationMode;
