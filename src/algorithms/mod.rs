//! Pure geometry and styling functions for attack vectors

pub mod curve;
pub mod color;

pub use curve::{control_point, generate_curve, generate_default_curve, CurvePath};
pub use color::{resolve_color, AttackColor, FALLBACK_COLOR};
