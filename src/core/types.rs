//! Core data types for the threat map

use nalgebra::Vector2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Geographic coordinate in degrees.
///
/// No range checks are applied: values outside [-90, 90] / [-180, 180]
/// pass through untouched, since curves are drawn in raw degree space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Both components are finite numbers
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Planar distance in degree space (not geodesic)
    pub fn planar_distance(&self, other: &GeoPoint) -> f64 {
        (self.to_vector() - other.to_vector()).norm()
    }

    pub(crate) fn to_vector(self) -> Vector2<f64> {
        Vector2::new(self.lat, self.lon)
    }

    pub(crate) fn from_vector(v: Vector2<f64>) -> Self {
        Self { lat: v.x, lon: v.y }
    }
}

impl From<(f64, f64)> for GeoPoint {
    fn from((lat, lon): (f64, f64)) -> Self {
        GeoPoint::new(lat, lon)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lon)
    }
}

/// Identifier of a threat event as assigned by the backend
pub type ThreatId = u64;
