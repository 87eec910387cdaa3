//! Lifted quadratic Bézier paths between two coordinates
//!
//! Attack vectors are drawn as arcs in raw degree space. The control point
//! sits above the chord midpoint, raised in latitude by a fraction of the
//! planar endpoint distance, so every arc bows northward whatever the
//! direction of travel. This is a visual arc, not a great-circle route.

use crate::core::{GeoPoint, CURVE_LIFT_FACTOR, DEFAULT_SAMPLE_COUNT};
use crate::validation::error::{MapError, MapResult};
use serde::Serialize;
use std::ops::Index;

/// Ordered sample points along one attack arc.
///
/// Holds `sample_count + 1` points when built by [`generate_curve`]; the
/// first is the source and the last the destination, bit for bit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurvePath {
    points: Vec<GeoPoint>,
}

impl CurvePath {
    /// Wrap an externally produced point sequence
    pub fn from_points(points: Vec<GeoPoint>) -> Self {
        Self { points }
    }

    /// An empty path; controllers given one stay idle
    pub fn empty() -> Self {
        Self { points: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&GeoPoint> {
        self.points.get(index)
    }

    pub fn first(&self) -> Option<&GeoPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&GeoPoint> {
        self.points.last()
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GeoPoint> {
        self.points.iter()
    }
}

impl Index<usize> for CurvePath {
    type Output = GeoPoint;

    fn index(&self, index: usize) -> &GeoPoint {
        &self.points[index]
    }
}

impl<'a> IntoIterator for &'a CurvePath {
    type Item = &'a GeoPoint;
    type IntoIter = std::slice::Iter<'a, GeoPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Control point of the arc: chord midpoint lifted in latitude only
pub fn control_point(from: GeoPoint, to: GeoPoint) -> GeoPoint {
    let lift = from.planar_distance(&to) * CURVE_LIFT_FACTOR;
    let mid = (from.to_vector() + to.to_vector()) / 2.0;
    GeoPoint::new(mid.x + lift, mid.y)
}

/// Sample the lifted arc from `from` to `to` at `sample_count + 1` points.
///
/// Point `i` is the quadratic Bézier evaluated at `t = i / sample_count`.
/// Returns [`MapError::InvalidArgument`] when `sample_count` is zero.
pub fn generate_curve(from: GeoPoint, to: GeoPoint, sample_count: usize) -> MapResult<CurvePath> {
    if sample_count == 0 {
        return Err(MapError::invalid_argument(
            "sample_count",
            sample_count,
            "must be a positive integer",
        ));
    }

    Ok(sample_curve(from, to, sample_count))
}

/// [`generate_curve`] with the default sample count of 80
pub fn generate_default_curve(from: GeoPoint, to: GeoPoint) -> CurvePath {
    sample_curve(from, to, DEFAULT_SAMPLE_COUNT)
}

// `sample_count` must be non-zero
fn sample_curve(from: GeoPoint, to: GeoPoint, sample_count: usize) -> CurvePath {
    if from == to {
        // Zero distance: the blend weights need not sum to exactly 1.0 in floating point
        return CurvePath {
            points: vec![from; sample_count + 1],
        };
    }

    let p0 = from.to_vector();
    let p1 = control_point(from, to).to_vector();
    let p2 = to.to_vector();

    let mut points = Vec::with_capacity(sample_count + 1);
    for i in 0..=sample_count {
        let t = i as f64 / sample_count as f64;
        let u = 1.0 - t;
        let point = p0 * (u * u) + p1 * (2.0 * u * t) + p2 * (t * t);
        points.push(GeoPoint::from_vector(point));
    }

    // Endpoints stay exact even when the control point is not finite
    points[0] = from;
    points[sample_count] = to;

    CurvePath { points }
}
