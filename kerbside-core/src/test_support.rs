//! Deterministic doubles and layer builders used by unit and behaviour
//! tests.
#![expect(
    clippy::float_arithmetic,
    reason = "metre offsets are converted to degrees"
)]

use std::sync::atomic::{AtomicUsize, Ordering};

use geo::{Coord, Geometry, LineString, Point, Polygon};

use crate::geometry::METRES_PER_DEGREE;
use crate::safety::{FeatureMatrix, SafetyScoreError, SafetyScorer};
use crate::{Feature, Route};

/// `SafetyScorer` returning a fixed value and counting its calls.
#[derive(Debug, Default)]
pub struct FixedSafetyScorer {
    value: f64,
    calls: AtomicUsize,
}

impl FixedSafetyScorer {
    /// Create a scorer that always returns `value`.
    #[must_use]
    pub const fn new(value: f64) -> Self {
        Self {
            value,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times the scorer was consulted.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl SafetyScorer for FixedSafetyScorer {
    fn score_route(&self, matrix: &FeatureMatrix, _is_night: bool) -> Result<f64, SafetyScoreError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if matrix.is_empty() {
            return Err(SafetyScoreError::EmptyMatrix);
        }
        Ok(self.value)
    }
}

/// `SafetyScorer` that always fails as if the service were unreachable.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingSafetyScorer;

impl SafetyScorer for FailingSafetyScorer {
    fn score_route(&self, _matrix: &FeatureMatrix, _is_night: bool) -> Result<f64, SafetyScoreError> {
        Err(SafetyScoreError::NetworkError {
            url: "http://scorer.invalid/predict_route_safety".to_owned(),
            message: "connection refused".to_owned(),
        })
    }
}

/// Move `coord` north by `metres`.
#[must_use]
pub fn offset_north(coord: Coord<f64>, metres: f64) -> Coord<f64> {
    Coord {
        x: coord.x,
        y: coord.y + metres / METRES_PER_DEGREE,
    }
}

/// Move `coord` east by `metres` at its own latitude.
#[must_use]
pub fn offset_east(coord: Coord<f64>, metres: f64) -> Coord<f64> {
    let scale = coord.y.to_radians().cos() * METRES_PER_DEGREE;
    Coord {
        x: coord.x + metres / scale,
        y: coord.y,
    }
}

/// A feature with a point geometry at `coord`.
#[must_use]
pub fn point_feature(coord: Coord<f64>) -> Feature {
    Feature::new(Geometry::Point(Point::from(coord)))
}

/// A feature with a line geometry through `coords`.
#[must_use]
pub fn line_feature(coords: Vec<Coord<f64>>) -> Feature {
    Feature::new(Geometry::LineString(LineString::new(coords)))
}

/// A feature with a square polygon centred on `centre`.
#[must_use]
pub fn square_feature(centre: Coord<f64>, half_side_m: f64) -> Feature {
    let south_west = offset_east(offset_north(centre, -half_side_m), -half_side_m);
    let north_east = offset_east(offset_north(centre, half_side_m), half_side_m);
    let ring = vec![
        south_west,
        Coord {
            x: north_east.x,
            y: south_west.y,
        },
        north_east,
        Coord {
            x: south_west.x,
            y: north_east.y,
        },
    ];
    Feature::new(Geometry::Polygon(Polygon::new(LineString::new(ring), vec![])))
}

/// A straight route heading north from `start` with points `spacing_m`
/// apart.
#[must_use]
pub fn northbound_route(start: Coord<f64>, points: u32, spacing_m: f64) -> Route {
    Route::new(
        (0..points)
            .map(|step| offset_north(start, f64::from(step) * spacing_m))
            .collect(),
    )
}
