//! Candidate walking routes.
//!
//! Routes come from an external routing service together with its distance
//! and duration summary, which the engine carries through untouched.

use geo::{Coord, Point};
use serde::{Deserialize, Serialize};

/// An ordered walking path from origin (index 0) to destination.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use kerbside_core::Route;
///
/// let route = Route::new(vec![Coord { x: -122.33, y: 47.60 }, Coord { x: -122.34, y: 47.61 }])
///     .with_summary(1_250.0, 900.0);
///
/// assert_eq!(route.len(), 2);
/// assert!(route.is_analysable());
/// assert_eq!(route.distance_m, Some(1_250.0));
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Route {
    /// Route points in travel order; `x` is longitude and `y` latitude.
    pub points: Vec<Coord<f64>>,
    /// Distance reported by the routing service, in metres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_m: Option<f64>,
    /// Duration reported by the routing service, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_s: Option<f64>,
}

impl Route {
    /// Construct a route from its points.
    #[must_use]
    pub const fn new(points: Vec<Coord<f64>>) -> Self {
        Self {
            points,
            distance_m: None,
            duration_s: None,
        }
    }

    /// Attach the routing service's distance and duration summary.
    #[must_use]
    pub const fn with_summary(mut self, distance_m: f64, duration_s: f64) -> Self {
        self.distance_m = Some(distance_m);
        self.duration_s = Some(duration_s);
        self
    }

    /// Number of points on the route.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.points.len()
    }

    /// Report whether the route has no points.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Report whether the route has the origin and destination needed for
    /// analysis.
    #[must_use]
    pub const fn is_analysable(&self) -> bool {
        self.points.len() >= 2
    }

    /// Iterate over the route points as `geo` points.
    pub fn iter_points(&self) -> impl Iterator<Item = Point<f64>> + '_ {
        self.points.iter().copied().map(Point::from)
    }
}

impl From<Vec<Coord<f64>>> for Route {
    fn from(points: Vec<Coord<f64>>) -> Self {
        Self::new(points)
    }
}
