//! The single proximity test shared by every layer rule.

use geo::{Geometry, Point};
use log::trace;

use crate::Feature;
use crate::geometry::{
    distance, distance_to_line, distance_to_multi_line, point_in_multi_polygon, point_in_polygon,
};

/// Report whether `feature` is within `tolerance_m` metres of `point`.
///
/// Points and lines are compared by distance. Polygons are tested for
/// containment and ignore the tolerance. Missing geometry and geometry
/// kinds outside the six supported ones are never near.
///
/// # Examples
/// ```
/// use geo::{Geometry, Point};
/// use kerbside_core::{Feature, is_near};
///
/// let lamp = Feature::new(Geometry::Point(Point::new(0.0, 0.00005)));
/// assert!(is_near(Point::new(0.0, 0.0), &lamp, 10.0));
/// assert!(!is_near(Point::new(0.0, 0.0), &lamp, 5.0));
/// ```
#[must_use]
pub fn is_near(point: Point<f64>, feature: &Feature, tolerance_m: f64) -> bool {
    let Some(geometry) = feature.geometry.as_ref() else {
        return false;
    };
    let within = |metres: f64| metres <= tolerance_m;
    match geometry {
        Geometry::Point(other) => within(distance(point, *other)),
        Geometry::MultiPoint(points) => points.iter().any(|other| within(distance(point, *other))),
        Geometry::LineString(line) => distance_to_line(point, line).is_some_and(within),
        Geometry::MultiLineString(lines) => distance_to_multi_line(point, lines).is_some_and(within),
        Geometry::Polygon(polygon) => point_in_polygon(point, polygon),
        Geometry::MultiPolygon(polygons) => point_in_multi_polygon(point, polygons),
        Geometry::Line(_)
        | Geometry::Rect(_)
        | Geometry::Triangle(_)
        | Geometry::GeometryCollection(_) => {
            trace!("ignoring unsupported geometry kind during proximity test");
            false
        }
    }
}

/// Count the features in `candidates` near `point`.
#[must_use]
pub fn count_near(point: Point<f64>, candidates: &[&Feature], tolerance_m: f64) -> u32 {
    let count = candidates
        .iter()
        .filter(|feature| is_near(point, feature, tolerance_m))
        .count();
    u32::try_from(count).unwrap_or(u32::MAX)
}
