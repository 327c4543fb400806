//! Distance and containment predicates over WGS84 coordinates.
//!
//! Coordinates follow the `geo` convention: `x` is longitude and `y` is
//! latitude, both in decimal degrees. Distances are returned in metres.
//! Degenerate inputs never panic: they yield `None` or `false` and are
//! treated as "not near" by callers.
#![expect(
    clippy::float_arithmetic,
    reason = "metric conversions require floating point maths"
)]

use geo::{Coord, Distance, Euclidean, Haversine, Intersects, LineString, MultiLineString};
use geo::{MultiPolygon, Point, Polygon};

/// Mean Earth radius in metres, matching the radius used by `geo`'s
/// haversine implementation.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Metres spanned by one degree of latitude on the mean sphere.
pub const METRES_PER_DEGREE: f64 = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;

/// Great-circle distance between two points in metres.
///
/// # Examples
/// ```
/// use geo::Point;
/// use kerbside_core::geometry::distance;
///
/// let a = Point::new(-122.335, 47.608);
/// let b = Point::new(-122.335, 47.609);
/// let metres = distance(a, b);
/// assert!((metres - 111.2).abs() < 0.5);
/// ```
#[must_use]
pub fn distance(a: Point<f64>, b: Point<f64>) -> f64 {
    Haversine.distance(a, b)
}

/// Project `coord` onto a local tangent plane centred on `origin`.
///
/// The equirectangular projection is calibrated at the origin latitude and
/// keeps sub-metre accuracy over the tens of metres the engine inspects.
fn project(origin: Point<f64>, coord: Coord<f64>) -> Coord<f64> {
    let scale_x = origin.y().to_radians().cos() * METRES_PER_DEGREE;
    Coord {
        x: (coord.x - origin.x()) * scale_x,
        y: (coord.y - origin.y()) * METRES_PER_DEGREE,
    }
}

/// Minimum distance in metres from `point` to any segment of `line`.
///
/// Returns `None` for lines with fewer than two distinct vertices, which
/// have no defined segment to measure against.
///
/// # Examples
/// ```
/// use geo::{LineString, Point};
/// use kerbside_core::geometry::distance_to_line;
///
/// let line = LineString::from(vec![(0.0, 0.0), (0.0, 0.001)]);
/// let off = Point::new(0.0001, 0.0005);
/// let metres = distance_to_line(off, &line).expect("line has a segment");
/// assert!((metres - 11.1).abs() < 0.5);
///
/// let stub = LineString::from(vec![(0.0, 0.0), (0.0, 0.0)]);
/// assert_eq!(distance_to_line(off, &stub), None);
/// ```
#[must_use]
pub fn distance_to_line(point: Point<f64>, line: &LineString<f64>) -> Option<f64> {
    let first = line.0.first()?;
    if line.0.iter().all(|coord| coord == first) {
        return None;
    }
    let projected: LineString<f64> = line.0.iter().map(|coord| project(point, *coord)).collect();
    let origin = Point::new(0.0, 0.0);
    Some(Euclidean.distance(&origin, &projected))
}

/// Minimum distance in metres from `point` to any part of `lines`.
///
/// Degenerate parts are skipped; `None` is returned when no part has a
/// measurable segment.
#[must_use]
pub fn distance_to_multi_line(point: Point<f64>, lines: &MultiLineString<f64>) -> Option<f64> {
    lines
        .iter()
        .filter_map(|line| distance_to_line(point, line))
        .min_by(f64::total_cmp)
}

/// Report whether `point` lies inside `polygon` or on its boundary.
///
/// Points inside a hole are outside. Polygons whose exterior has fewer
/// than three distinct vertices contain nothing.
///
/// # Examples
/// ```
/// use geo::{Point, Polygon, LineString};
/// use kerbside_core::geometry::point_in_polygon;
///
/// let square = Polygon::new(
///     LineString::from(vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]),
///     vec![],
/// );
/// assert!(point_in_polygon(Point::new(0.5, 0.5), &square));
/// assert!(!point_in_polygon(Point::new(1.5, 0.5), &square));
/// ```
#[must_use]
pub fn point_in_polygon(point: Point<f64>, polygon: &Polygon<f64>) -> bool {
    if distinct_vertices(polygon.exterior()) < 3 {
        return false;
    }
    polygon.intersects(&point)
}

/// Report whether any constituent polygon contains `point`.
#[must_use]
pub fn point_in_multi_polygon(point: Point<f64>, polygons: &MultiPolygon<f64>) -> bool {
    polygons
        .iter()
        .any(|polygon| point_in_polygon(point, polygon))
}

fn distinct_vertices(ring: &LineString<f64>) -> usize {
    let mut seen: Vec<&Coord<f64>> = Vec::with_capacity(ring.0.len());
    for coord in &ring.0 {
        if !seen.contains(&coord) {
            seen.push(coord);
        }
    }
    seen.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn square_with_hole() -> Polygon<f64> {
        Polygon::new(
            LineString::from(vec![(0.0, 0.0), (0.001, 0.0), (0.001, 0.001), (0.0, 0.001)]),
            vec![LineString::from(vec![
                (0.0004, 0.0004),
                (0.0006, 0.0004),
                (0.0006, 0.0006),
                (0.0004, 0.0006),
            ])],
        )
    }

    #[rstest]
    fn distance_is_nonzero_for_small_offsets() {
        let a = Point::new(-122.3321, 47.6062);
        let b = Point::new(-122.3321, 47.60621);
        let metres = distance(a, b);
        assert!(metres > 1.0 && metres < 1.2, "got {metres}");
    }

    #[rstest]
    fn line_distance_matches_haversine_for_perpendicular_offset() {
        let line = LineString::from(vec![(-122.3330, 47.6062), (-122.3310, 47.6062)]);
        let point = Point::new(-122.3320, 47.60623);
        let via_line = distance_to_line(point, &line).expect("segment exists");
        let direct = distance(point, Point::new(-122.3320, 47.6062));
        assert!((via_line - direct).abs() < 0.1, "{via_line} vs {direct}");
    }

    #[rstest]
    fn line_distance_clamps_to_endpoints() {
        let line = LineString::from(vec![(0.0, 0.0), (0.0, 0.001)]);
        let beyond = Point::new(0.0, 0.0011);
        let metres = distance_to_line(beyond, &line).expect("segment exists");
        assert!((metres - 11.1).abs() < 0.2, "got {metres}");
    }

    #[rstest]
    #[case(LineString::from(Vec::<(f64, f64)>::new()))]
    #[case(LineString::from(vec![(1.0, 1.0)]))]
    #[case(LineString::from(vec![(1.0, 1.0), (1.0, 1.0), (1.0, 1.0)]))]
    fn degenerate_lines_have_no_distance(#[case] line: LineString<f64>) {
        assert_eq!(distance_to_line(Point::new(1.0, 1.0), &line), None);
    }

    #[rstest]
    fn multi_line_takes_the_nearest_part() {
        let lines = MultiLineString::new(vec![
            LineString::from(vec![(0.0, 0.01), (0.001, 0.01)]),
            LineString::from(vec![(0.0, 0.0001), (0.001, 0.0001)]),
            LineString::from(vec![(5.0, 5.0), (5.0, 5.0)]),
        ]);
        let metres = distance_to_multi_line(Point::new(0.0005, 0.0), &lines).expect("parts exist");
        assert!((metres - 11.1).abs() < 0.2, "got {metres}");
    }

    #[rstest]
    #[case(Point::new(0.0002, 0.0002), true)]
    #[case(Point::new(0.0005, 0.0005), false)]
    #[case(Point::new(0.0, 0.0005), true)]
    #[case(Point::new(0.002, 0.0005), false)]
    fn polygon_containment_respects_holes_and_boundary(
        #[case] point: Point<f64>,
        #[case] expected: bool,
    ) {
        assert_eq!(point_in_polygon(point, &square_with_hole()), expected);
    }

    #[rstest]
    fn collapsed_polygon_contains_nothing() {
        let sliver = Polygon::new(LineString::from(vec![(0.0, 0.0), (1.0, 1.0)]), vec![]);
        assert!(!point_in_polygon(Point::new(0.5, 0.5), &sliver));
    }

    #[rstest]
    fn multi_polygon_contains_if_any_part_does() {
        let far = Polygon::new(
            LineString::from(vec![(5.0, 5.0), (6.0, 5.0), (6.0, 6.0)]),
            vec![],
        );
        let polygons = MultiPolygon::new(vec![far, square_with_hole()]);
        assert!(point_in_multi_polygon(Point::new(0.0001, 0.0001), &polygons));
        assert!(!point_in_multi_polygon(Point::new(3.0, 3.0), &polygons));
    }
}
