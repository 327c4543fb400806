//! Bounding-box pre-filtering of feature layers.
//!
//! Before any point-wise proximity test runs, each layer is reduced to the
//! features whose own bounding box meets a tolerance-buffered box around the
//! route. The buffer is never smaller than the downstream tolerance, so the
//! filter only discards features that could not have been near any point.
#![expect(
    clippy::float_arithmetic,
    reason = "buffer conversion from metres to degrees"
)]

use geo::{BoundingRect, Coord, Intersects, Rect};

use crate::{AttributeKeys, Feature, FeatureLayers};

/// Approximate metres per degree used to size the buffer.
///
/// Slightly below the true spherical value so the buffer errs wide.
pub const BUFFER_METRES_PER_DEGREE: f64 = 111_000.0;

/// Smallest cosine used when widening the longitude buffer, which keeps the
/// buffer finite for coordinates near the poles.
const MIN_LATITUDE_COSINE: f64 = 0.01;

/// Compute the bounding box of `coords` expanded by `tolerance_m`.
///
/// The latitude margin is `tolerance_m / 111 000` degrees. The longitude
/// margin divides by the cosine of the most poleward latitude as well, so
/// the box stays a superset of every point within tolerance away from the
/// equator. Returns `None` when `coords` is empty.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use kerbside_core::prefilter::buffered_bounding_box;
///
/// let route = [Coord { x: 0.0, y: 0.0 }, Coord { x: 0.01, y: 0.01 }];
/// let bbox = buffered_bounding_box(route, 111.0).expect("non-empty route");
/// assert!((bbox.min().y + 0.001).abs() < 1e-9);
/// assert!(bbox.max().x > 0.0109);
/// ```
#[must_use]
pub fn buffered_bounding_box<I>(coords: I, tolerance_m: f64) -> Option<Rect<f64>>
where
    I: IntoIterator<Item = Coord<f64>>,
{
    let mut iter = coords.into_iter();
    let first = iter.next()?;
    let (min, max) = iter.fold((first, first), |(lo, hi), coord| {
        (
            Coord {
                x: lo.x.min(coord.x),
                y: lo.y.min(coord.y),
            },
            Coord {
                x: hi.x.max(coord.x),
                y: hi.y.max(coord.y),
            },
        )
    });
    let tolerance = tolerance_m.max(0.0);
    let lat_margin = tolerance / BUFFER_METRES_PER_DEGREE;
    let poleward = min.y.abs().max(max.y.abs()).min(90.0);
    let cosine = poleward.to_radians().cos().max(MIN_LATITUDE_COSINE);
    let lon_margin = lat_margin / cosine;
    Some(Rect::new(
        Coord {
            x: min.x - lon_margin,
            y: min.y - lat_margin,
        },
        Coord {
            x: max.x + lon_margin,
            y: max.y + lat_margin,
        },
    ))
}

/// Keep the features whose bounding box intersects `bbox`.
///
/// Order is preserved. Features without geometry, or whose geometry has no
/// bounding box, are dropped since they can never be near a point.
#[must_use]
pub fn filter_by_bbox<'a>(features: &'a [Feature], bbox: &Rect<f64>) -> Vec<&'a Feature> {
    features
        .iter()
        .filter(|feature| {
            feature
                .geometry
                .as_ref()
                .and_then(|geometry| geometry.bounding_rect())
                .is_some_and(|own| own.intersects(bbox))
        })
        .collect()
}

/// Every layer reduced to the features relevant to one route.
#[derive(Debug, Clone, Default)]
pub struct CandidateLayers<'a> {
    /// Sidewalk candidates in provider order.
    pub sidewalks: Vec<&'a Feature>,
    /// Street lamp candidates.
    pub streetlights: Vec<&'a Feature>,
    /// Tree candidates.
    pub trees: Vec<&'a Feature>,
    /// Curb ramp candidates.
    pub curb_ramps: Vec<&'a Feature>,
    /// Speed limit candidates in provider order.
    pub speed_limits: Vec<&'a Feature>,
    /// Centreline candidates whose type marks them as crosswalks.
    pub crosswalks: Vec<&'a Feature>,
}

impl<'a> CandidateLayers<'a> {
    /// Pre-filter `layers` against `bbox`.
    ///
    /// Centrelines are additionally narrowed to crosswalk segments using the
    /// configured type keys and whitelist.
    #[must_use]
    pub fn new(layers: &'a FeatureLayers, bbox: &Rect<f64>, keys: &AttributeKeys) -> Self {
        let crosswalks = filter_by_bbox(layers.centerlines.features(), bbox)
            .into_iter()
            .filter(|feature| {
                feature
                    .first_text(&keys.centerline_type)
                    .is_some_and(|code| keys.is_crosswalk_type(code))
            })
            .collect();
        Self {
            sidewalks: filter_by_bbox(layers.sidewalks.features(), bbox),
            streetlights: filter_by_bbox(layers.streetlights.features(), bbox),
            trees: filter_by_bbox(layers.trees.features(), bbox),
            curb_ramps: filter_by_bbox(layers.curb_ramps.features(), bbox),
            speed_limits: filter_by_bbox(layers.speed_limits.features(), bbox),
            crosswalks,
        }
    }

    /// Total number of candidate features across all layers.
    #[must_use]
    pub fn len(&self) -> usize {
        [
            &self.sidewalks,
            &self.streetlights,
            &self.trees,
            &self.curb_ramps,
            &self.speed_limits,
            &self.crosswalks,
        ]
        .iter()
        .map(|layer| layer.len())
        .sum()
    }

    /// Report whether no layer kept any feature.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FeatureLayer;
    use geo::{Geometry, LineString, Point};
    use rstest::rstest;

    fn point_feature(x: f64, y: f64) -> Feature {
        Feature::new(Geometry::Point(Point::new(x, y)))
    }

    #[rstest]
    fn empty_route_has_no_box() {
        assert!(buffered_bounding_box(Vec::new(), 10.0).is_none());
    }

    #[rstest]
    fn longitude_margin_widens_away_from_equator() {
        let coords = [Coord { x: 10.0, y: 60.0 }];
        let bbox = buffered_bounding_box(coords, 111.0).expect("box");
        let lat_margin = bbox.max().y - 60.0;
        let lon_margin = bbox.max().x - 10.0;
        assert!((lat_margin - 0.001).abs() < 1e-9);
        assert!((lon_margin - 0.002).abs() < 1e-6, "got {lon_margin}");
    }

    #[rstest]
    fn filter_keeps_order_and_drops_far_or_empty_features() {
        let near = point_feature(0.0002, 0.0);
        let origin = point_feature(0.0, 0.0);
        let features = vec![
            near.clone(),
            Feature::without_geometry(crate::Attributes::new()),
            point_feature(1.0, 1.0),
            origin.clone(),
        ];
        let bbox = buffered_bounding_box([Coord { x: 0.0, y: 0.0 }], 30.0).expect("box");
        let kept = filter_by_bbox(&features, &bbox);
        assert_eq!(kept, vec![&near, &origin]);
    }

    #[rstest]
    fn long_line_crossing_the_box_is_kept() {
        let crossing = Feature::new(Geometry::LineString(LineString::from(vec![
            (-1.0, 0.0),
            (1.0, 0.0),
        ])));
        let bbox = buffered_bounding_box([Coord { x: 0.0, y: 0.000_05 }], 10.0).expect("box");
        assert_eq!(filter_by_bbox(std::slice::from_ref(&crossing), &bbox).len(), 1);
    }

    #[rstest]
    fn candidates_keep_only_crosswalk_centerlines() {
        let crosswalk = Feature::new(Geometry::Point(Point::new(0.0, 0.0)))
            .with_attribute("TYPE", "CWALK-CL");
        let street = Feature::new(Geometry::Point(Point::new(0.0, 0.0)))
            .with_attribute("TYPE", "ST-CL");
        let layers = FeatureLayers {
            centerlines: FeatureLayer::new(vec![crosswalk.clone(), street]),
            trees: FeatureLayer::new(vec![point_feature(0.0, 0.0)]),
            ..FeatureLayers::default()
        };
        let bbox = buffered_bounding_box([Coord { x: 0.0, y: 0.0 }], 10.0).expect("box");
        let candidates = CandidateLayers::new(&layers, &bbox, &AttributeKeys::default());
        assert_eq!(candidates.crosswalks, vec![&crosswalk]);
        assert_eq!(candidates.len(), 2);
    }
}
