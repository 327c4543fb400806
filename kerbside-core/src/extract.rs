//! Per-point attribute extraction across the candidate layers.
#![expect(
    clippy::float_arithmetic,
    reason = "damage ratio divides damaged by total area"
)]

use geo::Point;
use log::debug;
use serde::Serialize;

use crate::prefilter::CandidateLayers;
use crate::proximity::{count_near, is_near};
use crate::{AnalysisConfig, AttributeKeys, Feature};

/// Normalised infrastructure observed around one route point.
///
/// `None` marks an attribute that no nearby feature supplied.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PointAttributes {
    /// Posted speed in miles per hour.
    pub speed_limit_mph: Option<f64>,
    /// Curb ramps within tolerance.
    pub ramp_count: u32,
    /// Trees within tolerance.
    pub tree_count: u32,
    /// Street lamps within tolerance.
    pub lamp_count: u32,
    /// Crosswalk centreline segments within tolerance.
    pub crosswalk_count: u32,
    /// Sidewalk width in feet.
    pub sidewalk_width_ft: Option<f64>,
    /// Sidewalk slope in percent.
    pub sidewalk_slope_pct: Option<f64>,
    /// Damaged area divided by total sidewalk area.
    pub damage_ratio: Option<f64>,
    /// Whether any sidewalk feature is near the point.
    pub has_sidewalk_coverage: bool,
}

/// Build the attribute record for `point` from pre-filtered layers.
///
/// The first nearby sidewalk supplies width, slope and damage; lamps,
/// trees, ramps and crosswalks are counted; the first nearby speed segment
/// with a parseable value supplies the speed limit.
#[must_use]
pub fn extract_point_attributes(
    point: Point<f64>,
    candidates: &CandidateLayers<'_>,
    config: &AnalysisConfig,
) -> PointAttributes {
    let tolerance = config.thresholds.proximity_tolerance_m;
    let keys = &config.attributes;
    let sidewalk = candidates
        .sidewalks
        .iter()
        .copied()
        .find(|feature| is_near(point, feature, tolerance));

    PointAttributes {
        speed_limit_mph: speed_limit(point, &candidates.speed_limits, tolerance, keys),
        ramp_count: count_near(point, &candidates.curb_ramps, tolerance),
        tree_count: count_near(point, &candidates.trees, tolerance),
        lamp_count: count_near(point, &candidates.streetlights, tolerance),
        crosswalk_count: count_near(point, &candidates.crosswalks, tolerance),
        sidewalk_width_ft: sidewalk.and_then(|s| s.first_number(&keys.sidewalk_width)),
        sidewalk_slope_pct: sidewalk.and_then(|s| s.first_number(&keys.sidewalk_slope)),
        damage_ratio: sidewalk.and_then(|s| damage_ratio(s, keys)),
        has_sidewalk_coverage: sidewalk.is_some(),
    }
}

fn damage_ratio(sidewalk: &Feature, keys: &AttributeKeys) -> Option<f64> {
    let damaged = sidewalk.first_number(&keys.damaged_area)?;
    let total = sidewalk.first_number(&keys.sidewalk_area)?;
    if total <= 0.0 {
        debug!("sidewalk has non-positive area {total}; damage ratio unknown");
        return None;
    }
    Some(damaged / total)
}

fn speed_limit(
    point: Point<f64>,
    segments: &[&Feature],
    tolerance: f64,
    keys: &AttributeKeys,
) -> Option<f64> {
    segments
        .iter()
        .filter(|segment| is_near(point, segment, tolerance))
        .find_map(|segment| segment.first_integer(&keys.speed_limit))
}
