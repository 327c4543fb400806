//! Threshold rules turning point attributes into issues.

use geo::Coord;

use crate::{Issue, IssueKind, PointAttributes, Thresholds};

/// Apply every rule to one point's attributes.
///
/// Issues are emitted in [`IssueKind`] order, each carrying the value that
/// triggered it. Unknown attributes never trigger their threshold rule.
///
/// # Examples
/// ```
/// use geo::Coord;
/// use kerbside_core::{IssueKind, PointAttributes, Thresholds, flag_point};
///
/// let attrs = PointAttributes {
///     sidewalk_width_ft: Some(4.0),
///     has_sidewalk_coverage: true,
///     ..PointAttributes::default()
/// };
/// let kinds: Vec<_> = flag_point(0, Coord { x: 0.0, y: 0.0 }, &attrs, &Thresholds::default())
///     .into_iter()
///     .map(|issue| issue.kind)
///     .collect();
/// assert_eq!(kinds, vec![IssueKind::NarrowSidewalk, IssueKind::PoorLighting]);
/// ```
#[must_use]
pub fn flag_point(
    index: usize,
    coord: Coord<f64>,
    attrs: &PointAttributes,
    thresholds: &Thresholds,
) -> Vec<Issue> {
    let checks = [
        (
            IssueKind::NarrowSidewalk,
            attrs
                .sidewalk_width_ft
                .filter(|width| *width < thresholds.min_sidewalk_width_ft),
        ),
        (
            IssueKind::SteepSlope,
            attrs
                .sidewalk_slope_pct
                .filter(|slope| *slope > thresholds.max_sidewalk_slope_pct),
        ),
        (
            IssueKind::PoorCondition,
            attrs
                .damage_ratio
                .filter(|ratio| *ratio > thresholds.max_damage_ratio),
        ),
        (
            IssueKind::NoSidewalkCoverage,
            (!attrs.has_sidewalk_coverage).then_some(0.0),
        ),
        (
            IssueKind::PoorLighting,
            (attrs.lamp_count == 0).then_some(0.0),
        ),
        (
            IssueKind::GoodShade,
            (attrs.tree_count >= thresholds.min_shade_trees).then(|| f64::from(attrs.tree_count)),
        ),
        (
            IssueKind::NearbyRamp,
            (attrs.ramp_count > 0).then(|| f64::from(attrs.ramp_count)),
        ),
        (
            IssueKind::NearbyCrosswalk,
            (attrs.crosswalk_count > 0).then(|| f64::from(attrs.crosswalk_count)),
        ),
        (
            IssueKind::HighSpeedLimit,
            attrs
                .speed_limit_mph
                .filter(|speed| *speed > thresholds.max_speed_mph),
        ),
    ];

    checks
        .into_iter()
        .filter_map(|(kind, value)| value.map(|v| Issue::new(index, coord, kind, Some(v))))
        .collect()
}
