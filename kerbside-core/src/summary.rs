//! Categorical roll-up of a route's issues.
//!
//! Ratings are bucketed from raw issue counts using
//! [`SummaryThresholds`]; route length plays no part.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{Issue, IssueKind, SummaryThresholds};

/// Number of issues of each kind on a route.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IssueCounts(BTreeMap<IssueKind, usize>);

impl IssueCounts {
    /// Tally `issues` by kind.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use kerbside_core::{Issue, IssueCounts, IssueKind};
    ///
    /// let origin = Coord { x: 0.0, y: 0.0 };
    /// let issues = [
    ///     Issue::new(0, origin, IssueKind::PoorLighting, None),
    ///     Issue::new(1, origin, IssueKind::PoorLighting, None),
    /// ];
    /// let counts = IssueCounts::from_issues(&issues);
    /// assert_eq!(counts.get(IssueKind::PoorLighting), 2);
    /// assert_eq!(counts.get(IssueKind::GoodShade), 0);
    /// ```
    #[must_use]
    pub fn from_issues(issues: &[Issue]) -> Self {
        let mut counts = BTreeMap::new();
        for issue in issues {
            *counts.entry(issue.kind).or_insert(0) += 1;
        }
        Self(counts)
    }

    /// Count for one kind, zero if absent.
    #[must_use]
    pub fn get(&self, kind: IssueKind) -> usize {
        self.0.get(&kind).copied().unwrap_or_default()
    }
}

/// Sidewalk damage rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DamageRating {
    /// Little or no damage.
    Low,
    /// Some damaged stretches.
    Moderate,
    /// Frequent damage.
    High,
}

/// Slope rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlopeRating {
    /// Within the slope threshold throughout.
    Ok,
    /// At least one steep stretch.
    Steep,
}

/// Street lighting rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LightingRating {
    /// Many unlit points.
    Poor,
    /// Some unlit points.
    Moderate,
    /// Few or no unlit points.
    Good,
}

/// Tree canopy rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeCoverRating {
    /// No shaded points.
    None,
    /// Some shaded points.
    Moderate,
    /// Many shaded points.
    Dense,
}

/// Curb ramp availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RampRating {
    /// No ramp near the route.
    Missing,
    /// At least one ramp near the route.
    Present,
}

/// Traffic speed rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedRating {
    /// No fast streets alongside.
    Low,
    /// Some fast streets alongside.
    Moderate,
    /// Many fast streets alongside.
    High,
}

/// Sidewalk width rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WidthRating {
    /// At least one narrow stretch.
    Narrow,
    /// Wide enough throughout.
    Ok,
}

/// Fixed set of categorical ratings for one route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccessibilitySummary {
    /// Sidewalk damage.
    pub damage: DamageRating,
    /// Slope.
    pub slope: SlopeRating,
    /// Lighting.
    pub lighting: LightingRating,
    /// Tree cover.
    pub tree_cover: TreeCoverRating,
    /// Curb ramps.
    pub ramp: RampRating,
    /// Traffic speed.
    pub speed: SpeedRating,
    /// Sidewalk width.
    pub width: WidthRating,
}

impl Default for AccessibilitySummary {
    /// The summary of a route with no issues.
    fn default() -> Self {
        summarize(&[], &SummaryThresholds::default())
    }
}

/// Bucket a route's issues into categorical ratings.
///
/// # Examples
/// ```
/// use kerbside_core::{LightingRating, SummaryThresholds, summarize};
///
/// let summary = summarize(&[], &SummaryThresholds::default());
/// assert_eq!(summary.lighting, LightingRating::Good);
/// ```
#[must_use]
pub fn summarize(issues: &[Issue], thresholds: &SummaryThresholds) -> AccessibilitySummary {
    let counts = IssueCounts::from_issues(issues);
    let level = |kind: IssueKind, low: usize, high: usize| {
        let count = counts.get(kind);
        if count >= high {
            2
        } else if count >= low {
            1
        } else {
            0
        }
    };

    AccessibilitySummary {
        damage: match level(
            IssueKind::PoorCondition,
            thresholds.damage_moderate,
            thresholds.damage_high,
        ) {
            0 => DamageRating::Low,
            1 => DamageRating::Moderate,
            _ => DamageRating::High,
        },
        slope: if counts.get(IssueKind::SteepSlope) >= thresholds.slope_steep {
            SlopeRating::Steep
        } else {
            SlopeRating::Ok
        },
        lighting: match level(
            IssueKind::PoorLighting,
            thresholds.lighting_moderate,
            thresholds.lighting_poor,
        ) {
            0 => LightingRating::Good,
            1 => LightingRating::Moderate,
            _ => LightingRating::Poor,
        },
        tree_cover: match level(
            IssueKind::GoodShade,
            thresholds.shade_moderate,
            thresholds.shade_dense,
        ) {
            0 => TreeCoverRating::None,
            1 => TreeCoverRating::Moderate,
            _ => TreeCoverRating::Dense,
        },
        ramp: if counts.get(IssueKind::NearbyRamp) >= thresholds.ramp_present {
            RampRating::Present
        } else {
            RampRating::Missing
        },
        speed: match level(
            IssueKind::HighSpeedLimit,
            thresholds.speed_moderate,
            thresholds.speed_high,
        ) {
            0 => SpeedRating::Low,
            1 => SpeedRating::Moderate,
            _ => SpeedRating::High,
        },
        width: if counts.get(IssueKind::NarrowSidewalk) >= thresholds.width_narrow {
            WidthRating::Narrow
        } else {
            WidthRating::Ok
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Coord;
    use rstest::rstest;

    fn repeat(kind: IssueKind, count: usize) -> Vec<Issue> {
        (0..count)
            .map(|index| Issue::new(index, Coord { x: 0.0, y: 0.0 }, kind, None))
            .collect()
    }

    #[rstest]
    fn empty_route_is_best_case_except_ramps_and_shade() {
        let summary = AccessibilitySummary::default();
        assert_eq!(summary.damage, DamageRating::Low);
        assert_eq!(summary.slope, SlopeRating::Ok);
        assert_eq!(summary.lighting, LightingRating::Good);
        assert_eq!(summary.tree_cover, TreeCoverRating::None);
        assert_eq!(summary.ramp, RampRating::Missing);
        assert_eq!(summary.speed, SpeedRating::Low);
        assert_eq!(summary.width, WidthRating::Ok);
    }

    #[rstest]
    #[case(2, LightingRating::Good)]
    #[case(3, LightingRating::Moderate)]
    #[case(10, LightingRating::Poor)]
    fn lighting_buckets(#[case] unlit: usize, #[case] expected: LightingRating) {
        let summary = summarize(&repeat(IssueKind::PoorLighting, unlit), &SummaryThresholds::default());
        assert_eq!(summary.lighting, expected);
    }

    #[rstest]
    #[case(0, DamageRating::Low)]
    #[case(1, DamageRating::Moderate)]
    #[case(4, DamageRating::High)]
    fn damage_buckets(#[case] damaged: usize, #[case] expected: DamageRating) {
        let summary = summarize(&repeat(IssueKind::PoorCondition, damaged), &SummaryThresholds::default());
        assert_eq!(summary.damage, expected);
    }

    #[rstest]
    fn shade_and_ramps_are_positive_families() {
        let mut issues = repeat(IssueKind::GoodShade, 5);
        issues.extend(repeat(IssueKind::NearbyRamp, 1));
        let summary = summarize(&issues, &SummaryThresholds::default());
        assert_eq!(summary.tree_cover, TreeCoverRating::Dense);
        assert_eq!(summary.ramp, RampRating::Present);
    }

    #[rstest]
    fn summary_serialises_lowercase() {
        let json = serde_json::to_value(AccessibilitySummary::default()).expect("serialise");
        assert_eq!(json.get("tree_cover"), Some(&serde_json::json!("none")));
        assert_eq!(json.get("width"), Some(&serde_json::json!("ok")));
    }
}
