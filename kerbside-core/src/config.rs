//! Tunable configuration for one analysis pass.
//!
//! Every threshold, weight and attribute key read by the engine lives here
//! so that providers and product decisions can be reconciled without code
//! changes. All structures deserialise with per-field defaults, so a
//! partial JSON document only overrides the values it names.

use serde::{Deserialize, Serialize};

use crate::IssueKind;

/// Default proximity tolerance in metres.
pub const DEFAULT_PROXIMITY_TOLERANCE_M: f64 = 10.0;
/// Default minimum sidewalk width in feet.
pub const DEFAULT_MIN_SIDEWALK_WIDTH_FT: f64 = 5.0;
/// Default maximum sidewalk slope in percent.
pub const DEFAULT_MAX_SIDEWALK_SLOPE_PCT: f64 = 5.0;
/// Default maximum ratio of damaged to total sidewalk area.
pub const DEFAULT_MAX_DAMAGE_RATIO: f64 = 0.25;
/// Default number of trees that counts as good shade.
pub const DEFAULT_MIN_SHADE_TREES: u32 = 3;
/// Default maximum comfortable posted speed in miles per hour.
pub const DEFAULT_MAX_SPEED_MPH: f64 = 25.0;

/// Numeric thresholds applied by the flag rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    /// Widths strictly below this (feet) are flagged as narrow.
    pub min_sidewalk_width_ft: f64,
    /// Slopes strictly above this (percent) are flagged as steep.
    pub max_sidewalk_slope_pct: f64,
    /// Damage ratios strictly above this are flagged as poor condition.
    pub max_damage_ratio: f64,
    /// Tree counts at or above this are flagged as good shade.
    pub min_shade_trees: u32,
    /// Posted speeds strictly above this (mph) are flagged.
    pub max_speed_mph: f64,
    /// Distance in metres within which a feature is near a route point.
    pub proximity_tolerance_m: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_sidewalk_width_ft: DEFAULT_MIN_SIDEWALK_WIDTH_FT,
            max_sidewalk_slope_pct: DEFAULT_MAX_SIDEWALK_SLOPE_PCT,
            max_damage_ratio: DEFAULT_MAX_DAMAGE_RATIO,
            min_shade_trees: DEFAULT_MIN_SHADE_TREES,
            max_speed_mph: DEFAULT_MAX_SPEED_MPH,
            proximity_tolerance_m: DEFAULT_PROXIMITY_TOLERANCE_M,
        }
    }
}

/// Signed contribution of each issue kind to a route score.
///
/// Hazards carry positive weights and positive signals negative ones, so
/// lower scores are more accessible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueWeights {
    /// Weight of [`IssueKind::NarrowSidewalk`].
    pub narrow_sidewalk: f64,
    /// Weight of [`IssueKind::SteepSlope`].
    pub steep_slope: f64,
    /// Weight of [`IssueKind::PoorCondition`].
    pub poor_condition: f64,
    /// Weight of [`IssueKind::NoSidewalkCoverage`].
    pub no_sidewalk_coverage: f64,
    /// Weight of [`IssueKind::PoorLighting`].
    pub poor_lighting: f64,
    /// Weight of [`IssueKind::GoodShade`].
    pub good_shade: f64,
    /// Weight of [`IssueKind::NearbyRamp`].
    pub nearby_ramp: f64,
    /// Weight of [`IssueKind::NearbyCrosswalk`].
    pub nearby_crosswalk: f64,
    /// Weight of [`IssueKind::HighSpeedLimit`].
    pub high_speed_limit: f64,
}

impl IssueWeights {
    /// Look up the weight for an issue kind.
    ///
    /// # Examples
    /// ```
    /// use kerbside_core::{IssueKind, IssueWeights};
    ///
    /// let weights = IssueWeights::default();
    /// assert!(weights.weight(IssueKind::GoodShade) < 0.0);
    /// assert!(weights.weight(IssueKind::NoSidewalkCoverage) > 0.0);
    /// ```
    #[must_use]
    pub const fn weight(&self, kind: IssueKind) -> f64 {
        match kind {
            IssueKind::NarrowSidewalk => self.narrow_sidewalk,
            IssueKind::SteepSlope => self.steep_slope,
            IssueKind::PoorCondition => self.poor_condition,
            IssueKind::NoSidewalkCoverage => self.no_sidewalk_coverage,
            IssueKind::PoorLighting => self.poor_lighting,
            IssueKind::GoodShade => self.good_shade,
            IssueKind::NearbyRamp => self.nearby_ramp,
            IssueKind::NearbyCrosswalk => self.nearby_crosswalk,
            IssueKind::HighSpeedLimit => self.high_speed_limit,
        }
    }
}

impl Default for IssueWeights {
    fn default() -> Self {
        Self {
            narrow_sidewalk: 1.0,
            steep_slope: 1.0,
            poor_condition: 1.5,
            no_sidewalk_coverage: 2.0,
            poor_lighting: 1.0,
            good_shade: -0.5,
            nearby_ramp: -0.5,
            nearby_crosswalk: 0.0,
            high_speed_limit: 1.5,
        }
    }
}

/// Issue-count cut-offs used to bucket a route into summary ratings.
///
/// Each value is the minimum count needed to reach the named level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryThresholds {
    /// Poor-condition count rated moderate damage.
    pub damage_moderate: usize,
    /// Poor-condition count rated high damage.
    pub damage_high: usize,
    /// Steep-slope count rated steep.
    pub slope_steep: usize,
    /// Poor-lighting count rated moderate lighting.
    pub lighting_moderate: usize,
    /// Poor-lighting count rated poor lighting.
    pub lighting_poor: usize,
    /// Good-shade count rated moderate tree cover.
    pub shade_moderate: usize,
    /// Good-shade count rated dense tree cover.
    pub shade_dense: usize,
    /// Nearby-ramp count rated present.
    pub ramp_present: usize,
    /// High-speed count rated moderate speed.
    pub speed_moderate: usize,
    /// High-speed count rated high speed.
    pub speed_high: usize,
    /// Narrow-sidewalk count rated narrow.
    pub width_narrow: usize,
}

impl Default for SummaryThresholds {
    fn default() -> Self {
        Self {
            damage_moderate: 1,
            damage_high: 4,
            slope_steep: 1,
            lighting_moderate: 3,
            lighting_poor: 10,
            shade_moderate: 1,
            shade_dense: 5,
            ramp_present: 1,
            speed_moderate: 1,
            speed_high: 4,
            width_narrow: 1,
        }
    }
}

/// Ordered candidate property names per logical attribute.
///
/// Providers name the same quantity differently; each list is tried in
/// order and the first parseable value wins. Extend a list to support a
/// new provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeKeys {
    /// Sidewalk width in feet.
    pub sidewalk_width: Vec<String>,
    /// Sidewalk slope in percent.
    pub sidewalk_slope: Vec<String>,
    /// Damaged sidewalk area.
    pub damaged_area: Vec<String>,
    /// Total sidewalk area.
    pub sidewalk_area: Vec<String>,
    /// Centreline segment type code.
    pub centerline_type: Vec<String>,
    /// Type codes identifying a centreline segment as a crosswalk.
    pub crosswalk_types: Vec<String>,
    /// Posted speed limit, possibly with units.
    pub speed_limit: Vec<String>,
}

fn owned(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|key| (*key).to_owned()).collect()
}

impl Default for AttributeKeys {
    fn default() -> Self {
        Self {
            sidewalk_width: owned(&["SWK_WIDTH", "width"]),
            sidewalk_slope: owned(&["SWK_SLOPE", "slope"]),
            damaged_area: owned(&["DAM_AREA"]),
            sidewalk_area: owned(&["SWK_AREA"]),
            centerline_type: owned(&["TYPE"]),
            crosswalk_types: owned(&["CWALK-CL", "CWALK-CL-UM"]),
            speed_limit: owned(&[
                "SPEEDLIMIT",
                "SPEED_LIM",
                "speed",
                "maxspeed",
                "Speed",
                "Speed_Limit",
            ]),
        }
    }
}

impl AttributeKeys {
    /// Report whether a centreline type code denotes a crosswalk.
    #[must_use]
    pub fn is_crosswalk_type(&self, code: &str) -> bool {
        let trimmed = code.trim();
        self.crosswalk_types.iter().any(|known| known == trimmed)
    }
}

/// Local hours treated as night for the remote scorer's lighting column.
///
/// The window wraps midnight when `start_hour > end_hour`; the default
/// covers 18:00 up to but excluding 06:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NightWindow {
    /// First night hour, inclusive.
    pub start_hour: u8,
    /// First day hour, exclusive end of the window.
    pub end_hour: u8,
}

impl Default for NightWindow {
    fn default() -> Self {
        Self {
            start_hour: 18,
            end_hour: 6,
        }
    }
}

impl NightWindow {
    /// Report whether `hour` (0–23) falls inside the window.
    ///
    /// # Examples
    /// ```
    /// use kerbside_core::NightWindow;
    ///
    /// let night = NightWindow::default();
    /// assert!(night.contains(23));
    /// assert!(night.contains(5));
    /// assert!(!night.contains(12));
    /// ```
    #[must_use]
    pub const fn contains(&self, hour: u8) -> bool {
        if self.start_hour <= self.end_hour {
            hour >= self.start_hour && hour < self.end_hour
        } else {
            hour >= self.start_hour || hour < self.end_hour
        }
    }
}

/// Everything one analysis reads besides the routes and layers.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Rule thresholds and proximity tolerance.
    pub thresholds: Thresholds,
    /// Score weight per issue kind.
    pub weights: IssueWeights,
    /// Summary bucket cut-offs.
    pub summary: SummaryThresholds,
    /// Provider attribute names.
    pub attributes: AttributeKeys,
    /// Night window used to derive the remote scorer's night flag.
    pub night: NightWindow,
}
