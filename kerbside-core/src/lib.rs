//! Route accessibility flagging and scoring for the Kerbside engine.
//!
//! Candidate walking routes are checked against six infrastructure layers
//! (sidewalks, street lamps, trees, curb ramps, speed limits and street
//! centrelines). Each route point gets a normalised attribute record, the
//! flag rules turn those records into located [`Issue`]s, and the issues are
//! rolled up into a weighted score and an [`AccessibilitySummary`] used to
//! rank the alternatives.
//!
//! The analysis API is infallible: malformed features are skipped, unknown
//! attributes stay unknown, and short routes or pending layers produce an
//! empty analysis. Only the optional [`safety::SafetyScorer`] collaborator
//! can fail, and its failures degrade to a fallback value.
//!
//! # Examples
//!
//! ```
//! use geo::{Coord, Geometry, Point};
//! use kerbside_core::{
//!     AnalysisConfig, Feature, FeatureLayer, FeatureLayers, IssueKind, LayerState, Route,
//!     analyze_route,
//! };
//!
//! let origin = Coord { x: -122.335, y: 47.608 };
//! let route = Route::new(vec![origin, Coord { x: -122.335, y: 47.609 }]);
//! let layers = FeatureLayers {
//!     sidewalks: FeatureLayer::new(vec![
//!         Feature::new(Geometry::Point(Point::from(origin))).with_attribute("SWK_WIDTH", 4.0),
//!     ]),
//!     ..FeatureLayers::default()
//! };
//!
//! let analysis = analyze_route(&route, &LayerState::ready(layers), &AnalysisConfig::default());
//! assert_eq!(
//!     analysis.issues.first().map(|issue| issue.kind),
//!     Some(IssueKind::NarrowSidewalk)
//! );
//! ```

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

mod analysis;
mod config;
mod extract;
mod feature;
pub mod geometry;
mod guard;
mod issue;
pub mod prefilter;
mod proximity;
mod route;
mod rules;
pub mod safety;
mod score;
mod summary;

#[cfg(any(test, feature = "test-support"))]
#[doc(hidden)]
pub mod test_support;

pub use analysis::{IssueFilter, RouteAnalysis, analyze_route, analyze_routes};
pub use config::{
    AnalysisConfig, AttributeKeys, DEFAULT_MAX_DAMAGE_RATIO, DEFAULT_MAX_SIDEWALK_SLOPE_PCT,
    DEFAULT_MAX_SPEED_MPH, DEFAULT_MIN_SHADE_TREES, DEFAULT_MIN_SIDEWALK_WIDTH_FT,
    DEFAULT_PROXIMITY_TOLERANCE_M, IssueWeights, NightWindow, SummaryThresholds, Thresholds,
};
pub use extract::{PointAttributes, extract_point_attributes};
pub use feature::{
    AttributeValue, Attributes, Feature, FeatureLayer, FeatureLayers, LayerKind, LayerState,
};
pub use guard::{AnalysisGuard, AnalysisTicket};
pub use issue::{Issue, IssueKind};
pub use proximity::{count_near, is_near};
pub use route::Route;
pub use rules::flag_point;
pub use safety::ModelScore;
pub use score::{rank, score};
pub use summary::{
    AccessibilitySummary, DamageRating, IssueCounts, LightingRating, RampRating, SlopeRating,
    SpeedRating, TreeCoverRating, WidthRating, summarize,
};
