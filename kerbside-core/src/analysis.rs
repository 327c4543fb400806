//! Route analysis entry points.
//!
//! An analysis pre-filters every layer against the route, extracts
//! attributes for each point in parallel, applies the flag rules and rolls
//! the issues up into a score and summary. Nothing here fails: short
//! routes and pending layers produce an empty analysis with score zero.

use std::collections::BTreeSet;

use log::debug;
use rayon::prelude::*;
use serde::Serialize;

use crate::prefilter::{CandidateLayers, buffered_bounding_box};
use crate::{
    AccessibilitySummary, AnalysisConfig, Issue, IssueKind, LayerState, ModelScore,
    PointAttributes, Route, extract_point_attributes, flag_point, rank, score, summarize,
};

/// Issues, score and summary computed for one route.
///
/// Analyses are produced whole and replaced whole; a changed route or layer
/// calls for a fresh analysis rather than an update.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteAnalysis {
    /// Position of the route in the candidate list it was analysed from.
    pub candidate_index: usize,
    /// The analysed route.
    pub route: Route,
    /// Issues in non-decreasing point index order.
    pub issues: Vec<Issue>,
    /// Weighted issue score; lower is more accessible.
    pub score: f64,
    /// Categorical roll-up of the issues.
    pub summary: AccessibilitySummary,
    /// Optional model-based score reported alongside the rule score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model_score: Option<ModelScore>,
    /// Attributes extracted for each route point, in route order.
    #[serde(skip)]
    pub point_attributes: Vec<PointAttributes>,
}

impl RouteAnalysis {
    /// An analysis with no issues and a zero score.
    #[must_use]
    pub fn empty(route: Route) -> Self {
        Self {
            candidate_index: 0,
            route,
            issues: Vec::new(),
            score: 0.0,
            summary: AccessibilitySummary::default(),
            model_score: None,
            point_attributes: Vec::new(),
        }
    }

    /// Keep only the issues `filter` allows, leaving score and summary
    /// untouched.
    ///
    /// # Examples
    /// ```
    /// use geo::Coord;
    /// use kerbside_core::{AnalysisConfig, IssueFilter, IssueKind, LayerState, FeatureLayers, Route};
    /// use kerbside_core::analyze_route;
    ///
    /// let route = Route::new(vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 0.0, y: 0.001 }]);
    /// let layers = LayerState::ready(FeatureLayers::new());
    /// let analysis = analyze_route(&route, &layers, &AnalysisConfig::default());
    /// let lighting_only = analysis
    ///     .clone()
    ///     .with_issue_filter(&IssueFilter::only([IssueKind::PoorLighting]));
    ///
    /// assert_eq!(lighting_only.issues.len(), 2);
    /// assert_eq!(lighting_only.score, analysis.score);
    /// ```
    #[must_use]
    pub fn with_issue_filter(mut self, filter: &IssueFilter) -> Self {
        self.issues.retain(|issue| filter.allows(issue.kind));
        self
    }
}

/// Caller-selected set of issue kinds to present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssueFilter {
    kinds: Option<BTreeSet<IssueKind>>,
}

impl IssueFilter {
    /// A filter that allows every kind.
    #[must_use]
    pub const fn all() -> Self {
        Self { kinds: None }
    }

    /// A filter that allows only `kinds`.
    #[must_use]
    pub fn only(kinds: impl IntoIterator<Item = IssueKind>) -> Self {
        Self {
            kinds: Some(kinds.into_iter().collect()),
        }
    }

    /// Report whether `kind` passes the filter.
    #[must_use]
    pub fn allows(&self, kind: IssueKind) -> bool {
        self.kinds.as_ref().is_none_or(|kinds| kinds.contains(&kind))
    }
}

/// Analyse one route against the current layers.
///
/// Routes with fewer than two points and layers that have not arrived yet
/// yield [`RouteAnalysis::empty`].
#[must_use]
pub fn analyze_route(route: &Route, layers: &LayerState, config: &AnalysisConfig) -> RouteAnalysis {
    if !route.is_analysable() {
        debug!("route has {} points; skipping analysis", route.len());
        return RouteAnalysis::empty(route.clone());
    }
    let Some(snapshot) = layers.layers() else {
        debug!("feature layers not yet available; returning empty analysis");
        return RouteAnalysis::empty(route.clone());
    };
    let tolerance = config.thresholds.proximity_tolerance_m;
    let Some(bbox) = buffered_bounding_box(route.points.iter().copied(), tolerance) else {
        return RouteAnalysis::empty(route.clone());
    };
    let candidates = CandidateLayers::new(snapshot, &bbox, &config.attributes);
    debug!(
        "analysing {} points against {} candidate features",
        route.len(),
        candidates.len()
    );

    let mut per_point: Vec<(usize, PointAttributes, Vec<Issue>)> = route
        .points
        .par_iter()
        .enumerate()
        .map(|(index, coord)| {
            let attrs = extract_point_attributes((*coord).into(), &candidates, config);
            let issues = flag_point(index, *coord, &attrs, &config.thresholds);
            (index, attrs, issues)
        })
        .collect();
    per_point.sort_by_key(|(index, _, _)| *index);

    let mut issues = Vec::new();
    let mut point_attributes = Vec::with_capacity(per_point.len());
    for (_, attrs, point_issues) in per_point {
        issues.extend(point_issues);
        point_attributes.push(attrs);
    }

    RouteAnalysis {
        candidate_index: 0,
        route: route.clone(),
        score: score(&issues, &config.weights),
        summary: summarize(&issues, &config.summary),
        issues,
        model_score: None,
        point_attributes,
    }
}

/// Analyse every candidate route in parallel and return the `k` most
/// accessible in ascending score order.
///
/// Each analysis records its route's position in `routes` as
/// [`RouteAnalysis::candidate_index`].
///
/// # Examples
/// ```
/// use geo::Coord;
/// use kerbside_core::{AnalysisConfig, LayerState, Route, analyze_routes};
///
/// let routes = vec![
///     Route::new(vec![Coord { x: 0.0, y: 0.0 }, Coord { x: 0.0, y: 0.001 }]),
///     Route::new(vec![Coord { x: 0.0, y: 0.0 }]),
/// ];
/// let ranked = analyze_routes(&routes, &LayerState::Pending, &AnalysisConfig::default(), 5);
/// assert_eq!(ranked.len(), 2);
/// assert!(ranked.iter().all(|analysis| analysis.score == 0.0));
/// ```
#[must_use]
pub fn analyze_routes(
    routes: &[Route],
    layers: &LayerState,
    config: &AnalysisConfig,
    k: usize,
) -> Vec<RouteAnalysis> {
    let analyses = routes
        .par_iter()
        .enumerate()
        .map(|(candidate_index, route)| RouteAnalysis {
            candidate_index,
            ..analyze_route(route, layers, config)
        })
        .collect();
    rank(analyses, k)
}
