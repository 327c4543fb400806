//! Behavioural tests for analysing a single route against feature layers.
#![expect(clippy::expect_used, reason = "behaviour steps fail fast on setup errors")]

use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;
use kerbside_core::test_support::{
    line_feature, northbound_route, offset_east, offset_north, point_feature,
};
use kerbside_core::{
    AnalysisConfig, FeatureLayer, FeatureLayers, Issue, IssueKind, LayerState, Route,
    RouteAnalysis, analyze_route, score,
};

const START: Coord<f64> = Coord {
    x: -122.3321,
    y: 47.6062,
};

#[fixture]
fn route() -> RefCell<Route> {
    RefCell::new(northbound_route(START, 2, 50.0))
}

#[fixture]
fn layers() -> RefCell<LayerState> {
    RefCell::new(LayerState::Pending)
}

#[fixture]
fn analysis() -> RefCell<Option<RouteAnalysis>> {
    RefCell::new(None)
}

fn start_issues(analysis: &RouteAnalysis) -> Vec<&Issue> {
    analysis
        .issues
        .iter()
        .filter(|issue| issue.index == 0)
        .collect()
}

// --- Given steps ---

#[given("a sidewalk four feet wide directly under the route start")]
fn narrow_sidewalk(#[from(layers)] layers: &RefCell<LayerState>) {
    let sidewalk = point_feature(START).with_attribute("SWK_WIDTH", 4.0);
    *layers.borrow_mut() = LayerState::ready(FeatureLayers {
        sidewalks: FeatureLayer::new(vec![sidewalk]),
        ..FeatureLayers::default()
    });
}

#[given("a speed limit segment three metres from the route start tagged \"30 mph\"")]
fn nearby_speed_segment(#[from(layers)] layers: &RefCell<LayerState>) {
    let beside = offset_east(START, 3.0);
    let segment = line_feature(vec![offset_north(beside, -20.0), offset_north(beside, 20.0)])
        .with_attribute("maxspeed", "30 mph");
    *layers.borrow_mut() = LayerState::ready(FeatureLayers {
        speed_limits: FeatureLayer::new(vec![segment]),
        ..FeatureLayers::default()
    });
}

#[given("feature layers with nothing near the route")]
fn distant_layers(#[from(layers)] layers: &RefCell<LayerState>) {
    let far = offset_east(START, 500.0);
    *layers.borrow_mut() = LayerState::ready(FeatureLayers {
        sidewalks: FeatureLayer::new(vec![point_feature(far).with_attribute("SWK_WIDTH", 8.0)]),
        streetlights: FeatureLayer::new(vec![point_feature(far)]),
        trees: FeatureLayer::new(vec![point_feature(far), point_feature(far), point_feature(far)]),
        curb_ramps: FeatureLayer::new(vec![point_feature(far)]),
        ..FeatureLayers::default()
    });
}

#[given("feature layers that are still loading")]
fn pending_layers(#[from(layers)] layers: &RefCell<LayerState>) {
    *layers.borrow_mut() = LayerState::Pending;
}

#[given("a route with only an origin")]
fn origin_only(#[from(route)] route: &RefCell<Route>) {
    *route.borrow_mut() = Route::new(vec![START]);
}

// --- When steps ---

#[when("I analyse the route")]
fn analyse(
    #[from(route)] route: &RefCell<Route>,
    #[from(layers)] layers: &RefCell<LayerState>,
    #[from(analysis)] analysis: &RefCell<Option<RouteAnalysis>>,
) {
    let result = analyze_route(&route.borrow(), &layers.borrow(), &AnalysisConfig::default());
    *analysis.borrow_mut() = Some(result);
}

// --- Then steps ---

#[then("the route start reports a sidewalk width of four feet with no lamps")]
fn start_attributes(#[from(analysis)] analysis: &RefCell<Option<RouteAnalysis>>) {
    let borrowed = analysis.borrow();
    let attrs = borrowed
        .as_ref()
        .and_then(|a| a.point_attributes.first())
        .expect("start attributes");
    assert_eq!(attrs.sidewalk_width_ft, Some(4.0));
    assert_eq!(attrs.lamp_count, 0);
    assert!(attrs.has_sidewalk_coverage);
}

#[then("the route start has only narrow sidewalk and poor lighting issues")]
fn start_kinds(#[from(analysis)] analysis: &RefCell<Option<RouteAnalysis>>) {
    let borrowed = analysis.borrow();
    let result = borrowed.as_ref().expect("analysis ran");
    let kinds: Vec<_> = start_issues(result).iter().map(|issue| issue.kind).collect();
    assert_eq!(kinds, vec![IssueKind::NarrowSidewalk, IssueKind::PoorLighting]);
}

#[then("the route start issues score the narrow sidewalk and poor lighting weights")]
#[expect(clippy::float_arithmetic, reason = "expected score is a sum of weights")]
fn start_score(#[from(analysis)] analysis: &RefCell<Option<RouteAnalysis>>) {
    let borrowed = analysis.borrow();
    let result = borrowed.as_ref().expect("analysis ran");
    let issues: Vec<Issue> = start_issues(result).into_iter().cloned().collect();
    let weights = AnalysisConfig::default().weights;
    assert_eq!(
        score(&issues, &weights),
        weights.narrow_sidewalk + weights.poor_lighting
    );
}

#[then("the route start reports a speed limit of 30 mph")]
fn start_speed(#[from(analysis)] analysis: &RefCell<Option<RouteAnalysis>>) {
    let borrowed = analysis.borrow();
    let attrs = borrowed
        .as_ref()
        .and_then(|a| a.point_attributes.first())
        .expect("start attributes");
    assert_eq!(attrs.speed_limit_mph, Some(30.0));
}

#[then("the route start has a high speed limit issue")]
fn start_speed_issue(#[from(analysis)] analysis: &RefCell<Option<RouteAnalysis>>) {
    let borrowed = analysis.borrow();
    let result = borrowed.as_ref().expect("analysis ran");
    let speeding = start_issues(result)
        .into_iter()
        .find(|issue| issue.kind == IssueKind::HighSpeedLimit)
        .expect("high speed issue");
    assert_eq!(speeding.value, Some(30.0));
}

#[then("every route point lacks sidewalk coverage and lighting")]
fn all_uncovered(
    #[from(route)] route: &RefCell<Route>,
    #[from(analysis)] analysis: &RefCell<Option<RouteAnalysis>>,
) {
    let borrowed = analysis.borrow();
    let result = borrowed.as_ref().expect("analysis ran");
    for index in 0..route.borrow().len() {
        let kinds: Vec<_> = result
            .issues
            .iter()
            .filter(|issue| issue.index == index)
            .map(|issue| issue.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![IssueKind::NoSidewalkCoverage, IssueKind::PoorLighting],
            "point {index}"
        );
    }
}

#[then("no positive signals are reported")]
fn no_positive_signals(#[from(analysis)] analysis: &RefCell<Option<RouteAnalysis>>) {
    let borrowed = analysis.borrow();
    let result = borrowed.as_ref().expect("analysis ran");
    assert!(result.issues.iter().all(|issue| !issue.kind.is_positive()));
}

#[then("the analysis is empty with a zero score")]
fn empty_analysis(#[from(analysis)] analysis: &RefCell<Option<RouteAnalysis>>) {
    let borrowed = analysis.borrow();
    let result = borrowed.as_ref().expect("analysis ran");
    assert!(result.issues.is_empty());
    assert_eq!(result.score, 0.0);
}

// --- Scenario registrations ---

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/route_analysis.feature", name = $title)]
        fn $fn_name(
            route: RefCell<Route>,
            layers: RefCell<LayerState>,
            analysis: RefCell<Option<RouteAnalysis>>,
        ) {
            let _ = (route, layers, analysis);
        }
    };
}

register_scenario!(
    narrow_sidewalk_under_point,
    "narrow sidewalk directly under a route point"
);
register_scenario!(posted_speed_nearby, "posted speed on a nearby segment");
register_scenario!(nothing_nearby, "no features near the route");
register_scenario!(layers_loading, "layers still loading");
register_scenario!(short_route, "route shorter than two points");
