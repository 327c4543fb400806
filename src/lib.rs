//! Facade crate for the Kerbside route accessibility engine.
//!
//! This crate re-exports the core domain types and exposes the file loaders
//! and remote safety scorer behind the `data` feature.

#![forbid(unsafe_code)]

pub use kerbside_core::{
    AccessibilitySummary, AnalysisConfig, AnalysisGuard, AnalysisTicket, Feature, FeatureLayer,
    FeatureLayers, Issue, IssueFilter, IssueKind, LayerKind, LayerState, ModelScore, Route,
    RouteAnalysis, analyze_route, analyze_routes,
};
pub use kerbside_core::safety::{SafetyScoreError, SafetyScorer};

#[cfg(feature = "data")]
pub use kerbside_data::{
    HttpSafetyScorer, HttpSafetyScorerConfig, LayerLoadError, LayerSources, RouteLoadError,
    load_layers, load_routes,
};
