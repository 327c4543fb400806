//! External collaborator adapters for the Kerbside engine.
//!
//! Responsibilities:
//! - Load the six infrastructure feature layers from GeoJSON files.
//! - Load candidate routes produced by a routing service.
//! - Call a remote route safety prediction service over HTTP.
//!
//! Boundaries:
//! - Do not encode flagging or scoring rules (those live in `kerbside-core`).
//! - Keep blocking IO off async executors; the HTTP scorer owns its runtime.
//!
//! Invariants:
//! - Loaders return owned, immutable data that can be shared across threads.
//! - No global mutable state.

#![forbid(unsafe_code)]

pub mod fs;
pub mod layers;
pub mod routes;
pub mod scoring;

pub use layers::{LayerFormatError, LayerLoadError, LayerSources, load_layer, load_layers, parse_layer};
pub use routes::{RouteLoadError, load_routes, parse_routes};
pub use scoring::{
    HttpSafetyScorer, HttpSafetyScorerConfig, PredictionResponse, ResponseField, ScorerBuildError,
};
