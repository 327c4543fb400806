//! Candidate route loading.
//!
//! Routes arrive as a JSON array of objects, one per alternative returned by
//! the routing service:
//!
//! ```json
//! [
//!   {"points": [[-122.335, 47.608], [-122.334, 47.609]], "distance_m": 140.0, "duration_s": 105.0}
//! ]
//! ```
//!
//! Points are `[longitude, latitude]` pairs. The distance and duration
//! summary is optional.

use camino::{Utf8Path, Utf8PathBuf};
use geo::Coord;
use kerbside_core::Route;
use log::debug;
use serde::Deserialize;
use thiserror::Error;

use crate::fs::read_utf8_file;

/// Errors raised while loading candidate routes.
#[derive(Debug, Error)]
pub enum RouteLoadError {
    /// The routes file could not be read.
    #[error("failed to read routes at {path:?}: {source}")]
    Read {
        /// File that failed.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The routes file is not in the expected shape.
    #[error("failed to parse routes at {path:?}: {source}")]
    Parse {
        /// File that failed.
        path: Utf8PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
struct RouteRecord {
    points: Vec<[f64; 2]>,
    #[serde(default)]
    distance_m: Option<f64>,
    #[serde(default)]
    duration_s: Option<f64>,
}

impl From<RouteRecord> for Route {
    fn from(record: RouteRecord) -> Self {
        let points = record
            .points
            .into_iter()
            .map(|[x, y]| Coord { x, y })
            .collect();
        let mut route = Self::new(points);
        route.distance_m = record.distance_m;
        route.duration_s = record.duration_s;
        route
    }
}

/// Parse a JSON array of route records.
///
/// # Errors
///
/// Returns the JSON error when `text` does not hold an array of records.
///
/// # Examples
/// ```
/// use kerbside_data::routes::parse_routes;
///
/// let routes = parse_routes(r#"[{"points": [[0.0, 51.5], [0.001, 51.5]]}]"#)?;
/// assert_eq!(routes.len(), 1);
/// assert!(routes.first().is_some_and(|route| route.distance_m.is_none()));
/// # Ok::<(), serde_json::Error>(())
/// ```
pub fn parse_routes(text: &str) -> Result<Vec<Route>, serde_json::Error> {
    let records: Vec<RouteRecord> = serde_json::from_str(text)?;
    Ok(records.into_iter().map(Route::from).collect())
}

/// Load candidate routes from a JSON file.
///
/// # Errors
///
/// Returns [`RouteLoadError`] when the file cannot be read or parsed.
pub fn load_routes(path: &Utf8Path) -> Result<Vec<Route>, RouteLoadError> {
    let text = read_utf8_file(path).map_err(|source| RouteLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let routes = parse_routes(&text).map_err(|source| RouteLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("loaded {} candidate routes from {path}", routes.len());
    Ok(routes)
}
