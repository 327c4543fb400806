//! Feature layer loading from GeoJSON files.
//!
//! Each of the six infrastructure layers is read from its own GeoJSON file.
//! A layer without a configured source loads as an empty layer, which the
//! engine treats as "nothing nearby" rather than as an error.
//!
//! # Example
//!
//! ```no_run
//! use camino::Utf8PathBuf;
//! use kerbside_core::LayerKind;
//! use kerbside_data::layers::{LayerSources, load_layers};
//!
//! let sources = LayerSources::new()
//!     .with_source(LayerKind::Sidewalks, Utf8PathBuf::from("sidewalks.geojson"))
//!     .with_source(LayerKind::Streetlights, Utf8PathBuf::from("lamps.geojson"));
//! let layers = load_layers(&sources)?;
//! assert!(layers.trees.is_empty());
//! # Ok::<(), kerbside_data::layers::LayerLoadError>(())
//! ```

mod convert;

use std::collections::BTreeMap;

use camino::{Utf8Path, Utf8PathBuf};
use kerbside_core::{FeatureLayer, FeatureLayers, LayerKind};
use log::debug;
use thiserror::Error;

use crate::fs::read_utf8_file;

/// Errors raised while loading a feature layer.
#[derive(Debug, Error)]
pub enum LayerLoadError {
    /// The layer file could not be read.
    #[error("failed to read {kind} layer at {path:?}: {source}")]
    Read {
        /// Layer being loaded.
        kind: LayerKind,
        /// File that failed.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// The layer file is not a usable GeoJSON document.
    #[error("failed to parse {kind} layer at {path:?}: {source}")]
    Parse {
        /// Layer being loaded.
        kind: LayerKind,
        /// File that failed.
        path: Utf8PathBuf,
        /// Why the document was rejected.
        #[source]
        source: LayerFormatError,
    },
}

/// Reasons a layer document is rejected as a whole.
///
/// Problems inside individual features never surface here; those features
/// are kept without geometry or skipped.
#[derive(Debug, Error)]
pub enum LayerFormatError {
    /// The text is not JSON.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The top-level JSON value is not an object.
    #[error("expected a GeoJSON object, found {found}")]
    NotAnObject {
        /// Kind of JSON value found instead.
        found: &'static str,
    },
    /// The top-level object has no string `type` member.
    #[error("GeoJSON object has no \"type\" member")]
    MissingType,
    /// A feature collection has no `features` array.
    #[error("feature collection has no \"features\" array")]
    MissingFeatures,
}

/// Source files for each layer kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerSources {
    paths: BTreeMap<LayerKind, Utf8PathBuf>,
}

impl LayerSources {
    /// Create an empty set of sources.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            paths: BTreeMap::new(),
        }
    }

    /// Set the file for `kind`, replacing any earlier choice.
    #[must_use]
    pub fn with_source(mut self, kind: LayerKind, path: impl Into<Utf8PathBuf>) -> Self {
        self.paths.insert(kind, path.into());
        self
    }

    /// The file configured for `kind`, if any.
    #[must_use]
    pub fn source(&self, kind: LayerKind) -> Option<&Utf8Path> {
        self.paths.get(&kind).map(Utf8PathBuf::as_path)
    }
}

/// Parse GeoJSON text into a feature layer.
///
/// Features are converted one at a time, so a feature with a malformed
/// geometry keeps its attributes and does not hide its neighbours.
///
/// # Errors
///
/// Returns [`LayerFormatError`] when `text` is not JSON, is not a GeoJSON
/// object, or is a feature collection without a `features` array.
pub fn parse_layer(text: &str) -> Result<FeatureLayer, LayerFormatError> {
    let document: serde_json::Value = serde_json::from_str(text)?;
    convert::layer_from_json(document)
}

/// Load one layer from a GeoJSON file.
///
/// # Errors
///
/// Returns [`LayerLoadError`] when the file cannot be read or parsed.
pub fn load_layer(kind: LayerKind, path: &Utf8Path) -> Result<FeatureLayer, LayerLoadError> {
    let text = read_utf8_file(path).map_err(|source| LayerLoadError::Read {
        kind,
        path: path.to_path_buf(),
        source,
    })?;
    let layer = parse_layer(&text).map_err(|source| LayerLoadError::Parse {
        kind,
        path: path.to_path_buf(),
        source,
    })?;
    debug!("loaded {} {kind} features from {path}", layer.len());
    Ok(layer)
}

/// Load every configured layer; unconfigured layers stay empty.
///
/// # Errors
///
/// Returns the first [`LayerLoadError`] encountered, in [`LayerKind::ALL`]
/// order.
pub fn load_layers(sources: &LayerSources) -> Result<FeatureLayers, LayerLoadError> {
    LayerKind::ALL
        .into_iter()
        .try_fold(FeatureLayers::new(), |layers, kind| {
            let Some(path) = sources.source(kind) else {
                debug!("no source configured for the {kind} layer");
                return Ok(layers);
            };
            Ok(layers.with_layer(kind, load_layer(kind, path)?))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kerbside_core::AttributeValue;
    use rstest::{fixture, rstest};
    use tempfile::TempDir;

    const POINT_COLLECTION: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "geometry": {"type": "Point", "coordinates": [-122.3, 47.6]},
             "properties": {}}
        ]
    }"#;

    #[fixture]
    fn workspace() -> (TempDir, Utf8PathBuf) {
        let tmp = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf-8 tempdir");
        (tmp, root)
    }

    #[rstest]
    fn loads_configured_layers_and_leaves_others_empty(workspace: (TempDir, Utf8PathBuf)) {
        let (_tmp, root) = workspace;
        let path = root.join("lamps.geojson");
        std::fs::write(&path, POINT_COLLECTION).expect("write layer");

        let sources = LayerSources::new().with_source(LayerKind::Streetlights, path);
        let layers = load_layers(&sources).expect("layers load");

        assert_eq!(layers.streetlights.len(), 1);
        assert!(layers.sidewalks.is_empty());
        assert!(layers.centerlines.is_empty());
    }

    #[rstest]
    fn missing_file_reports_read_error(workspace: (TempDir, Utf8PathBuf)) {
        let (_tmp, root) = workspace;
        let path = root.join("absent.geojson");

        let err = load_layer(LayerKind::Trees, &path).expect_err("missing file");
        match err {
            LayerLoadError::Read { kind, path: failed, .. } => {
                assert_eq!(kind, LayerKind::Trees);
                assert_eq!(failed, path);
            }
            other @ LayerLoadError::Parse { .. } => panic!("expected Read, got {other:?}"),
        }
    }

    #[rstest]
    fn invalid_json_reports_parse_error(workspace: (TempDir, Utf8PathBuf)) {
        let (_tmp, root) = workspace;
        let path = root.join("broken.geojson");
        std::fs::write(&path, "{ not geojson").expect("write layer");

        let err = load_layer(LayerKind::CurbRamps, &path).expect_err("invalid layer");
        assert!(matches!(
            err,
            LayerLoadError::Parse {
                kind: LayerKind::CurbRamps,
                source: LayerFormatError::Json(_),
                ..
            }
        ));
    }

    #[rstest]
    fn malformed_feature_geometry_keeps_the_rest_of_the_layer(workspace: (TempDir, Utf8PathBuf)) {
        let (_tmp, root) = workspace;
        let path = root.join("sidewalks.geojson");
        std::fs::write(
            &path,
            r#"{"type": "FeatureCollection", "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [1.0, 2.0]},
                 "properties": {"SWK_WIDTH": 4}},
                {"type": "Feature", "geometry": {"type": "Circle", "radius": 3},
                 "properties": {"SWK_WIDTH": 9}},
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": "oops"},
                 "properties": {"SWK_WIDTH": 12}}
            ]}"#,
        )
        .expect("write layer");

        let layer = load_layer(LayerKind::Sidewalks, &path).expect("layer loads");
        let geometries: Vec<_> = layer
            .features()
            .iter()
            .map(|feature| feature.geometry.is_some())
            .collect();
        assert_eq!(geometries, vec![true, false, false]);
        let widths: Vec<_> = layer
            .features()
            .iter()
            .map(|feature| feature.attribute("SWK_WIDTH").cloned())
            .collect();
        assert_eq!(
            widths,
            vec![
                Some(AttributeValue::Number(4.0)),
                Some(AttributeValue::Number(9.0)),
                Some(AttributeValue::Number(12.0)),
            ]
        );
    }

    #[rstest]
    fn collection_without_features_reports_parse_error(workspace: (TempDir, Utf8PathBuf)) {
        let (_tmp, root) = workspace;
        let path = root.join("empty.geojson");
        std::fs::write(&path, r#"{"type": "FeatureCollection"}"#).expect("write layer");

        let err = load_layer(LayerKind::Trees, &path).expect_err("no features array");
        assert!(matches!(
            err,
            LayerLoadError::Parse {
                source: LayerFormatError::MissingFeatures,
                ..
            }
        ));
    }

    #[rstest]
    fn later_sources_replace_earlier_ones() {
        let sources = LayerSources::new()
            .with_source(LayerKind::Trees, "a.geojson")
            .with_source(LayerKind::Trees, "b.geojson");
        assert_eq!(sources.source(LayerKind::Trees), Some(Utf8Path::new("b.geojson")));
        assert_eq!(sources.source(LayerKind::Sidewalks), None);
    }
}
