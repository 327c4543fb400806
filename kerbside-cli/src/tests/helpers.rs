//! Test helpers for writing CLI input files.

use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// A sidewalk layer with one four-foot sidewalk at the first route's start.
pub(super) const NARROW_SIDEWALK_LAYER: &str = r#"{"type": "FeatureCollection", "features": [
    {"type": "Feature", "geometry": {"type": "Point", "coordinates": [-122.3321, 47.6062]},
     "properties": {"SWK_WIDTH": 4, "SWK_SLOPE": 2, "DAM_AREA": 1, "SWK_AREA": 20}}
]}"#;

/// A street lamp layer with one lamp at the first route's start.
pub(super) const LAMP_LAYER: &str = r#"{"type": "FeatureCollection", "features": [
    {"type": "Feature", "geometry": {"type": "Point", "coordinates": [-122.3321, 47.6062]},
     "properties": {}}
]}"#;

/// Two candidate routes; only the first passes the sidewalk and lamp.
pub(super) const TWO_ROUTES: &str = r#"[
    {"points": [[-122.3321, 47.6062], [-122.3321, 47.6067]], "distance_m": 56.0},
    {"points": [[-122.3400, 47.6062], [-122.3400, 47.6067]], "distance_m": 58.0}
]"#;

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    std::fs::write(path, contents).expect("write fixture file");
}

/// A temporary directory with UTF-8 paths.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn path(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    pub(super) fn write(&self, name: &str, contents: &str) -> Utf8PathBuf {
        let path = self.path(name);
        write_utf8(&path, contents.as_bytes());
        path
    }
}
