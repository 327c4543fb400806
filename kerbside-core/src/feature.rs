//! Geographic features and the six infrastructure layers consumed by the
//! engine.
//!
//! A [`Feature`] pairs an optional geometry with a free-form attribute map.
//! Providers disagree on attribute names and encodings, so values are kept
//! loosely typed as [`AttributeValue`] and interpreted on demand through the
//! ordered key lists in [`AttributeKeys`](crate::AttributeKeys).

use std::collections::HashMap;
use std::sync::Arc;

use geo::Geometry;

/// A single attribute value as served by a data provider.
///
/// # Examples
/// ```
/// use kerbside_core::AttributeValue;
///
/// assert_eq!(AttributeValue::from("25 mph").leading_integer(), Some(25.0));
/// assert_eq!(AttributeValue::from(4.5).as_number(), Some(4.5));
/// assert_eq!(AttributeValue::Null.as_number(), None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    /// A numeric value.
    Number(f64),
    /// A textual value, possibly carrying units such as `"30 mph"`.
    Text(String),
    /// An explicitly absent value.
    Null,
}

impl AttributeValue {
    /// Interpret the value as a plain number.
    ///
    /// Text is trimmed and parsed as a decimal; empty text, `Null` and
    /// non-finite numbers yield `None`.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value).filter(|v| v.is_finite()),
            Self::Text(text) => text
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite()),
            Self::Null => None,
        }
    }

    /// Interpret the value as the first integer it contains.
    ///
    /// Numbers are returned unchanged. Text yields its first run of ASCII
    /// digits, so `"25 mph"` and `"limit: 30"` parse as `25` and `30`.
    #[must_use]
    pub fn leading_integer(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value).filter(|v| v.is_finite()),
            Self::Text(text) => first_integer(text),
            Self::Null => None,
        }
    }

    /// Borrow the value as text, if it is textual.
    #[must_use]
    pub const fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text.as_str()),
            Self::Number(_) | Self::Null => None,
        }
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Extract the first run of ASCII digits in `text` as a number.
fn first_integer(text: &str) -> Option<f64> {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse::<u32>().ok().map(f64::from)
}

/// Attribute map attached to a feature.
pub type Attributes = HashMap<String, AttributeValue>;

/// A geometry plus provider attributes.
///
/// Features without geometry are accepted and are never near anything.
///
/// # Examples
/// ```
/// use geo::{Geometry, Point};
/// use kerbside_core::Feature;
///
/// let lamp = Feature::new(Geometry::Point(Point::new(-122.3, 47.6)))
///     .with_attribute("STATUS", "working");
/// assert_eq!(lamp.attribute("STATUS").and_then(|v| v.as_text()), Some("working"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Feature {
    /// Geometry in WGS84 with `x = longitude` and `y = latitude`.
    pub geometry: Option<Geometry<f64>>,
    /// Provider attributes keyed by property name.
    pub attributes: Attributes,
}

impl Feature {
    /// Construct a feature with a geometry and no attributes.
    #[must_use]
    pub fn new(geometry: Geometry<f64>) -> Self {
        Self {
            geometry: Some(geometry),
            attributes: Attributes::new(),
        }
    }

    /// Construct a feature that has no usable geometry.
    #[must_use]
    pub const fn without_geometry(attributes: Attributes) -> Self {
        Self {
            geometry: None,
            attributes,
        }
    }

    /// Add an attribute while returning `self` for chaining.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Look up a single attribute.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&AttributeValue> {
        self.attributes.get(key)
    }

    /// Return the first numeric value found under `keys`, tried in order.
    #[must_use]
    pub fn first_number(&self, keys: &[String]) -> Option<f64> {
        keys.iter()
            .filter_map(|key| self.attribute(key))
            .find_map(AttributeValue::as_number)
    }

    /// Return the first embedded integer found under `keys`, tried in order.
    #[must_use]
    pub fn first_integer(&self, keys: &[String]) -> Option<f64> {
        keys.iter()
            .filter_map(|key| self.attribute(key))
            .find_map(AttributeValue::leading_integer)
    }

    /// Return the first textual value found under `keys`, tried in order.
    #[must_use]
    pub fn first_text(&self, keys: &[String]) -> Option<&str> {
        keys.iter()
            .filter_map(|key| self.attribute(key))
            .find_map(AttributeValue::as_text)
    }
}

/// The six infrastructure layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerKind {
    /// Sidewalk geometry with width, slope and condition attributes.
    Sidewalks,
    /// Street lamps.
    Streetlights,
    /// Street trees.
    Trees,
    /// Curb ramps.
    CurbRamps,
    /// Posted speed limit segments.
    SpeedLimits,
    /// Street centrelines, including crosswalk segments.
    Centerlines,
}

impl LayerKind {
    /// Every layer, in a stable order.
    pub const ALL: [Self; 6] = [
        Self::Sidewalks,
        Self::Streetlights,
        Self::Trees,
        Self::CurbRamps,
        Self::SpeedLimits,
        Self::Centerlines,
    ];

    /// Return the layer as a lowercase `&str`.
    ///
    /// # Examples
    /// ```
    /// use kerbside_core::LayerKind;
    ///
    /// assert_eq!(LayerKind::CurbRamps.as_str(), "curb-ramps");
    /// ```
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Sidewalks => "sidewalks",
            Self::Streetlights => "streetlights",
            Self::Trees => "trees",
            Self::CurbRamps => "curb-ramps",
            Self::SpeedLimits => "speed-limits",
            Self::Centerlines => "centerlines",
        }
    }
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LayerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown layer '{s}'"))
    }
}

/// One named collection of features from a single data source.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureLayer {
    features: Vec<Feature>,
}

impl FeatureLayer {
    /// Construct a layer from its features.
    #[must_use]
    pub const fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    /// Borrow the features in provider order.
    #[must_use]
    pub const fn features(&self) -> &[Feature] {
        self.features.as_slice()
    }

    /// Number of features in the layer.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.features.len()
    }

    /// Report whether the layer holds no features.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl FromIterator<Feature> for FeatureLayer {
    fn from_iter<I: IntoIterator<Item = Feature>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// The complete set of layers read by one analysis.
///
/// Layers are immutable inputs; share them between concurrent analyses
/// behind an [`Arc`] via [`LayerState::Ready`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureLayers {
    /// Sidewalk features.
    pub sidewalks: FeatureLayer,
    /// Street lamp features.
    pub streetlights: FeatureLayer,
    /// Tree features.
    pub trees: FeatureLayer,
    /// Curb ramp features.
    pub curb_ramps: FeatureLayer,
    /// Speed limit segments.
    pub speed_limits: FeatureLayer,
    /// Street centrelines.
    pub centerlines: FeatureLayer,
}

impl FeatureLayers {
    /// Construct an empty set of layers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the layer of the given kind.
    #[must_use]
    pub const fn layer(&self, kind: LayerKind) -> &FeatureLayer {
        match kind {
            LayerKind::Sidewalks => &self.sidewalks,
            LayerKind::Streetlights => &self.streetlights,
            LayerKind::Trees => &self.trees,
            LayerKind::CurbRamps => &self.curb_ramps,
            LayerKind::SpeedLimits => &self.speed_limits,
            LayerKind::Centerlines => &self.centerlines,
        }
    }

    /// Replace the layer of the given kind.
    pub fn set_layer(&mut self, kind: LayerKind, layer: FeatureLayer) {
        let slot = match kind {
            LayerKind::Sidewalks => &mut self.sidewalks,
            LayerKind::Streetlights => &mut self.streetlights,
            LayerKind::Trees => &mut self.trees,
            LayerKind::CurbRamps => &mut self.curb_ramps,
            LayerKind::SpeedLimits => &mut self.speed_limits,
            LayerKind::Centerlines => &mut self.centerlines,
        };
        *slot = layer;
    }

    /// Replace a layer while returning `self` for chaining.
    #[must_use]
    pub fn with_layer(mut self, kind: LayerKind, layer: FeatureLayer) -> Self {
        self.set_layer(kind, layer);
        self
    }
}

/// Availability of the feature layers when an analysis is requested.
///
/// Layers are fetched by external collaborators; until every layer has
/// arrived, analyses short-circuit to an empty result instead of blocking.
#[derive(Debug, Clone, Default)]
pub enum LayerState {
    /// Layers are still being fetched.
    #[default]
    Pending,
    /// An immutable snapshot of every layer.
    Ready(Arc<FeatureLayers>),
}

impl LayerState {
    /// Wrap loaded layers in a shareable snapshot.
    #[must_use]
    pub fn ready(layers: FeatureLayers) -> Self {
        Self::Ready(Arc::new(layers))
    }

    /// Borrow the snapshot, if loaded.
    #[must_use]
    pub fn layers(&self) -> Option<&FeatureLayers> {
        match self {
            Self::Pending => None,
            Self::Ready(layers) => Some(layers),
        }
    }
}
