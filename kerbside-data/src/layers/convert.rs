//! Conversion from GeoJSON documents to engine features.

use geojson::{JsonObject, JsonValue};
use kerbside_core::{AttributeValue, Attributes, Feature, FeatureLayer};
use log::{debug, trace};

use super::LayerFormatError;

/// Convert a GeoJSON document held as JSON into a feature layer.
///
/// Feature collections keep their feature order. A lone feature becomes a
/// single-feature layer and a bare geometry becomes a feature without
/// attributes. Each feature is converted on its own: one whose geometry is
/// null, malformed or of an unknown type is kept with no geometry so its
/// attributes stay visible, and a collection entry that is not an object is
/// skipped.
///
/// # Errors
///
/// Returns [`LayerFormatError`] when the document is not a GeoJSON object or
/// a feature collection has no `features` array.
pub(super) fn layer_from_json(document: JsonValue) -> Result<FeatureLayer, LayerFormatError> {
    let mut object = match document {
        JsonValue::Object(object) => object,
        other => {
            return Err(LayerFormatError::NotAnObject {
                found: json_kind(&other),
            });
        }
    };
    let kind = object
        .get("type")
        .and_then(JsonValue::as_str)
        .map(str::to_owned)
        .ok_or(LayerFormatError::MissingType)?;

    match kind.as_str() {
        "FeatureCollection" => match object.remove("features") {
            Some(JsonValue::Array(entries)) => Ok(entries
                .into_iter()
                .enumerate()
                .filter_map(|(index, entry)| match entry {
                    JsonValue::Object(feature) => Some(feature_from_object(feature)),
                    other => {
                        debug!("skipping feature {index}: expected an object, found {}", json_kind(&other));
                        None
                    }
                })
                .collect()),
            _ => Err(LayerFormatError::MissingFeatures),
        },
        "Feature" => Ok(std::iter::once(feature_from_object(object)).collect()),
        _ => {
            let mut feature = Feature::without_geometry(Attributes::new());
            feature.geometry = geometry_from_object(object);
            Ok(std::iter::once(feature).collect())
        }
    }
}

fn feature_from_object(mut object: JsonObject) -> Feature {
    let attributes = match object.remove("properties") {
        Some(JsonValue::Object(properties)) => attributes_from_properties(properties),
        _ => Attributes::new(),
    };
    let mut converted = Feature::without_geometry(attributes);
    converted.geometry = match object.remove("geometry") {
        Some(JsonValue::Object(geometry)) => geometry_from_object(geometry),
        Some(JsonValue::Null) | None => None,
        Some(other) => {
            debug!("dropping GeoJSON geometry: expected an object, found {}", json_kind(&other));
            None
        }
    };
    converted
}

fn geometry_from_object(object: JsonObject) -> Option<geo::Geometry<f64>> {
    let geometry = geojson::Geometry::try_from(object)
        .map_err(|err| debug!("dropping malformed GeoJSON geometry: {err}"))
        .ok()?;
    geo::Geometry::<f64>::try_from(geometry)
        .map_err(|err| debug!("dropping unsupported GeoJSON geometry: {err}"))
        .ok()
}

const fn json_kind(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}

fn attributes_from_properties(properties: JsonObject) -> Attributes {
    properties
        .into_iter()
        .map(|(key, value)| {
            let converted = attribute_from_json(value);
            (key, converted)
        })
        .collect()
}

/// Map a JSON property onto the engine's attribute model.
///
/// Numbers stay numeric and strings stay textual so that numeric parsing
/// happens once, in the extractor. Booleans, arrays and objects keep their
/// JSON text.
pub(super) fn attribute_from_json(value: JsonValue) -> AttributeValue {
    match value {
        JsonValue::Null => AttributeValue::Null,
        JsonValue::Number(number) => number.as_f64().map_or_else(
            || {
                trace!("numeric property {number} does not fit an f64");
                AttributeValue::Text(number.to_string())
            },
            AttributeValue::Number,
        ),
        JsonValue::String(text) => AttributeValue::Text(text),
        other @ (JsonValue::Bool(_) | JsonValue::Array(_) | JsonValue::Object(_)) => {
            AttributeValue::Text(other.to_string())
        }
    }
}
