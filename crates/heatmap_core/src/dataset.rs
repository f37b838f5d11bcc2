//! Turns a GeoJSON feature collection into a [`Dataset`].
//!
//! The attribute keys come from the property names of the first feature only,
//! in the order they appear there. Later features may lack some of those
//! properties; such (feature, year) pairs are absent, never zero.

use std::str::FromStr;

use geojson::{FeatureCollection, GeoJson, JsonObject, JsonValue};
use tracing::{debug, info, warn};

use crate::domain::{AttributeKey, Dataset, Feature, FeatureId, Position};
use crate::error::{HeatmapError, Result};

pub const DEFAULT_ATTRIBUTE_PREFIX: &str = "Temp_";
pub const DEFAULT_NAME_PROPERTY: &str = "City_Name";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Properties whose names start with this prefix are year columns.
    pub attribute_prefix: String,
    /// Property holding the display name of each feature.
    pub name_property: String,
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            attribute_prefix: DEFAULT_ATTRIBUTE_PREFIX.to_string(),
            name_property: DEFAULT_NAME_PROPERTY.to_string(),
        }
    }
}

/// Parses GeoJSON text and builds the dataset.
pub fn parse_dataset(text: &str, options: &LoaderOptions) -> Result<Dataset> {
    let geojson = GeoJson::from_str(text)?;
    load_geojson(geojson, options)
}

/// Builds the dataset from an already parsed document.
pub fn load_geojson(geojson: GeoJson, options: &LoaderOptions) -> Result<Dataset> {
    match geojson {
        GeoJson::FeatureCollection(collection) => load_collection(&collection, options),
        GeoJson::Feature(_) => Err(HeatmapError::MalformedDataset(
            "expected a FeatureCollection, found a single Feature".to_string(),
        )),
        GeoJson::Geometry(_) => Err(HeatmapError::MalformedDataset(
            "expected a FeatureCollection, found a bare Geometry".to_string(),
        )),
    }
}

pub fn load_collection(collection: &FeatureCollection, options: &LoaderOptions) -> Result<Dataset> {
    let first = collection.features.first().ok_or_else(|| {
        HeatmapError::MalformedDataset("feature collection has no features".to_string())
    })?;

    let keys = extract_attribute_keys(first.properties.as_ref(), &options.attribute_prefix)?;
    debug!(
        keys = ?keys.iter().map(AttributeKey::name).collect::<Vec<_>>(),
        "extracted attribute keys"
    );

    let features = collection
        .features
        .iter()
        .enumerate()
        .map(|(index, raw)| build_feature(FeatureId(index), raw, &keys, options))
        .collect::<Result<Vec<_>>>()?;

    let unplaced = features.iter().filter(|f| !f.is_rendered()).count();
    if unplaced > 0 {
        warn!(unplaced, "features without point geometry will not be drawn");
    }

    info!(
        features = features.len(),
        keys = keys.len(),
        "dataset loaded"
    );

    Dataset::new(keys, features)
}

/// Year columns of the first feature, in property order.
pub fn extract_attribute_keys(
    properties: Option<&JsonObject>,
    prefix: &str,
) -> Result<Vec<AttributeKey>> {
    let properties = properties.ok_or_else(|| {
        HeatmapError::MalformedDataset("first feature has no properties".to_string())
    })?;

    let keys = properties
        .keys()
        .filter(|name| name.starts_with(prefix))
        .map(|name| AttributeKey::new(name.as_str(), prefix))
        .collect::<Vec<_>>();

    if keys.is_empty() {
        return Err(HeatmapError::MalformedDataset(format!(
            "no property of the first feature starts with {prefix:?}"
        )));
    }

    Ok(keys)
}

fn build_feature(
    id: FeatureId,
    raw: &geojson::Feature,
    keys: &[AttributeKey],
    options: &LoaderOptions,
) -> Result<Feature> {
    let properties = raw.properties.as_ref().ok_or_else(|| {
        HeatmapError::MalformedDataset(format!("feature {id} has no properties"))
    })?;

    let name = match properties.get(&options.name_property) {
        Some(JsonValue::String(name)) => name.clone(),
        Some(other) => {
            return Err(HeatmapError::MalformedDataset(format!(
                "feature {id}: {} must be a string, found {other}",
                options.name_property
            )))
        }
        None => {
            return Err(HeatmapError::MalformedDataset(format!(
                "feature {id} is missing {}",
                options.name_property
            )))
        }
    };

    let position = raw.geometry.as_ref().and_then(|geometry| match &geometry.value {
        geojson::Value::Point(coords) if coords.len() >= 2 => Some(Position {
            lon: coords[0],
            lat: coords[1],
        }),
        _ => None,
    });

    let mut feature = Feature::new(id, name, position);
    for key in keys {
        if let Some(value) = numeric_value(feature.name(), key, properties.get(key.name()))? {
            feature.insert_value(key, value)?;
        }
    }

    Ok(feature)
}

/// Numbers and numeric strings are values; `null` and missing are absent;
/// anything else is rejected.
fn numeric_value(
    feature: &str,
    key: &AttributeKey,
    raw: Option<&JsonValue>,
) -> Result<Option<f64>> {
    let invalid = |reason: String| HeatmapError::InvalidValue {
        feature: feature.to_string(),
        attribute: key.name().to_string(),
        reason,
    };

    match raw {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Number(number)) => number
            .as_f64()
            .map(Some)
            .ok_or_else(|| invalid(format!("{number} is not representable as f64"))),
        Some(JsonValue::String(text)) => text
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| invalid(format!("{text:?} is not a number"))),
        Some(other) => Err(invalid(format!("expected a number, found {other}"))),
    }
}
