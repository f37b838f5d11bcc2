use std::collections::HashMap;
use std::fmt;

use crate::error::{HeatmapError, Result};

/// One year's column in the attribute table, e.g. `Temp_2018`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeKey {
    name: String,
    label: String,
}

impl AttributeKey {
    /// Builds a key from a full property name. The label is whatever follows
    /// `prefix`, or the whole name when the prefix is absent.
    pub fn new(name: impl Into<String>, prefix: &str) -> Self {
        let name = name.into();
        let label = name
            .strip_prefix(prefix)
            .filter(|rest| !rest.is_empty())
            .unwrap_or(&name)
            .to_string();
        Self { name, label }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display label, the year for `Temp_<year>` columns.
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Stable identifier of a feature: its position in the loaded collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FeatureId(pub usize);

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Longitude/latitude of a point feature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub lon: f64,
    pub lat: f64,
}

/// One city: a name, an optional map position and its year-keyed values.
///
/// Values are sparse. Only finite numbers can be stored, so everything that
/// reads a feature can compare values without NaN checks.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    id: FeatureId,
    name: String,
    position: Option<Position>,
    values: HashMap<String, f64>,
}

impl Feature {
    pub fn new(id: FeatureId, name: impl Into<String>, position: Option<Position>) -> Self {
        Self {
            id,
            name: name.into(),
            position,
            values: HashMap::new(),
        }
    }

    /// Stores the value for `key`, rejecting NaN and infinities.
    pub fn insert_value(&mut self, key: &AttributeKey, value: f64) -> Result<()> {
        if !value.is_finite() {
            return Err(HeatmapError::InvalidValue {
                feature: self.name.clone(),
                attribute: key.name().to_string(),
                reason: format!("{value} is not a finite number"),
            });
        }
        self.values.insert(key.name().to_string(), value);
        Ok(())
    }

    pub fn with_value(mut self, key: &AttributeKey, value: f64) -> Result<Self> {
        self.insert_value(key, value)?;
        Ok(self)
    }

    pub const fn id(&self) -> FeatureId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn position(&self) -> Option<Position> {
        self.position
    }

    /// A feature is rendered as a symbol only when it has a point position.
    pub const fn is_rendered(&self) -> bool {
        self.position.is_some()
    }

    /// The value for `key`, `None` when the feature has no such column.
    pub fn value(&self, key: &AttributeKey) -> Option<f64> {
        self.values.get(key.name()).copied()
    }
}

/// The loaded collection: ordered attribute keys plus every feature.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    keys: Vec<AttributeKey>,
    features: Vec<Feature>,
}

impl Dataset {
    /// Fails when there are no keys, since the selection needs a first and a
    /// last element to wrap around.
    pub fn new(keys: Vec<AttributeKey>, features: Vec<Feature>) -> Result<Self> {
        if keys.is_empty() {
            return Err(HeatmapError::MalformedDataset(
                "no attribute keys".to_string(),
            ));
        }
        if features.is_empty() {
            return Err(HeatmapError::MalformedDataset(
                "feature collection has no features".to_string(),
            ));
        }
        Ok(Self { keys, features })
    }

    pub fn keys(&self) -> &[AttributeKey] {
        &self.keys
    }

    pub fn key(&self, index: usize) -> Option<&AttributeKey> {
        self.keys.get(index)
    }

    pub fn features(&self) -> &[Feature] {
        &self.features
    }

    pub fn feature(&self, id: FeatureId) -> Option<&Feature> {
        self.features.get(id.0)
    }

    /// Features that get a symbol on the map.
    pub fn rendered_features(&self) -> impl Iterator<Item = &Feature> + '_ {
        self.features.iter().filter(|feature| feature.is_rendered())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_label_strips_prefix() {
        let key = AttributeKey::new("Temp_2018", "Temp_");
        assert_eq!(key.name(), "Temp_2018");
        assert_eq!(key.label(), "2018");
    }

    #[test]
    fn key_label_falls_back_to_name() {
        assert_eq!(AttributeKey::new("Temp_", "Temp_").label(), "Temp_");
        assert_eq!(AttributeKey::new("Year2018", "Temp_").label(), "Year2018");
    }

    #[test]
    fn feature_rejects_non_finite_values() {
        let key = AttributeKey::new("Temp_2018", "Temp_");
        let mut feature = Feature::new(FeatureId(0), "Phoenix", None);

        let error = feature.insert_value(&key, f64::NAN).unwrap_err();
        assert!(matches!(error, HeatmapError::InvalidValue { .. }));
        assert!(feature.insert_value(&key, f64::INFINITY).is_err());
        assert_eq!(feature.value(&key), None);
    }

    #[test]
    fn missing_value_is_absent_not_zero() {
        let y2018 = AttributeKey::new("Temp_2018", "Temp_");
        let y2019 = AttributeKey::new("Temp_2019", "Temp_");
        let feature = Feature::new(FeatureId(0), "Phoenix", None)
            .with_value(&y2018, 104.2)
            .unwrap();

        assert_eq!(feature.value(&y2018), Some(104.2));
        assert_eq!(feature.value(&y2019), None);
    }

    #[test]
    fn dataset_requires_keys_and_features() {
        let key = AttributeKey::new("Temp_2018", "Temp_");
        let feature = Feature::new(FeatureId(0), "Phoenix", None);

        assert!(Dataset::new(Vec::new(), vec![feature.clone()]).is_err());
        assert!(Dataset::new(vec![key.clone()], Vec::new()).is_err());
        assert!(Dataset::new(vec![key], vec![feature]).is_ok());
    }
}
