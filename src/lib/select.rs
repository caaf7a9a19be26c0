use super::items::Feature;
use serde_json::{Map, Value};

/// Controls which id and which properties each encoded row carries.
///
/// The default selection keeps the feature's native id and drops all
/// properties, which suits datasets whose rows are looked up by id
/// alone.
#[derive(Debug, Clone, Default)]
pub struct Selection {
    pub id_key: Option<String>,
    pub property_keys: Vec<String>,
}

impl Selection {
    /// Build a selection from raw command line values. The include
    /// list is comma separated; empty segments and an empty id key are
    /// ignored.
    pub fn parse(id_key: Option<String>, include: Option<&str>) -> Self {
        let property_keys = match include {
            Some(list) => list
                .split(',')
                .filter(|key| !key.is_empty())
                .map(|key| key.to_string())
                .collect(),
            None => Vec::new(),
        };
        Selection {
            id_key: id_key.filter(|key| !key.is_empty()),
            property_keys,
        }
    }

    /// The id a row should carry: the value of the id key when the
    /// feature has it as a string property, the native id otherwise.
    pub fn feature_id(&self, feature: &Feature) -> String {
        if let Some(key) = &self.id_key {
            if let Some(Value::String(id)) = feature.properties.get(key) {
                return id.clone();
            }
        }
        feature.id.clone()
    }

    /// The properties a row should carry. Selected keys the feature
    /// lacks are kept as explicit nulls so every row has the same
    /// shape.
    pub fn properties(&self, feature: &Feature) -> Option<Map<String, Value>> {
        if self.property_keys.is_empty() {
            return None;
        }
        let map = self
            .property_keys
            .iter()
            .map(|key| {
                let value = feature.properties.get(key).cloned().unwrap_or(Value::Null);
                (key.clone(), value)
            })
            .collect();
        Some(map)
    }
}
