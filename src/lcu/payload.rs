// Lenient decoding for LCU payloads: a malformed element is dropped, not fatal

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decode a JSON array element by element, skipping entries that do not fit `T`.
/// Anything that is not an array (null, object, missing) decodes as empty.
pub fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
  D: Deserializer<'de>,
  T: DeserializeOwned,
{
  let value = Value::deserialize(deserializer)?;
  Ok(values_to_vec(value))
}

/// Same as [`lenient_vec`] for nested arrays (champ select action groups).
pub fn lenient_nested_vec<'de, D, T>(deserializer: D) -> Result<Vec<Vec<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: DeserializeOwned,
{
  let value = Value::deserialize(deserializer)?;
  let groups = match value {
    Value::Array(groups) => groups
      .into_iter()
      .filter(|g| g.is_array())
      .map(values_to_vec)
      .collect(),
    _ => Vec::new(),
  };
  Ok(groups)
}

pub fn values_to_vec<T: DeserializeOwned>(value: Value) -> Vec<T> {
  match value {
    Value::Array(items) => items
      .into_iter()
      .filter_map(|item| serde_json::from_value(item).ok())
      .collect(),
    _ => Vec::new(),
  }
}
