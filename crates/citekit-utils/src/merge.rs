//! Merging of JSON-shaped settings.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::UtilsError;

/// Recursively merge `updates` into a copy of `mapping`.
///
/// Later maps win. When both sides hold an object under the same key the
/// objects are merged; any other value replaces the existing one.
pub fn deep_update(mapping: &Map<String, Value>, updates: &[&Map<String, Value>]) -> Map<String, Value> {
    let mut updated = mapping.clone();
    for update in updates {
        for (k, v) in update.iter() {
            let merged = match (updated.get(k), v) {
                (Some(Value::Object(existing)), Value::Object(incoming)) => {
                    Value::Object(deep_update(existing, &[incoming]))
                }
                _ => v.clone(),
            };
            updated.insert(k.clone(), merged);
        }
    }
    updated
}

/// Apply `patch` to a copy of `settings`.
///
/// Top-level `null` values are skipped. An object value is applied one level
/// deep, field by field, onto the existing object under the same key; anything
/// else replaces the field.
///
/// # Errors
///
/// Fails if `settings` does not serialize to an object, if an object patch
/// targets a field that is not an object, or if the result no longer
/// deserializes into `T`.
pub fn update_settings_from_value<T>(settings: &T, patch: &Map<String, Value>) -> Result<T, UtilsError>
where
    T: Serialize + DeserializeOwned,
{
    let Value::Object(mut current) = serde_json::to_value(settings)? else {
        return Err(UtilsError::InvalidSettings(
            "settings do not serialize to an object".to_string(),
        ));
    };

    for (key, value) in patch {
        match value {
            Value::Null => continue,
            Value::Object(fields) => match current.get_mut(key) {
                Some(Value::Object(target)) => {
                    for (k, v) in fields {
                        target.insert(k.clone(), v.clone());
                    }
                }
                _ => {
                    return Err(UtilsError::InvalidSettings(format!(
                        "`{}` is not a nested settings object",
                        key
                    )))
                }
            },
            other => {
                current.insert(key.clone(), other.clone());
            }
        }
    }

    Ok(serde_json::from_value(Value::Object(current))?)
}
