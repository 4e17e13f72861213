//! Field-level diffs for update change logs

use serde::Serialize;
use serde_json::{json, Map, Value};

/// Fields every entity carries that are not user edits
pub const BOOKKEEPING_FIELDS: &[&str] = &["id", "created_at", "updated_at"];

/// Serialize an entity for a create/delete change log.
///
/// Serialization of the domain types cannot fail; a failure yields `null`
/// rather than dropping the log entry.
pub fn snapshot<T: Serialize>(entity: &T) -> Value {
    serde_json::to_value(entity).unwrap_or(Value::Null)
}

/// Compare two serialized versions of an entity and return
/// `{field: {"from": old, "to": new}}` for every top-level field that
/// changed, skipping `ignore`.
pub fn field_diff<T: Serialize>(before: &T, after: &T, ignore: &[&str]) -> Value {
    let (Value::Object(before), Value::Object(after)) = (snapshot(before), snapshot(after)) else {
        return Value::Object(Map::new());
    };

    let mut changes = Map::new();
    for (field, new_value) in &after {
        if ignore.contains(&field.as_str()) {
            continue;
        }
        let old_value = before.get(field).unwrap_or(&Value::Null);
        if old_value != new_value {
            changes.insert(field.clone(), json!({ "from": old_value, "to": new_value }));
        }
    }
    for (field, old_value) in &before {
        if !after.contains_key(field) && !ignore.contains(&field.as_str()) {
            changes.insert(field.clone(), json!({ "from": old_value, "to": Value::Null }));
        }
    }

    Value::Object(changes)
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::*;

    #[derive(Serialize)]
    struct Sample {
        id: u32,
        name: String,
        phone: Option<String>,
        updated_at: String,
    }

    fn sample(name: &str, phone: Option<&str>, updated_at: &str) -> Sample {
        Sample {
            id: 1,
            name: name.to_string(),
            phone: phone.map(str::to_string),
            updated_at: updated_at.to_string(),
        }
    }

    #[test]
    fn reports_only_changed_fields() {
        let before = sample("Acme", None, "monday");
        let after = sample("Acme Corp", None, "tuesday");

        let diff = field_diff(&before, &after, BOOKKEEPING_FIELDS);
        assert_eq!(diff, json!({ "name": { "from": "Acme", "to": "Acme Corp" } }));
    }

    #[test]
    fn cleared_optional_fields_diff_to_null() {
        let before = sample("Acme", Some("555"), "x");
        let after = sample("Acme", None, "x");

        let diff = field_diff(&before, &after, BOOKKEEPING_FIELDS);
        assert_eq!(diff["phone"]["from"], json!("555"));
        assert_eq!(diff["phone"]["to"], Value::Null);
    }

    #[test]
    fn identical_values_produce_empty_diff() {
        let value = sample("Acme", None, "x");
        assert_eq!(field_diff(&value, &value, &[]), json!({}));
    }
}
