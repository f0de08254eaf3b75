use crate::utils::redact::Redactor;
use serde_json::{Map, Value};

/// Keeps only `fields` (in that order) on every object; arrays are mapped.
pub fn project(value: &Value, fields: &[&str]) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.iter().map(|v| project(v, fields)).collect()),
        Value::Object(map) => {
            let mut out = Map::new();
            for field in fields {
                if let Some(entry) = map.get(*field) {
                    out.insert((*field).to_string(), entry.clone());
                }
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}

/// Masks the freeform `config` map of a resource, or of each resource in a list.
pub fn redact_config(value: &Value, redactor: &Redactor) -> Value {
    match value {
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| redact_config(item, redactor))
                .collect(),
        ),
        Value::Object(map) => {
            let mut out = map.clone();
            if let Some(config) = map.get("config") {
                out.insert("config".to_string(), redactor.redact(config));
            }
            Value::Object(out)
        }
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::redact::CONFIG_REDACTOR;
    use serde_json::json;

    #[test]
    fn project_keeps_present_fields_only() {
        let list = json!([
            {"id": "1", "name": "main", "config": {"password": "x"}},
            {"id": "2"}
        ]);
        assert_eq!(
            project(&list, &["id", "name"]),
            json!([{"id": "1", "name": "main"}, {"id": "2"}])
        );
    }

    #[test]
    fn redact_config_touches_only_config_field() {
        let storage = json!({
            "id": "s1",
            "accessKey": "top-level-stays",
            "config": {"bucket": "b", "secretAccessKey": "s"}
        });
        let out = redact_config(&storage, &CONFIG_REDACTOR);
        assert_eq!(out["accessKey"], json!("top-level-stays"));
        assert_eq!(out["config"]["secretAccessKey"], json!("***"));
        assert_eq!(out["config"]["bucket"], json!("b"));
    }

    #[test]
    fn scalars_pass_through() {
        assert_eq!(project(&Value::Null, &["id"]), Value::Null);
        assert_eq!(redact_config(&json!("x"), &CONFIG_REDACTOR), json!("x"));
    }
}
