use crate::errors::ToolError;
use serde_json::Value;

/// Typed accessors for tool arguments.
#[derive(Clone, Default)]
pub struct Validation;

impl Validation {
    pub fn new() -> Self {
        Self
    }

    /// Rejects missing or blank values; the string is returned as given.
    pub fn ensure_string(&self, value: Option<&Value>, label: &str) -> Result<String, ToolError> {
        let text = value.and_then(|v| v.as_str()).unwrap_or("");
        if text.trim().is_empty() {
            return Err(ToolError::invalid_params(format!(
                "{} must be a non-empty string",
                label
            )));
        }
        Ok(text.to_string())
    }

    pub fn ensure_optional_string(
        &self,
        value: Option<&Value>,
        label: &str,
    ) -> Result<Option<String>, ToolError> {
        match value {
            None | Some(Value::Null) => Ok(None),
            Some(val) => self.ensure_string(Some(val), label).map(Some),
        }
    }

    pub fn ensure_object(&self, value: Option<&Value>, label: &str) -> Result<Value, ToolError> {
        match value {
            Some(val @ Value::Object(_)) => Ok(val.clone()),
            _ => Err(ToolError::invalid_params(format!(
                "{} must be an object",
                label
            ))),
        }
    }

    pub fn flag(&self, value: Option<&Value>) -> bool {
        value.and_then(|v| v.as_bool()).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn ensure_string_rejects_blank_and_non_strings() {
        let validation = Validation::new();
        assert_eq!(
            validation.ensure_string(Some(&json!(" db-1 ")), "id").ok(),
            Some(" db-1 ".to_string())
        );
        assert!(validation.ensure_string(Some(&json!("  ")), "id").is_err());
        assert!(validation.ensure_string(Some(&json!(5)), "id").is_err());
        assert!(validation.ensure_string(None, "id").is_err());
    }

    #[test]
    fn optional_string_treats_null_as_absent() {
        let validation = Validation::new();
        assert_eq!(
            validation
                .ensure_optional_string(Some(&Value::Null), "workspace_id")
                .ok(),
            Some(None)
        );
    }

    #[test]
    fn ensure_object_requires_map() {
        let validation = Validation::new();
        assert!(validation.ensure_object(Some(&json!({"name": "x"})), "definition").is_ok());
        let err = validation
            .ensure_object(Some(&json!([])), "definition")
            .unwrap_err();
        assert_eq!(err.message, "definition must be an object");
    }
}
