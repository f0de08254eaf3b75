use crate::constants::limits::MAX_SUGGESTIONS;
use crate::errors::ToolError;
use crate::utils::suggest::suggest;
use serde_json::Value;

pub fn unknown_action_error(tool: &str, action: Option<&Value>, known_actions: &[&str]) -> ToolError {
    let action_value = action
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string();
    let known: Vec<String> = known_actions.iter().map(|s| s.to_string()).collect();
    let suggestions = suggest(&action_value, &known, MAX_SUGGESTIONS);

    let mut hint = format!("Use one of: {}.", known.join(", "));
    if !suggestions.is_empty() {
        hint = format!("Did you mean: {}? {}", suggestions.join(", "), hint);
    }

    ToolError::invalid_params(format!("Unknown {} action: {}", tool, action_value))
        .with_hint(hint)
        .with_details(serde_json::json!({
            "known_actions": known,
            "did_you_mean": suggestions,
        }))
}
