use crate::constants::limits::MAX_SUGGESTIONS;
use crate::errors::ToolError;
use crate::mcp::aliases::builtin_tool_aliases;
use crate::utils::suggest::suggest;
use jsonschema::JSONSchema;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDef {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

static TOOL_CATALOG: Lazy<Vec<ToolDef>> = Lazy::new(|| {
    let raw = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tool_catalog.json"));
    serde_json::from_str(raw).expect("tool_catalog.json must be valid JSON")
});

static TOOL_MAP: Lazy<HashMap<String, ToolDef>> = Lazy::new(|| {
    TOOL_CATALOG
        .iter()
        .cloned()
        .map(|tool| (tool.name.clone(), tool))
        .collect()
});

static TOOL_VALIDATORS: Lazy<HashMap<String, JSONSchema>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for tool in TOOL_CATALOG.iter() {
        if let Ok(schema) = JSONSchema::compile(&tool.input_schema) {
            map.insert(tool.name.clone(), schema);
        }
    }
    map
});

/// Accepted on every tool but hidden from the published schemas.
const TOOL_SEMANTIC_FIELDS: &[&str] = &["trace_id"];

pub fn tool_catalog() -> &'static Vec<ToolDef> {
    &TOOL_CATALOG
}

pub fn tool_by_name(name: &str) -> Option<&'static ToolDef> {
    TOOL_MAP.get(name)
}

pub fn validate_tool_args(tool_name: &str, args: &Value) -> Result<(), ToolError> {
    let Some(tool) = tool_by_name(tool_name) else {
        return Ok(());
    };
    let Some(schema) = TOOL_VALIDATORS.get(tool_name) else {
        return Ok(());
    };
    if let Err(errors) = schema.validate(args) {
        let message = format_schema_errors(tool_name, args, errors, &tool.input_schema);
        return Err(ToolError::invalid_params(message));
    }
    Ok(())
}

fn format_schema_errors(
    tool_name: &str,
    args: &Value,
    errors: jsonschema::ErrorIterator,
    schema: &Value,
) -> String {
    let mut lines = vec![match args.get("action").and_then(|v| v.as_str()) {
        Some(action) => format!("Invalid arguments for {}:{}", tool_name, action),
        None => format!("Invalid arguments for {}", tool_name),
    }];
    let fields: Vec<String> = schema
        .get("properties")
        .and_then(|v| v.as_object())
        .map(|props| props.keys().cloned().collect())
        .unwrap_or_default();

    let mut hints = Vec::new();
    for err in errors.take(10) {
        let at = match err.instance_path.to_string() {
            path if path.is_empty() => "(root)".to_string(),
            path => path,
        };
        for (problem, hint) in describe_violation(&at, &err, &fields) {
            lines.push(format!("- {}", problem));
            hints.extend(hint);
        }
    }
    if !hints.is_empty() {
        lines.push(format!("Did you mean: {}", hints.join(" | ")));
    }
    lines.join("\n")
}

/// One rendered problem per offending value, with an optional correction.
fn describe_violation(
    at: &str,
    err: &jsonschema::ValidationError<'_>,
    fields: &[String],
) -> Vec<(String, Option<String>)> {
    use jsonschema::error::ValidationErrorKind as Kind;

    let closest = |input: &str, candidates: &[String]| {
        let found = suggest(input, candidates, MAX_SUGGESTIONS);
        (!found.is_empty()).then(|| found.join(", "))
    };

    match &err.kind {
        Kind::AdditionalProperties { unexpected } => unexpected
            .iter()
            .map(|field| {
                (
                    format!("{}: unknown field '{}'", at, field),
                    closest(field.as_str(), fields).map(|s| format!("field '{}': {}", field, s)),
                )
            })
            .collect(),
        Kind::Enum { options } => {
            let allowed: Vec<String> = options
                .as_array()
                .into_iter()
                .flatten()
                .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                .collect();
            let received = err.instance.as_str().unwrap_or("");
            vec![(
                format!("{}: expected one of {}", at, allowed.join(", ")),
                closest(received, allowed.as_slice()).map(|s| format!("{}: {}", at, s)),
            )]
        }
        Kind::Required { property } => {
            let name = property
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| property.to_string());
            vec![(format!("{}: missing required field '{}'", at, name), None)]
        }
        Kind::Type { kind } => {
            let expected = match kind {
                jsonschema::error::TypeKind::Single(primitive) => primitive.to_string(),
                jsonschema::error::TypeKind::Multiple(types) => (*types)
                    .into_iter()
                    .map(|t| t.to_string())
                    .collect::<Vec<_>>()
                    .join(" | "),
            };
            vec![(format!("{}: expected {}", at, expected), None)]
        }
        _ => vec![(format!("{}: {}", at, err), None)],
    }
}

pub fn strip_tool_semantic_fields(schema: &Value) -> Value {
    let Some(obj) = schema.as_object() else {
        return schema.clone();
    };
    let mut out = obj.clone();
    if let Some(props) = out.get_mut("properties").and_then(|v| v.as_object_mut()) {
        for key in TOOL_SEMANTIC_FIELDS {
            props.remove(*key);
        }
    }
    Value::Object(out)
}

/// Published tool list: catalog tools followed by their short aliases.
pub fn list_tools() -> Vec<ToolDef> {
    let mut tools: Vec<ToolDef> = TOOL_CATALOG
        .iter()
        .map(|tool| ToolDef {
            name: tool.name.clone(),
            description: tool.description.clone(),
            input_schema: strip_tool_semantic_fields(&tool.input_schema),
        })
        .collect();

    let mut names: HashSet<String> = tools.iter().map(|tool| tool.name.clone()).collect();
    for (alias, target) in builtin_tool_aliases() {
        if names.contains(*alias) {
            continue;
        }
        let Some(target_tool) = tools.iter().find(|tool| tool.name == *target) else {
            continue;
        };
        let alias_def = ToolDef {
            name: (*alias).to_string(),
            description: format!("Alias for {}.", target),
            input_schema: target_tool.input_schema.clone(),
        };
        tools.push(alias_def);
        names.insert((*alias).to_string());
    }
    tools
}
