use crate::utils::text::truncate_utf8_prefix;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};

pub const CONFIG_MARKER: &str = "***";
pub const NOTIFIER_MARKER: &str = "***REDACTED***";

/// Masks storage and database connection configs.
pub static CONFIG_REDACTOR: Lazy<Redactor> = Lazy::new(|| {
    Redactor::new(
        ["password", "secret", "key", "token", "credential", "url"],
        CONFIG_MARKER,
    )
});

/// Masks notification channel configs (bot tokens, webhook URLs).
pub static NOTIFIER_REDACTOR: Lazy<Redactor> = Lazy::new(|| {
    Redactor::new(
        [
            "password",
            "secret",
            "key",
            "token",
            "credential",
            "url",
            "webhook",
        ],
        NOTIFIER_MARKER,
    )
});

static INLINE_REDACTION_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (
            Regex::new(r"\b(Bearer)\s+([A-Za-z0-9._~+/=-]{8,})").expect("inline redaction regex"),
            "$1 ***REDACTED***",
        ),
        (
            Regex::new(r"\beyJ[a-zA-Z0-9_-]{10,}\.[a-zA-Z0-9_-]{10,}\.[a-zA-Z0-9_-]{10,}\b")
                .expect("inline redaction regex"),
            NOTIFIER_MARKER,
        ),
        (
            Regex::new(r"\b(AKIA|ASIA)[0-9A-Z]{16}\b").expect("inline redaction regex"),
            "AKIA***REDACTED***",
        ),
        (
            Regex::new(r#"(?i)\b(password|passwd|token|api[_-]?key|secret|access[_-]?key)\b\s*([:=])\s*([^\s"'`&]+)"#)
                .expect("inline redaction regex"),
            "$1$2***REDACTED***",
        ),
    ]
});

/// Keyword-driven masking of freeform configuration maps.
///
/// A key matches when its lower-cased form contains any keyword. Only string
/// values under matching keys are masked; nested objects are walked at every
/// depth, and objects inside arrays are walked as well.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redactor {
    keywords: Vec<String>,
    marker: String,
}

impl Redactor {
    pub fn new<I, S>(keywords: I, marker: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().trim().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
            marker: marker.into(),
        }
    }

    pub fn is_sensitive_key(&self, key: &str) -> bool {
        let normalized = key.to_lowercase();
        self.keywords.iter().any(|k| normalized.contains(k.as_str()))
    }

    pub fn redact_map(&self, map: &Map<String, Value>) -> Map<String, Value> {
        map.iter()
            .map(|(key, value)| {
                let redacted = match value {
                    Value::String(_) if self.is_sensitive_key(key) => {
                        Value::String(self.marker.clone())
                    }
                    other => self.redact(other),
                };
                (key.clone(), redacted)
            })
            .collect()
    }

    /// Non-container values come back unchanged.
    pub fn redact(&self, value: &Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(self.redact_map(map)),
            Value::Array(items) => Value::Array(items.iter().map(|v| self.redact(v)).collect()),
            other => other.clone(),
        }
    }
}

fn redact_inline_secrets(value: &str) -> String {
    let mut out = value.to_string();
    for (re, replacement) in INLINE_REDACTION_PATTERNS.iter() {
        if re.is_match(&out) {
            out = re.replace_all(&out, *replacement).to_string();
        }
    }
    out
}

/// Scrubs credential-looking fragments from free text before it is logged.
pub fn redact_text(value: &str, max_bytes: usize) -> String {
    let redacted = redact_inline_secrets(value);
    if redacted.len() <= max_bytes {
        return redacted;
    }
    format!("{}...", truncate_utf8_prefix(&redacted, max_bytes))
}
