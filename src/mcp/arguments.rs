//! Typed tool-call arguments and validation against a tool's input schema.
//!
//! Backends emit arguments as free-form JSON. Before a call reaches the tool
//! server the arguments are narrowed to a closed set of value shapes and
//! checked against the JSON schema the server advertised for the tool.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use thiserror::Error;

/// A single argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgValue {
    Text(String),
    Integer(i64),
    Number(f64),
    Bool(bool),
    List(Vec<ArgValue>),
}

impl ArgValue {
    fn from_json(key: &str, value: Value) -> Result<Option<Self>, ArgumentError> {
        let converted = match value {
            Value::Null => return Ok(None),
            Value::String(s) => ArgValue::Text(s),
            Value::Bool(b) => ArgValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => ArgValue::Integer(i),
                None => ArgValue::Number(n.as_f64().ok_or_else(|| {
                    ArgumentError::UnsupportedValue {
                        key: key.to_string(),
                        kind: "number out of range",
                    }
                })?),
            },
            Value::Array(items) => {
                let mut list = Vec::with_capacity(items.len());
                for item in items {
                    match ArgValue::from_json(key, item)? {
                        Some(v) => list.push(v),
                        None => {
                            return Err(ArgumentError::UnsupportedValue {
                                key: key.to_string(),
                                kind: "null inside array",
                            })
                        }
                    }
                }
                ArgValue::List(list)
            }
            Value::Object(_) => {
                return Err(ArgumentError::UnsupportedValue {
                    key: key.to_string(),
                    kind: "object",
                })
            }
        };
        Ok(Some(converted))
    }

    pub fn to_json(&self) -> Value {
        match self {
            ArgValue::Text(s) => Value::String(s.clone()),
            ArgValue::Integer(i) => Value::from(*i),
            ArgValue::Number(n) => Value::from(*n),
            ArgValue::Bool(b) => Value::Bool(*b),
            ArgValue::List(items) => Value::Array(items.iter().map(ArgValue::to_json).collect()),
        }
    }

    /// Whether the value satisfies a JSON-schema `type` keyword.
    fn matches_type(&self, schema_type: &str) -> bool {
        match (schema_type, self) {
            ("string", ArgValue::Text(_)) => true,
            ("integer", ArgValue::Integer(_)) => true,
            ("number", ArgValue::Integer(_) | ArgValue::Number(_)) => true,
            ("boolean", ArgValue::Bool(_)) => true,
            ("array", ArgValue::List(_)) => true,
            // Nulls are dropped and nested objects rejected while parsing,
            // so a present value never satisfies either.
            ("null" | "object", _) => false,
            // Unknown type keywords are left to the server.
            (other, _) => !matches!(other, "string" | "integer" | "number" | "boolean" | "array"),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            ArgValue::Text(_) => "string",
            ArgValue::Integer(_) => "integer",
            ArgValue::Number(_) => "number",
            ArgValue::Bool(_) => "boolean",
            ArgValue::List(_) => "array",
        }
    }
}

/// Why a tool call's arguments were refused before invocation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ArgumentError {
    #[error("Invalid arguments: not valid JSON ({0})")]
    Malformed(String),

    #[error("Invalid arguments: expected a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("Invalid arguments: '{key}' has unsupported value ({kind})")]
    UnsupportedValue { key: String, kind: &'static str },

    #[error("Invalid arguments: missing required parameter '{0}'")]
    MissingRequired(String),

    #[error("Invalid arguments: unknown parameter '{0}'")]
    UnknownParameter(String),

    #[error("Invalid arguments: '{key}' should be {expected}, got {actual}")]
    TypeMismatch {
        key: String,
        expected: String,
        actual: &'static str,
    },

    #[error("Unknown tool '{0}'")]
    UnknownTool(String),
}

impl ArgumentError {
    /// Parameter the error is about, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            ArgumentError::UnsupportedValue { key, .. } | ArgumentError::TypeMismatch { key, .. } => {
                Some(key)
            }
            ArgumentError::MissingRequired(key) | ArgumentError::UnknownParameter(key) => Some(key),
            _ => None,
        }
    }
}

/// Arguments for one tool call, keyed by parameter name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolArguments(BTreeMap<String, ArgValue>);

impl ToolArguments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: ArgValue) -> Self {
        self.0.insert(key.into(), value);
        self
    }

    /// Parse the backend's argument text. An empty string means no arguments.
    pub fn from_json_str(raw: &str) -> Result<Self, ArgumentError> {
        if raw.trim().is_empty() {
            return Ok(Self::new());
        }
        let value: Value =
            serde_json::from_str(raw).map_err(|e| ArgumentError::Malformed(e.to_string()))?;
        Self::from_json(value)
    }

    pub fn from_json(value: Value) -> Result<Self, ArgumentError> {
        let object = match value {
            Value::Object(map) => map,
            Value::Null => return Ok(Self::new()),
            Value::Array(_) => return Err(ArgumentError::NotAnObject("array")),
            Value::String(_) => return Err(ArgumentError::NotAnObject("string")),
            Value::Number(_) => return Err(ArgumentError::NotAnObject("number")),
            Value::Bool(_) => return Err(ArgumentError::NotAnObject("boolean")),
        };

        let mut args = BTreeMap::new();
        for (key, value) in object {
            if let Some(v) = ArgValue::from_json(&key, value)? {
                args.insert(key, v);
            }
        }
        Ok(Self(args))
    }

    pub fn get(&self, key: &str) -> Option<&ArgValue> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_json_object(&self) -> Map<String, Value> {
        self.0
            .iter()
            .map(|(k, v)| (k.clone(), v.to_json()))
            .collect()
    }

    /// Check the arguments against a JSON-schema object (`properties`,
    /// `required`, `additionalProperties`).
    pub fn validate(&self, schema: &Map<String, Value>) -> Result<(), ArgumentError> {
        let properties = schema.get("properties").and_then(Value::as_object);

        if let Some(required) = schema.get("required").and_then(Value::as_array) {
            for name in required.iter().filter_map(Value::as_str) {
                if !self.0.contains_key(name) {
                    return Err(ArgumentError::MissingRequired(name.to_string()));
                }
            }
        }

        let closed = schema
            .get("additionalProperties")
            .and_then(Value::as_bool)
            .map(|allowed| !allowed)
            .unwrap_or(false);

        for (key, value) in &self.0 {
            let Some(property) = properties.and_then(|p| p.get(key)) else {
                if closed {
                    return Err(ArgumentError::UnknownParameter(key.clone()));
                }
                continue;
            };
            check_type(key, value, property)?;
        }
        Ok(())
    }
}

fn check_type(key: &str, value: &ArgValue, property: &Value) -> Result<(), ArgumentError> {
    let allowed: Vec<&str> = match property.get("type") {
        Some(Value::String(t)) => vec![t.as_str()],
        Some(Value::Array(types)) => types.iter().filter_map(Value::as_str).collect(),
        _ => return Ok(()),
    };

    if allowed.is_empty() || allowed.iter().any(|t| value.matches_type(t)) {
        if let (ArgValue::List(items), Some(item_schema)) = (value, property.get("items")) {
            for item in items {
                check_type(key, item, item_schema)?;
            }
        }
        return Ok(());
    }

    Err(ArgumentError::TypeMismatch {
        key: key.to_string(),
        expected: allowed.join(" or "),
        actual: value.kind(),
    })
}
