use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const GAME_VAR_PREFIX: &str = "GAMEVAR:";
const RANGE_PREFIX: &str = "RANGE:";

/// Loosely typed parameter bag attached to conditions and effects.
///
/// Every accessor is total: missing or malformed entries fall back to the
/// caller's default instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Params(Map<String, Value>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a bag from a JSON object; anything else yields an empty bag.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Non-empty string value. Numbers are rendered so `"5"` and `5` read alike.
    pub fn str(&self, key: &str) -> Option<String> {
        match self.0.get(key)? {
            Value::String(value) => {
                let trimmed = value.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Value::Number(value) => Some(value.to_string()),
            Value::Bool(value) => Some(value.to_string()),
            _ => None,
        }
    }

    pub fn str_or(&self, key: &str, default: &str) -> String {
        self.str(key).unwrap_or_else(|| default.to_string())
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        match self.0.get(key)? {
            Value::Number(value) => value.as_f64(),
            Value::String(value) => value.trim().parse::<f64>().ok(),
            Value::Bool(value) => Some(if *value { 1.0 } else { 0.0 }),
            _ => None,
        }
    }

    pub fn number_or(&self, key: &str, default: f64) -> f64 {
        self.number(key).unwrap_or(default)
    }

    pub fn bool_or(&self, key: &str, default: bool) -> bool {
        match self.0.get(key) {
            Some(Value::Bool(value)) => *value,
            Some(Value::String(value)) => match value.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => true,
                "false" | "no" | "0" => false,
                _ => default,
            },
            Some(Value::Number(value)) => value.as_f64().map(|v| v != 0.0).unwrap_or(default),
            _ => default,
        }
    }

    pub fn value(&self, key: &str) -> ParamValue {
        self.0
            .get(key)
            .map(ParamValue::from_json)
            .unwrap_or(ParamValue::Missing)
    }

    /// Like [`Params::value`] but substitutes a literal for missing entries.
    pub fn value_or(&self, key: &str, default: f64) -> ParamValue {
        match self.value(key) {
            ParamValue::Missing => ParamValue::Number(default),
            other => other,
        }
    }

    /// String list from a JSON array or a comma separated string.
    pub fn strings(&self, key: &str) -> Vec<String> {
        match self.0.get(key) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match item {
                    Value::String(value) => Some(value.trim().to_string()),
                    Value::Number(value) => Some(value.to_string()),
                    _ => None,
                })
                .filter(|value| !value.is_empty())
                .collect(),
            Some(Value::String(value)) => value
                .split(',')
                .map(|part| part.trim().to_string())
                .filter(|part| !part.is_empty())
                .collect(),
            _ => Vec::new(),
        }
    }
}

/// Decoded form of a numeric parameter slot.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Number(f64),
    Bool(bool),
    /// Name of a user variable declared on the item.
    Variable(String),
    GameVar {
        id: String,
        multiplier: f64,
        start_from: f64,
    },
    Range {
        min: f64,
        max: f64,
    },
    Missing,
}

impl ParamValue {
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Number(number) => number.as_f64().map(Self::Number).unwrap_or(Self::Missing),
            Value::Bool(flag) => Self::Bool(*flag),
            Value::String(text) => Self::parse(text),
            _ => Self::Missing,
        }
    }

    pub fn parse(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Self::Missing;
        }
        if let Some(rest) = trimmed.strip_prefix(GAME_VAR_PREFIX) {
            let mut parts = rest.split('|');
            let id = parts.next().unwrap_or_default().trim().to_string();
            let multiplier = parts
                .next()
                .and_then(|part| part.trim().parse::<f64>().ok())
                .unwrap_or(1.0);
            let start_from = parts
                .next()
                .and_then(|part| part.trim().parse::<f64>().ok())
                .unwrap_or(0.0);
            return Self::GameVar {
                id,
                multiplier,
                start_from,
            };
        }
        if let Some(rest) = trimmed.strip_prefix(RANGE_PREFIX) {
            let mut parts = rest.split('|');
            let min = parts
                .next()
                .and_then(|part| part.trim().parse::<f64>().ok())
                .unwrap_or(1.0);
            let max = parts
                .next()
                .and_then(|part| part.trim().parse::<f64>().ok())
                .unwrap_or(min);
            return Self::Range {
                min: min.min(max),
                max: min.max(max),
            };
        }
        if let Ok(number) = trimmed.parse::<f64>() {
            return Self::Number(number);
        }
        match trimmed {
            "true" => Self::Bool(true),
            "false" => Self::Bool(false),
            _ => Self::Variable(trimmed.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(value) => Some(*value),
            Self::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
            _ => None,
        }
    }
}
