//! Safe-navigation helpers over optional JSON values.

use serde_json::Value;

use crate::canonical::stringify;
use crate::error::TemplateError;

/// String shown in the UI for the boolean value `true`.
pub const TRUE_VALUE: &str = "true";

/// String shown in the UI for the boolean value `false`.
pub const FALSE_VALUE: &str = "false";

/// An optional borrowed JSON value that supports `get` chaining.
///
/// Every navigation step returns another `JsonOpt`; a miss at any point in
/// the path yields the empty wrapper instead of an error, and the explicit
/// conversions at the end return `None` rather than failing.
///
/// ```
/// use seiri::json::JsonOpt;
///
/// let value = serde_json::json!({"properties": {"title": "Sampler"}});
/// let title = JsonOpt::new(&value).get("properties").get("title").as_string();
/// assert_eq!(title.as_deref(), Some("Sampler"));
/// assert!(JsonOpt::new(&value).get("missing").get("title").is_none());
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonOpt<'a> {
    value: Option<&'a Value>,
}

impl<'a> JsonOpt<'a> {
    pub fn new(value: &'a Value) -> Self {
        Self { value: Some(value) }
    }

    pub const fn empty() -> Self {
        Self { value: None }
    }

    pub fn from_option(value: Option<&'a Value>) -> Self {
        Self { value }
    }

    /// Navigates into an object field, yielding the empty wrapper on any
    /// miss (absent value, absent key, or non-object).
    pub fn get(self, key: &str) -> Self {
        Self {
            value: self.value.and_then(|v| v.get(key)),
        }
    }

    pub fn value(self) -> Option<&'a Value> {
        self.value
    }

    pub fn is_none(self) -> bool {
        self.value.is_none()
    }

    /// Returns the wrapped array's elements, or empty for anything else.
    pub fn as_list(self) -> Vec<JsonOpt<'a>> {
        match self.value {
            Some(Value::Array(items)) => items.iter().map(JsonOpt::new).collect(),
            _ => Vec::new(),
        }
    }

    /// Renders the value as a display string.
    ///
    /// Strings convert directly (including the empty string); other values
    /// render only when truthy: `true`, non-zero numbers, and non-empty
    /// containers. `null`, `false`, zero, and empty containers yield `None`.
    pub fn as_string(self) -> Option<String> {
        match self.value? {
            Value::String(s) => Some(s.clone()),
            Value::Bool(true) => Some(TRUE_VALUE.to_string()),
            Value::Number(num) if !num.as_f64().is_some_and(|x| x == 0.0) => {
                Some(num.to_string())
            }
            Value::Array(items) if !items.is_empty() => self.value.map(stringify),
            Value::Object(map) if !map.is_empty() => self.value.map(stringify),
            _ => None,
        }
    }
}

/// Parses a UI widget string representing a boolean value.
pub fn parse_bool_str(string: &str) -> Result<bool, TemplateError> {
    match string {
        TRUE_VALUE => Ok(true),
        FALSE_VALUE => Ok(false),
        other => Err(TemplateError::InvalidBoolean(other.to_string())),
    }
}
