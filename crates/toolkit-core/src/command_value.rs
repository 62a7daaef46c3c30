// CommandValue: the canonical string form of anything handed to a workflow
// command. Strings pass through untouched, everything else is JSON.

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;

/// A value passed to a workflow command.
///
/// `Null` renders as the empty string and is skipped entirely when used as a
/// command property. `String` is emitted verbatim, even when it looks like
/// JSON. `Structured` is rendered with `serde_json`.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum CommandValue {
    #[default]
    Null,
    String(String),
    Structured(Value),
}

impl CommandValue {
    /// Encode any serializable value.
    ///
    /// A value that serializes to a JSON string or `null` becomes `String` or
    /// `Null`, so `from_serialize(&"x")` behaves exactly like `"x".into()`.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(serde_json::to_value(value)?.into())
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CommandValue::Null)
    }

    /// Render the value in its command form. No escaping is applied.
    pub fn to_command_value(&self) -> Result<String> {
        match self {
            CommandValue::Null => Ok(String::new()),
            CommandValue::String(s) => Ok(s.clone()),
            CommandValue::Structured(v) => Ok(serde_json::to_string(v)?),
        }
    }

    /// Short description of the variant, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            CommandValue::Null => "null",
            CommandValue::String(_) => "string",
            CommandValue::Structured(Value::Bool(_)) => "boolean",
            CommandValue::Structured(Value::Number(_)) => "number",
            CommandValue::Structured(Value::Array(_)) => "array",
            CommandValue::Structured(_) => "object",
        }
    }
}

impl From<Value> for CommandValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => CommandValue::Null,
            Value::String(s) => CommandValue::String(s),
            other => CommandValue::Structured(other),
        }
    }
}

impl From<&str> for CommandValue {
    fn from(value: &str) -> Self {
        CommandValue::String(value.to_string())
    }
}

impl From<String> for CommandValue {
    fn from(value: String) -> Self {
        CommandValue::String(value)
    }
}

impl From<&String> for CommandValue {
    fn from(value: &String) -> Self {
        CommandValue::String(value.clone())
    }
}

impl From<bool> for CommandValue {
    fn from(value: bool) -> Self {
        CommandValue::Structured(Value::Bool(value))
    }
}

macro_rules! impl_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for CommandValue {
                fn from(value: $ty) -> Self {
                    CommandValue::Structured(Value::from(value))
                }
            }
        )*
    };
}

impl_from_number!(i32, i64, u32, u64, usize);

impl From<f64> for CommandValue {
    fn from(value: f64) -> Self {
        // Non-finite floats have no JSON form; serde_json maps them to null.
        Value::from(value).into()
    }
}

impl<T: Into<CommandValue>> From<Option<T>> for CommandValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::BTreeMap;

    #[test]
    fn null_is_empty_string() {
        assert_eq!(CommandValue::Null.to_command_value().unwrap(), "");
        let none: Option<&str> = None;
        assert_eq!(CommandValue::from(none), CommandValue::Null);
    }

    #[test]
    fn string_passes_through_unquoted() {
        let value = CommandValue::from("{\"looks\": \"like json\"}");
        assert_eq!(value.to_command_value().unwrap(), "{\"looks\": \"like json\"}");
    }

    #[test]
    fn structured_values_are_json() {
        assert_eq!(CommandValue::from(true).to_command_value().unwrap(), "true");
        assert_eq!(CommandValue::from(42u32).to_command_value().unwrap(), "42");
        let value = CommandValue::from(json!({"a": [1, 2], "b": null}));
        assert_eq!(value.to_command_value().unwrap(), "{\"a\":[1,2],\"b\":null}");
    }

    #[test]
    fn from_serialize_normalizes_strings_and_null() {
        assert_eq!(
            CommandValue::from_serialize("plain").unwrap(),
            CommandValue::String("plain".into())
        );
        assert_eq!(
            CommandValue::from_serialize(&Option::<u8>::None).unwrap(),
            CommandValue::Null
        );
    }

    #[test]
    fn from_serialize_struct() {
        #[derive(Serialize)]
        struct Build {
            target: &'static str,
            jobs: u8,
        }
        let value = CommandValue::from_serialize(&Build { target: "x86_64", jobs: 4 }).unwrap();
        assert_eq!(
            value.to_command_value().unwrap(),
            "{\"target\":\"x86_64\",\"jobs\":4}"
        );
    }

    #[test]
    fn from_serialize_failure_is_reported() {
        let mut map = BTreeMap::new();
        map.insert(vec![1u8, 2], "non-string key");
        let err = CommandValue::from_serialize(&map).unwrap_err();
        assert!(matches!(err, crate::CommandError::Serialization(_)));
    }

    #[test]
    fn kind_names() {
        assert_eq!(CommandValue::from(1i64).kind(), "number");
        assert_eq!(CommandValue::from(json!([1])).kind(), "array");
        assert_eq!(CommandValue::from(json!({})).kind(), "object");
        assert_eq!(CommandValue::from("s").kind(), "string");
    }
}
