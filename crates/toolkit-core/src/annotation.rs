// Annotations: error / warning / notice commands with an optional source
// location.

use serde::{Deserialize, Serialize};

use crate::command_value::CommandValue;
use crate::constants::commands;
use crate::error::CommandError;

/// Severity of an annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationKind {
    Error,
    Warning,
    Notice,
}

impl AnnotationKind {
    pub fn command(self) -> &'static str {
        match self {
            AnnotationKind::Error => commands::ERROR,
            AnnotationKind::Warning => commands::WARNING,
            AnnotationKind::Notice => commands::NOTICE,
        }
    }
}

/// Where an annotation points. Every field is optional and absent fields are
/// omitted from the command; no defaults are computed here.
///
/// The serde form uses the long key names (`startLine`, `startColumn`, ...),
/// while the stdout command uses the short ones (`line`, `col`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_line: Option<u32>,
    /// Defaults to `start_line` on the runner side.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_line: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_column: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_column: Option<u32>,
}

impl AnnotationProperties {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Properties for the stdout command, in `title, file, line, endLine,
    /// col, endCol` order, with absent fields left out.
    pub fn to_command_properties(&self) -> Vec<(String, CommandValue)> {
        let entries: [(&str, CommandValue); 6] = [
            ("title", self.title.as_deref().into()),
            ("file", self.file.as_deref().into()),
            ("line", self.start_line.into()),
            ("endLine", self.end_line.into()),
            ("col", self.start_column.into()),
            ("endCol", self.end_column.into()),
        ];
        entries
            .into_iter()
            .filter(|(_, value)| !value.is_null())
            .map(|(key, value)| (key.to_string(), value))
            .collect()
    }
}

/// The body of an annotation: free text or the rendering of an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationMessage {
    Text(String),
    Failure(String),
}

impl AnnotationMessage {
    /// Capture an error's display form.
    pub fn from_error<E: std::error::Error + ?Sized>(error: &E) -> Self {
        AnnotationMessage::Failure(error.to_string())
    }

    pub fn as_str(&self) -> &str {
        match self {
            AnnotationMessage::Text(text) | AnnotationMessage::Failure(text) => text,
        }
    }
}

impl From<&str> for AnnotationMessage {
    fn from(value: &str) -> Self {
        AnnotationMessage::Text(value.to_string())
    }
}

impl From<String> for AnnotationMessage {
    fn from(value: String) -> Self {
        AnnotationMessage::Text(value)
    }
}

impl From<&String> for AnnotationMessage {
    fn from(value: &String) -> Self {
        AnnotationMessage::Text(value.clone())
    }
}

/// Only text can become an annotation body; structured values and null are
/// rejected instead of being stringified.
impl TryFrom<CommandValue> for AnnotationMessage {
    type Error = CommandError;

    fn try_from(value: CommandValue) -> Result<Self, CommandError> {
        match value {
            CommandValue::String(text) => Ok(AnnotationMessage::Text(text)),
            other => Err(CommandError::UnsupportedMessageType(other.kind())),
        }
    }
}
