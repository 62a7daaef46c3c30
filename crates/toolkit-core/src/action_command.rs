// ActionCommand: the stdout form of a workflow command.
// Builds `::command key=val,key2=val2::data` lines and parses them back.

use std::collections::{HashMap, HashSet};

use crate::command_value::CommandValue;
use crate::constants::commands::MISSING_COMMAND;
use crate::error::Result;

/// The command delimiter (`::`) used both as prefix and as separator.
pub const COMMAND_KEY: &str = "::";

// ---------------------------------------------------------------------------
// Escape mappings
// ---------------------------------------------------------------------------

struct EscapeMapping {
    token: &'static str,
    replacement: &'static str,
}

/// Data escape mappings. `%` must stay first when escaping.
const ESCAPE_DATA_MAPPINGS: &[EscapeMapping] = &[
    EscapeMapping { token: "%",  replacement: "%25" },
    EscapeMapping { token: "\r", replacement: "%0D" },
    EscapeMapping { token: "\n", replacement: "%0A" },
];

/// Property escape mappings. `%` must stay first when escaping.
const ESCAPE_PROPERTY_MAPPINGS: &[EscapeMapping] = &[
    EscapeMapping { token: "%",  replacement: "%25" },
    EscapeMapping { token: "\r", replacement: "%0D" },
    EscapeMapping { token: "\n", replacement: "%0A" },
    EscapeMapping { token: ":",  replacement: "%3A" },
    EscapeMapping { token: ",",  replacement: "%2C" },
];

fn escape_with(value: &str, mappings: &[EscapeMapping]) -> String {
    mappings.iter().fold(value.to_string(), |acc, mapping| {
        acc.replace(mapping.token, mapping.replacement)
    })
}

/// Reverse of `escape_with`: `%25` is restored last so that `%250A` becomes
/// `%0A` and not a newline.
fn unescape_with(escaped: &str, mappings: &[EscapeMapping]) -> String {
    mappings.iter().rev().fold(escaped.to_string(), |acc, mapping| {
        acc.replace(mapping.replacement, mapping.token)
    })
}

/// Escape command data (the part after the second `::`).
pub fn escape_data(value: &str) -> String {
    escape_with(value, ESCAPE_DATA_MAPPINGS)
}

/// Escape a property value.
pub fn escape_property(value: &str) -> String {
    escape_with(value, ESCAPE_PROPERTY_MAPPINGS)
}

pub fn unescape_data(escaped: &str) -> String {
    unescape_with(escaped, ESCAPE_DATA_MAPPINGS)
}

pub fn unescape_property(escaped: &str) -> String {
    unescape_with(escaped, ESCAPE_PROPERTY_MAPPINGS)
}

// ---------------------------------------------------------------------------
// Issuing
// ---------------------------------------------------------------------------

/// A workflow command waiting to be written to stdout.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionCommand {
    /// The command name (e.g. "error", "set-output", "add-mask").
    pub command: String,
    /// Properties in emission order. `Null` values are skipped.
    pub properties: Vec<(String, CommandValue)>,
    /// The command data / body.
    pub message: CommandValue,
}

impl ActionCommand {
    /// Create a command. An empty name becomes `missing.command`.
    pub fn new(command: impl Into<String>, message: impl Into<CommandValue>) -> Self {
        let mut command = command.into();
        if command.is_empty() {
            command = MISSING_COMMAND.to_string();
        }
        Self {
            command,
            properties: Vec::new(),
            message: message.into(),
        }
    }

    /// Append a property.
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<CommandValue>) -> Self {
        self.properties.push((key.into(), value.into()));
        self
    }

    /// Append several properties.
    pub fn with_properties<I>(mut self, properties: I) -> Self
    where
        I: IntoIterator<Item = (String, CommandValue)>,
    {
        self.properties.extend(properties);
        self
    }

    /// True when the command was created without a name.
    pub fn is_missing(&self) -> bool {
        self.command == MISSING_COMMAND
    }

    /// Render the command line, without the trailing line ending.
    pub fn to_command_string(&self) -> Result<String> {
        let mut line = format!("{COMMAND_KEY}{}", self.command);

        let mut rendered = Vec::with_capacity(self.properties.len());
        for (key, value) in &self.properties {
            if value.is_null() {
                continue;
            }
            rendered.push(format!("{key}={}", escape_property(&value.to_command_value()?)));
        }
        if !rendered.is_empty() {
            line.push(' ');
            line.push_str(&rendered.join(","));
        }

        line.push_str(COMMAND_KEY);
        line.push_str(&escape_data(&self.message.to_command_value()?));
        Ok(line)
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// A workflow command read back from a stdout line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCommand {
    pub command: String,
    pub properties: HashMap<String, String>,
    pub data: String,
}

impl ParsedCommand {
    /// Try to parse a command line of the form
    /// `::command-name key=value,key2=value2::body data`.
    ///
    /// Returns `None` for plain log lines and for commands not in
    /// `registered_commands`.
    pub fn try_parse(message: &str, registered_commands: &HashSet<&str>) -> Option<ParsedCommand> {
        let message = message.trim_start();
        let after_prefix = message.strip_prefix(COMMAND_KEY)?;

        // Find the second `::` that separates command info from data.
        let end_index = after_prefix.find(COMMAND_KEY)?;
        let cmd_info = &after_prefix[..end_index];

        let (command_name, properties_str) = match cmd_info.split_once(' ') {
            Some((name, props)) => (name, Some(props.trim())),
            None => (cmd_info, None),
        };

        if !registered_commands.contains(command_name) {
            return None;
        }

        let mut properties = HashMap::new();
        for entry in properties_str.unwrap_or_default().split(',') {
            let entry = entry.trim();
            if let Some((key, value)) = entry.split_once('=') {
                if !key.is_empty() && !value.is_empty() {
                    properties.insert(key.to_string(), unescape_property(value));
                }
            }
        }

        let data = after_prefix[end_index + COMMAND_KEY.len()..]
            .trim_end_matches(&['\r', '\n'][..]);

        Some(ParsedCommand {
            command: command_name.to_string(),
            properties,
            data: unescape_data(data),
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn registered(names: &[&'static str]) -> HashSet<&'static str> {
        names.iter().copied().collect()
    }

    #[test]
    fn command_only() {
        let cmd = ActionCommand::new("some-command", "");
        assert_eq!(cmd.to_command_string().unwrap(), "::some-command::");
    }

    #[test]
    fn escapes_message() {
        let cmd = ActionCommand::new(
            "some-command",
            "percent % percent % cr \r cr \r lf \n lf \n",
        );
        assert_eq!(
            cmd.to_command_string().unwrap(),
            "::some-command::percent %25 percent %25 cr %0D cr %0D lf %0A lf %0A"
        );

        let cmd = ActionCommand::new("some-command", "%25 %25 %0D %0D %0A %0A");
        assert_eq!(
            cmd.to_command_string().unwrap(),
            "::some-command::%2525 %2525 %250D %250D %250A %250A"
        );
    }

    #[test]
    fn escapes_property() {
        let cmd = ActionCommand::new("some-command", "").with_property(
            "name",
            "percent % percent % cr \r cr \r lf \n lf \n colon : colon : comma , comma ,",
        );
        assert_eq!(
            cmd.to_command_string().unwrap(),
            "::some-command name=percent %25 percent %25 cr %0D cr %0D lf %0A lf %0A \
             colon %3A colon %3A comma %2C comma %2C::"
        );
    }

    #[test]
    fn data_escaping_leaves_colons_and_commas() {
        assert_eq!(escape_data("a:b,c"), "a:b,c");
        assert_eq!(escape_property("a:b,c"), "a%3Ab%2Cc");
    }

    #[test]
    fn escaping_is_not_idempotent() {
        assert_eq!(escape_data("%0D"), "%250D");
        assert_eq!(escape_data(&escape_data("\n")), "%250A");
    }

    #[test]
    fn null_properties_are_skipped() {
        let cmd = ActionCommand::new("warning", "msg")
            .with_property("title", CommandValue::Null)
            .with_property("file", "a.rs")
            .with_property("line", CommandValue::Null);
        assert_eq!(cmd.to_command_string().unwrap(), "::warning file=a.rs::msg");
    }

    #[test]
    fn all_null_properties_render_no_space() {
        let cmd = ActionCommand::new("notice", "m").with_property("title", CommandValue::Null);
        assert_eq!(cmd.to_command_string().unwrap(), "::notice::m");
    }

    #[test]
    fn properties_keep_insertion_order() {
        let cmd = ActionCommand::new("error", "x")
            .with_property("z", "1")
            .with_property("a", 2u32);
        assert_eq!(cmd.to_command_string().unwrap(), "::error z=1,a=2::x");
    }

    #[test]
    fn structured_message_is_json_then_escaped() {
        let cmd = ActionCommand::new("debug", json!({"k": "a\nb"}));
        assert_eq!(cmd.to_command_string().unwrap(), "::debug::{\"k\":\"a\\nb\"}");
    }

    #[test]
    fn empty_name_uses_sentinel() {
        let cmd = ActionCommand::new("", "x");
        assert!(cmd.is_missing());
        assert_eq!(cmd.command, "missing.command");
    }

    #[test]
    fn parse_simple() {
        let cmd = ParsedCommand::try_parse("::error::something went wrong", &registered(&["error"]))
            .unwrap();
        assert_eq!(cmd.command, "error");
        assert_eq!(cmd.data, "something went wrong");
        assert!(cmd.properties.is_empty());
    }

    #[test]
    fn parse_with_properties() {
        let cmd = ParsedCommand::try_parse(
            "::error file=app.js,line=10::something wrong",
            &registered(&["error"]),
        )
        .unwrap();
        assert_eq!(cmd.properties.get("file").map(String::as_str), Some("app.js"));
        assert_eq!(cmd.properties.get("line").map(String::as_str), Some("10"));
    }

    #[test]
    fn parse_unregistered_command() {
        assert!(ParsedCommand::try_parse("::error::data", &registered(&["warning"])).is_none());
        assert!(ParsedCommand::try_parse("plain log line", &registered(&["error"])).is_none());
        assert!(ParsedCommand::try_parse("", &registered(&["error"])).is_none());
    }

    #[test]
    fn issued_command_parses_back() {
        let cmd = ActionCommand::new("set-output", "line1\nline2\r%done")
            .with_property("name", "a:b,c");
        let line = cmd.to_command_string().unwrap();
        let parsed = ParsedCommand::try_parse(&line, &registered(&["set-output"])).unwrap();
        assert_eq!(parsed.data, "line1\nline2\r%done");
        assert_eq!(parsed.properties.get("name").map(String::as_str), Some("a:b,c"));
    }

    #[test]
    fn unescape_restores_percent_last() {
        assert_eq!(unescape_data("%250A"), "%0A");
        assert_eq!(unescape_property("%253A%3A"), "%3A:");
    }
}
