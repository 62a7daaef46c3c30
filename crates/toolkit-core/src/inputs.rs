// Action inputs and saved state, read from the injected environment.

use crate::command_channel::CommandChannel;
use crate::constants::variables;
use crate::error::{CommandError, Result};

/// Options for the input accessors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputOptions {
    /// Fail when the input is missing or empty.
    pub required: bool,
    /// Trim leading and trailing whitespace.
    pub trim_whitespace: bool,
}

impl Default for InputOptions {
    fn default() -> Self {
        Self {
            required: false,
            trim_whitespace: true,
        }
    }
}

impl InputOptions {
    pub fn required() -> Self {
        Self {
            required: true,
            ..Self::default()
        }
    }
}

/// `INPUT_<NAME>`: upper-cased, spaces replaced with `_`.
pub fn input_variable_name(name: &str) -> String {
    format!("{}{}", variables::INPUT_PREFIX, name.replace(' ', "_").to_uppercase())
}

impl CommandChannel {
    /// Value of an action input.
    pub fn get_input(&self, name: &str, options: &InputOptions) -> Result<String> {
        let value = self
            .environment()
            .var(&input_variable_name(name))
            .unwrap_or_default();

        if options.required && value.is_empty() {
            return Err(CommandError::InputRequired(name.to_string()));
        }

        if options.trim_whitespace {
            Ok(value.trim().to_string())
        } else {
            Ok(value)
        }
    }

    /// Non-empty lines of a multiline input.
    pub fn get_multiline_input(&self, name: &str, options: &InputOptions) -> Result<Vec<String>> {
        let value = self.get_input(name, options)?;
        Ok(value
            .split('\n')
            .filter(|line| !line.is_empty())
            .map(|line| {
                if options.trim_whitespace {
                    line.trim().to_string()
                } else {
                    line.to_string()
                }
            })
            .collect())
    }

    /// A boolean input following the YAML 1.2 core schema.
    pub fn get_boolean_input(&self, name: &str, options: &InputOptions) -> Result<bool> {
        let value = self.get_input(name, options)?;
        match value.as_str() {
            "true" | "True" | "TRUE" => Ok(true),
            "false" | "False" | "FALSE" => Ok(false),
            _ => Err(CommandError::InvalidBoolean(name.to_string())),
        }
    }

    /// State saved by the main step, or the empty string.
    pub fn get_state(&self, name: &str) -> String {
        self.environment()
            .var(&format!("{}{name}", variables::STATE_PREFIX))
            .unwrap_or_default()
    }

    /// Whether step debug logging is enabled.
    pub fn is_debug(&self) -> bool {
        self.environment().var(variables::RUNNER_DEBUG).as_deref() == Some("1")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::SharedBuffer;
    use crate::environment::MapEnvironment;
    use std::sync::Arc;

    fn channel(env: MapEnvironment) -> CommandChannel {
        CommandChannel::new(Arc::new(env), Box::new(SharedBuffer::new()))
    }

    #[test]
    fn variable_name_mangling() {
        assert_eq!(input_variable_name("my input"), "INPUT_MY_INPUT");
        assert_eq!(input_variable_name("token"), "INPUT_TOKEN");
    }

    #[test]
    fn get_input_trims_by_default() {
        let c = channel(MapEnvironment::new().with("INPUT_MY_INPUT", "  value \n"));
        assert_eq!(c.get_input("my input", &InputOptions::default()).unwrap(), "value");
        let raw = InputOptions {
            trim_whitespace: false,
            ..Default::default()
        };
        assert_eq!(c.get_input("my input", &raw).unwrap(), "  value \n");
    }

    #[test]
    fn get_input_missing_is_empty_unless_required() {
        let c = channel(MapEnvironment::new());
        assert_eq!(c.get_input("absent", &InputOptions::default()).unwrap(), "");
        let err = c.get_input("absent", &InputOptions::required()).unwrap_err();
        assert!(matches!(err, CommandError::InputRequired(name) if name == "absent"));
    }

    #[test]
    fn multiline_input_drops_empty_lines() {
        let c = channel(MapEnvironment::new().with("INPUT_FILES", "a.txt\n\n  b.txt  \nc.txt"));
        assert_eq!(
            c.get_multiline_input("files", &InputOptions::default()).unwrap(),
            ["a.txt", "b.txt", "c.txt"]
        );
    }

    #[test]
    fn boolean_input_core_schema() {
        let c = channel(
            MapEnvironment::new()
                .with("INPUT_A", "True")
                .with("INPUT_B", "FALSE")
                .with("INPUT_C", "yes"),
        );
        let opts = InputOptions::default();
        assert!(c.get_boolean_input("a", &opts).unwrap());
        assert!(!c.get_boolean_input("b", &opts).unwrap());
        let err = c.get_boolean_input("c", &opts).unwrap_err();
        assert!(matches!(err, CommandError::InvalidBoolean(_)));
        assert!(err.to_string().contains("true | True | TRUE"));
    }

    #[test]
    fn state_and_debug() {
        let c = channel(
            MapEnvironment::new()
                .with("STATE_pid", "1234")
                .with("RUNNER_DEBUG", "1"),
        );
        assert_eq!(c.get_state("pid"), "1234");
        assert_eq!(c.get_state("missing"), "");
        assert!(c.is_debug());
        assert!(!channel(MapEnvironment::new().with("RUNNER_DEBUG", "true")).is_debug());
    }
}
