// CommandChannel: the step-side half of the runner protocol.
// Each operation picks the file channel when the runner advertised one for it,
// and falls back to a stdout workflow command otherwise.

use parking_lot::Mutex;
use std::ffi::OsStr;
use std::io::{self, Write};
use std::sync::Arc;

use toolkit_sdk::{PathUtil, EOL, PATH_VARIABLE};

use crate::action_command::ActionCommand;
use crate::annotation::{AnnotationKind, AnnotationMessage, AnnotationProperties};
use crate::command_value::CommandValue;
use crate::constants::commands;
use crate::environment::{validate_var, Environment, ProcessEnvironment};
use crate::error::{CommandError, Result};
use crate::file_command::{key_value_record, new_delimiter, path_record, FileCommand};

/// Process exit status reported to the runner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitStatus {
    Success = 0,
    Failure = 1,
}

impl ExitStatus {
    pub fn code(self) -> i32 {
        self as i32
    }
}

impl From<ExitStatus> for std::process::ExitCode {
    fn from(status: ExitStatus) -> Self {
        match status {
            ExitStatus::Success => std::process::ExitCode::SUCCESS,
            ExitStatus::Failure => std::process::ExitCode::FAILURE,
        }
    }
}

/// Emits workflow commands and file channel records.
///
/// All reads of the channel variables go through the injected
/// [`Environment`] at call time. Stdout writes are serialized so that each
/// command lands as one uninterrupted line.
pub struct CommandChannel {
    env: Arc<dyn Environment>,
    stdout: Mutex<Box<dyn Write + Send>>,
}

impl CommandChannel {
    pub fn new(env: Arc<dyn Environment>, stdout: Box<dyn Write + Send>) -> Self {
        Self {
            env,
            stdout: Mutex::new(stdout),
        }
    }

    /// A channel over the real process environment and stdout.
    pub fn from_process() -> Self {
        Self::new(Arc::new(ProcessEnvironment), Box::new(io::stdout()))
    }

    pub fn environment(&self) -> &dyn Environment {
        self.env.as_ref()
    }

    // -----------------------------------------------------------------------
    // Stdout commands
    // -----------------------------------------------------------------------

    /// Write `command` to stdout followed by the host line ending.
    ///
    /// A command without a name is dropped silently.
    pub fn issue_command(&self, command: &ActionCommand) -> Result<()> {
        if command.is_missing() {
            tracing::debug!("Skipping workflow command without a name");
            return Ok(());
        }
        let line = format!("{}{EOL}", command.to_command_string()?);
        self.write_stdout(&line)
    }

    /// Issue a command without properties.
    pub fn issue(&self, name: &str, message: impl Into<CommandValue>) -> Result<()> {
        self.issue_command(&ActionCommand::new(name, message))
    }

    fn write_stdout(&self, text: &str) -> Result<()> {
        let mut out = self.stdout.lock();
        out.write_all(text.as_bytes())
            .and_then(|()| out.flush())
            .map_err(CommandError::Stdout)
    }

    // -----------------------------------------------------------------------
    // Variables, outputs, state
    // -----------------------------------------------------------------------

    /// Export `name` for this step and every later step of the job.
    ///
    /// The variable is also set in the current environment once the record is
    /// written. A name the OS cannot store is rejected before anything is
    /// written.
    pub fn export_variable(&self, name: &str, value: impl Into<CommandValue>) -> Result<()> {
        let value = value.into().to_command_value()?;
        validate_var(name, OsStr::new(&value))?;
        self.write_key_value(FileCommand::Env, commands::SET_ENV, name, value.clone())?;
        self.env.set_var(name, OsStr::new(&value))
    }

    /// Set a step output.
    pub fn set_output(&self, name: &str, value: impl Into<CommandValue>) -> Result<()> {
        let value = value.into().to_command_value()?;
        self.write_key_value(FileCommand::Output, commands::SET_OUTPUT, name, value)
    }

    /// Save state for the post step of this action (read back as `STATE_<name>`).
    pub fn save_state(&self, name: &str, value: impl Into<CommandValue>) -> Result<()> {
        let value = value.into().to_command_value()?;
        self.write_key_value(FileCommand::State, commands::SAVE_STATE, name, value)
    }

    fn write_key_value(
        &self,
        channel: FileCommand,
        command: &str,
        name: &str,
        value: String,
    ) -> Result<()> {
        match channel.resolve(self.env.as_ref()) {
            Some(path) => {
                let record = key_value_record(name, &value, &new_delimiter());
                channel.append(&path, &record)
            }
            None => self.issue_command(
                &ActionCommand::new(command, value).with_property(commands::NAME_PROPERTY, name),
            ),
        }
    }

    /// Prepend `input_path` to PATH for later steps, and for this process.
    pub fn add_path(&self, input_path: &str) -> Result<()> {
        match FileCommand::Path.resolve(self.env.as_ref()) {
            Some(path) => FileCommand::Path.append(&path, &path_record(input_path))?,
            None => self.issue(commands::ADD_PATH, input_path)?,
        }

        let current = self.env.var_os(PATH_VARIABLE).unwrap_or_default();
        self.env
            .set_var(PATH_VARIABLE, &PathUtil::prepend_path_value(input_path, &current))
    }

    /// Register a value the runner must mask in the log.
    pub fn set_secret(&self, secret: &str) -> Result<()> {
        self.issue(commands::ADD_MASK, secret)
    }

    /// Turn echoing of workflow commands in the log on or off.
    pub fn set_command_echo(&self, enabled: bool) -> Result<()> {
        self.issue(commands::ECHO, if enabled { "on" } else { "off" })
    }

    // -----------------------------------------------------------------------
    // Logging
    // -----------------------------------------------------------------------

    /// Debug message, shown only when step debug logging is enabled.
    pub fn debug(&self, message: impl Into<CommandValue>) -> Result<()> {
        self.issue(commands::DEBUG, message)
    }

    pub fn error(
        &self,
        message: impl Into<AnnotationMessage>,
        properties: Option<&AnnotationProperties>,
    ) -> Result<()> {
        self.annotate(AnnotationKind::Error, message.into(), properties)
    }

    pub fn warning(
        &self,
        message: impl Into<AnnotationMessage>,
        properties: Option<&AnnotationProperties>,
    ) -> Result<()> {
        self.annotate(AnnotationKind::Warning, message.into(), properties)
    }

    pub fn notice(
        &self,
        message: impl Into<AnnotationMessage>,
        properties: Option<&AnnotationProperties>,
    ) -> Result<()> {
        self.annotate(AnnotationKind::Notice, message.into(), properties)
    }

    fn annotate(
        &self,
        kind: AnnotationKind,
        message: AnnotationMessage,
        properties: Option<&AnnotationProperties>,
    ) -> Result<()> {
        let mut command = ActionCommand::new(kind.command(), message.as_str());
        if let Some(properties) = properties {
            command = command.with_properties(properties.to_command_properties());
        }
        self.issue_command(&command)
    }

    /// Plain log line, no command framing.
    pub fn info(&self, message: &str) -> Result<()> {
        self.write_stdout(&format!("{message}{EOL}"))
    }

    // -----------------------------------------------------------------------
    // Groups
    // -----------------------------------------------------------------------

    pub fn start_group(&self, name: &str) -> Result<()> {
        self.issue(commands::GROUP, name)
    }

    pub fn end_group(&self) -> Result<()> {
        self.issue(commands::END_GROUP, "")
    }

    /// Run `work` inside a collapsible log group.
    ///
    /// The group is closed on every exit path, including an error or a panic
    /// in `work`. An error from `work` takes precedence over a failure to
    /// close the group.
    pub fn group<T, E, F>(&self, name: &str, work: F) -> std::result::Result<T, E>
    where
        F: FnOnce() -> std::result::Result<T, E>,
        E: From<CommandError>,
    {
        self.start_group(name)?;

        let mut guard = GroupGuard {
            channel: self,
            armed: true,
        };
        let result = work();
        guard.armed = false;

        let ended = self.end_group();
        let value = result?;
        ended?;
        Ok(value)
    }

    // -----------------------------------------------------------------------
    // Failure
    // -----------------------------------------------------------------------

    /// Emit an error annotation and return the failure status.
    ///
    /// A failure to emit the annotation is logged and does not change the
    /// returned status.
    pub fn report_failure(&self, message: impl Into<AnnotationMessage>) -> ExitStatus {
        if let Err(e) = self.error(message, None) {
            tracing::error!("Failed to report step failure: {e}");
        }
        ExitStatus::Failure
    }

    /// Emit an error annotation and terminate the process with status 1.
    pub fn set_failed(&self, message: impl Into<AnnotationMessage>) -> ! {
        let status = self.report_failure(message);
        std::process::exit(status.code())
    }
}

/// Closes a group when `work` unwinds.
struct GroupGuard<'a> {
    channel: &'a CommandChannel,
    armed: bool,
}

impl Drop for GroupGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            if let Err(e) = self.channel.end_group() {
                tracing::warn!("Failed to close log group: {e}");
            }
        }
    }
}
