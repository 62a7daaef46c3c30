// toolkit-cli: command line front end for shell steps.
//
// Each subcommand maps onto one CommandChannel operation. The argument types
// and the dispatcher live here so they can be exercised without spawning the
// binary; `main.rs` only wires up logging, the runtime and the real process.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use toolkit_core::{
    AnnotationProperties, CommandChannel, CommandValue, ExitStatus, InputOptions,
};
use toolkit_sdk::{CURRENT_ARCHITECTURE, CURRENT_PLATFORM};

#[derive(Parser, Debug)]
#[command(
    name = "actions-toolkit",
    version,
    about = "Issue GitHub Actions workflow commands from a step"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Export an environment variable to this and later steps.
    ExportVariable(KeyValueArgs),
    /// Set a step output.
    SetOutput(KeyValueArgs),
    /// Save state for the post step.
    SaveState(KeyValueArgs),
    /// Prepend a directory to PATH for later steps.
    AddPath { path: String },
    /// Mask a value in the log.
    SetSecret { value: String },
    /// Create an error annotation.
    Error(AnnotationArgs),
    /// Create a warning annotation.
    Warning(AnnotationArgs),
    /// Create a notice annotation.
    Notice(AnnotationArgs),
    /// Write a debug message.
    Debug { message: String },
    /// Turn command echoing on or off.
    Echo {
        #[arg(value_enum)]
        mode: EchoMode,
    },
    /// Run a command inside a collapsible log group.
    Group {
        name: String,
        #[arg(last = true, required = true)]
        command: Vec<String>,
    },
    /// Report an error annotation and exit with the failure status.
    Fail { message: String },
    /// Print an action input.
    GetInput(InputArgs),
    /// Print state saved by the main step.
    GetState { name: String },
    /// Print whether step debug logging is enabled.
    IsDebug,
    /// Request an OIDC ID token and print it.
    IdToken {
        #[arg(long)]
        audience: Option<String>,
    },
    /// Print the platform this binary was built for, as JSON.
    Platform,
}

#[derive(Args, Debug)]
pub struct KeyValueArgs {
    pub name: String,
    pub value: String,
    /// Parse VALUE as JSON; it is written back in compact form.
    #[arg(long)]
    pub json: bool,
}

impl KeyValueArgs {
    pub fn command_value(&self) -> Result<CommandValue> {
        if self.json {
            let value: serde_json::Value = serde_json::from_str(&self.value)
                .with_context(|| format!("Value for '{}' is not valid JSON", self.name))?;
            Ok(value.into())
        } else {
            Ok(self.value.as_str().into())
        }
    }
}

#[derive(Args, Debug)]
pub struct AnnotationArgs {
    pub message: String,
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub file: Option<String>,
    #[arg(long)]
    pub line: Option<u32>,
    #[arg(long)]
    pub end_line: Option<u32>,
    #[arg(long)]
    pub col: Option<u32>,
    #[arg(long)]
    pub end_col: Option<u32>,
    /// Annotation properties as JSON, e.g. `{"file":"a.rs","startLine":3}`.
    #[arg(long, conflicts_with_all = ["title", "file", "line", "end_line", "col", "end_col"])]
    pub properties: Option<String>,
}

impl AnnotationArgs {
    pub fn annotation_properties(&self) -> Result<Option<AnnotationProperties>> {
        let properties = match &self.properties {
            Some(json) => serde_json::from_str(json).context("Invalid annotation properties")?,
            None => AnnotationProperties {
                title: self.title.clone(),
                file: self.file.clone(),
                start_line: self.line,
                end_line: self.end_line,
                start_column: self.col,
                end_column: self.end_col,
            },
        };
        Ok((!properties.is_empty()).then_some(properties))
    }
}

#[derive(Args, Debug)]
pub struct InputArgs {
    pub name: String,
    #[arg(long)]
    pub required: bool,
    /// Keep leading and trailing whitespace.
    #[arg(long)]
    pub no_trim: bool,
    /// Print each non-empty line of the input.
    #[arg(long, conflicts_with = "boolean")]
    pub multiline: bool,
    /// Parse the input as a YAML 1.2 boolean.
    #[arg(long)]
    pub boolean: bool,
}

impl InputArgs {
    fn options(&self) -> InputOptions {
        InputOptions {
            required: self.required,
            trim_whitespace: !self.no_trim,
        }
    }
}

/// Host description printed by the `platform` subcommand.
#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlatformInfo {
    pub name: &'static str,
    pub platform: &'static str,
    pub arch: &'static str,
    pub arch_name: &'static str,
    pub is_windows: bool,
    pub is_mac_os: bool,
    pub is_linux: bool,
}

impl PlatformInfo {
    pub fn current() -> Self {
        Self {
            name: CURRENT_PLATFORM.label_name(),
            platform: CURRENT_PLATFORM.id(),
            arch: CURRENT_ARCHITECTURE.id(),
            arch_name: CURRENT_ARCHITECTURE.label_name(),
            is_windows: CURRENT_PLATFORM.is_windows(),
            is_mac_os: CURRENT_PLATFORM.is_macos(),
            is_linux: CURRENT_PLATFORM.is_linux(),
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum EchoMode {
    On,
    Off,
}

/// Run one subcommand against `channel` and return the process exit code.
pub async fn execute(command: Command, channel: &CommandChannel) -> Result<i32> {
    tracing::debug!("Executing {command:?}");

    match command {
        Command::ExportVariable(args) => channel.export_variable(&args.name, args.command_value()?)?,
        Command::SetOutput(args) => channel.set_output(&args.name, args.command_value()?)?,
        Command::SaveState(args) => channel.save_state(&args.name, args.command_value()?)?,
        Command::AddPath { path } => channel.add_path(&path)?,
        Command::SetSecret { value } => channel.set_secret(&value)?,
        Command::Error(args) => {
            channel.error(args.message.as_str(), args.annotation_properties()?.as_ref())?
        }
        Command::Warning(args) => {
            channel.warning(args.message.as_str(), args.annotation_properties()?.as_ref())?
        }
        Command::Notice(args) => {
            channel.notice(args.message.as_str(), args.annotation_properties()?.as_ref())?
        }
        Command::Debug { message } => channel.debug(message)?,
        Command::Echo { mode } => channel.set_command_echo(mode == EchoMode::On)?,
        Command::Group { name, command } => return run_group(channel, &name, &command),
        Command::Fail { message } => return Ok(channel.report_failure(message).code()),
        Command::GetInput(args) => {
            let options = args.options();
            if args.multiline {
                for line in channel.get_multiline_input(&args.name, &options)? {
                    channel.info(&line)?;
                }
            } else if args.boolean {
                let value = channel.get_boolean_input(&args.name, &options)?;
                channel.info(&value.to_string())?;
            } else {
                channel.info(&channel.get_input(&args.name, &options)?)?;
            }
        }
        Command::GetState { name } => channel.info(&channel.get_state(&name))?,
        Command::IsDebug => channel.info(&channel.is_debug().to_string())?,
        Command::IdToken { audience } => {
            let token = channel.get_id_token(audience.as_deref()).await?;
            channel.info(&token)?;
        }
        Command::Platform => {
            let info = serde_json::to_string(&PlatformInfo::current())
                .context("Failed to serialize platform details")?;
            channel.info(&info)?;
        }
    }

    Ok(ExitStatus::Success.code())
}

/// Run `command` inside a log group and pass its exit code through.
fn run_group(channel: &CommandChannel, name: &str, command: &[String]) -> Result<i32> {
    let (program, args) = command.split_first().context("No command given for the group")?;
    channel.group::<_, anyhow::Error, _>(name, || {
        let status = std::process::Command::new(program)
            .args(args)
            .status()
            .with_context(|| format!("Failed to start '{program}'"))?;
        if status.code().is_none() {
            tracing::warn!("'{program}' was terminated by a signal");
        }
        Ok(status.code().unwrap_or(ExitStatus::Failure.code()))
    })
}
