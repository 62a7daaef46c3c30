// toolkit-core: the step side of the Actions workflow-command protocol.
// Formats stdout commands, writes file channel records, and depends on
// `toolkit-sdk` for platform constants.

pub mod action_command;
pub mod annotation;
pub mod capture;
pub mod command_channel;
pub mod command_value;
pub mod constants;
pub mod environment;
pub mod error;
pub mod file_command;
pub mod inputs;
pub mod oidc;

// ---------------------------------------------------------------------------
// Re-exports for convenient access
// ---------------------------------------------------------------------------

pub use action_command::{escape_data, escape_property, ActionCommand, ParsedCommand};
pub use annotation::{AnnotationKind, AnnotationMessage, AnnotationProperties};
pub use capture::SharedBuffer;
pub use command_channel::{CommandChannel, ExitStatus};
pub use command_value::CommandValue;
pub use environment::{Environment, MapEnvironment, ProcessEnvironment};
pub use error::{CommandError, Result};
pub use file_command::{FileCommand, FileRecord};
pub use inputs::InputOptions;
