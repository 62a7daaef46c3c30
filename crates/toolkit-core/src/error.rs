// Error taxonomy for the command protocol.

use std::path::PathBuf;

/// Errors returned by every protocol operation. None of them is swallowed
/// inside the toolkit; the caller decides whether to fail the step.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// A structured value could not be turned into its string form.
    #[error("Failed to serialize command value: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Opening or appending to a file channel failed.
    #[error("Failed to append {channel} record to '{}': {source}", path.display())]
    ChannelIo {
        channel: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing a workflow command to stdout failed.
    #[error("Failed to write workflow command: {0}")]
    Stdout(#[source] std::io::Error),

    /// An advertised channel or endpoint is unusable.
    #[error("{0}")]
    Configuration(String),

    /// An annotation message was neither text nor an error.
    #[error("Unsupported annotation message type: {0}")]
    UnsupportedMessageType(&'static str),

    #[error("Input required and not supplied: {0}")]
    InputRequired(String),

    #[error(
        "Input does not meet YAML 1.2 \"Core Schema\" specification: {0}\n\
         Support boolean input list: `true | True | TRUE | false | False | FALSE`"
    )]
    InvalidBoolean(String),

    /// A file channel did not follow the record grammar.
    #[error("Malformed {channel} file: {reason}")]
    MalformedRecord {
        channel: &'static str,
        reason: String,
    },

    #[error("Failed to get ID Token: {0}")]
    IdToken(String),

    #[error("ID token request failed: {0}")]
    Http(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, CommandError>;
