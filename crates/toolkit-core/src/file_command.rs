// File channels (GITHUB_ENV, GITHUB_OUTPUT, GITHUB_STATE, GITHUB_PATH).
// Records are appended here by the step and read by the runner after it ends.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use toolkit_sdk::EOL;

use crate::constants::variables;
use crate::environment::Environment;
use crate::error::{CommandError, Result};

/// Heredoc marker between a record's name and its delimiter.
pub const HEREDOC_MARKER: &str = "<<";

/// Prefix of generated delimiters.
pub const DELIMITER_PREFIX: &str = "ghadelimiter_";

/// One of the file channels a runner can advertise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileCommand {
    Env,
    Output,
    State,
    Path,
}

impl fmt::Display for FileCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.env_var())
    }
}

impl FileCommand {
    pub const ALL: [FileCommand; 4] = [
        FileCommand::Env,
        FileCommand::Output,
        FileCommand::State,
        FileCommand::Path,
    ];

    /// The variable holding this channel's file path.
    pub fn env_var(self) -> &'static str {
        match self {
            FileCommand::Env => variables::GITHUB_ENV,
            FileCommand::Output => variables::GITHUB_OUTPUT,
            FileCommand::State => variables::GITHUB_STATE,
            FileCommand::Path => variables::GITHUB_PATH,
        }
    }

    /// The channel's file path, when the runner advertised one.
    ///
    /// Read on every call: an unset or empty variable means the stdout
    /// command form must be used instead. The value is taken as raw OS
    /// bytes, so a path that is not valid UTF-8 still selects the file.
    pub fn resolve(self, env: &dyn Environment) -> Option<PathBuf> {
        env.non_empty_var_os(self.env_var()).map(PathBuf::from)
    }

    /// Append `record` to the channel file with a single write.
    ///
    /// The file is created when absent. Its directory must already exist.
    pub fn append(self, path: &Path, record: &str) -> Result<()> {
        self.check_target(path)?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| self.io_error(path, source))?;
        file.write_all(record.as_bytes())
            .map_err(|source| self.io_error(path, source))?;

        tracing::debug!("Appended {} bytes to {} file '{}'", record.len(), self, path.display());
        Ok(())
    }

    fn check_target(self, path: &Path) -> Result<()> {
        if path.is_dir() {
            return Err(CommandError::Configuration(format!(
                "{} points to a directory: {}",
                self,
                path.display()
            )));
        }
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
                Err(CommandError::Configuration(format!(
                    "Missing directory for {} file at path: {}",
                    self,
                    path.display()
                )))
            }
            _ => Ok(()),
        }
    }

    fn io_error(self, path: &Path, source: std::io::Error) -> CommandError {
        CommandError::ChannelIo {
            channel: self.env_var(),
            path: path.to_path_buf(),
            source,
        }
    }
}

// ---------------------------------------------------------------------------
// Record encoding
// ---------------------------------------------------------------------------

/// A fresh delimiter. Never reused between records.
pub fn new_delimiter() -> String {
    format!("{DELIMITER_PREFIX}{}", uuid::Uuid::new_v4())
}

/// `NAME<<DELIMITER`, the value, and the closing delimiter, one per line.
/// The value is written verbatim; embedded newlines are legal.
pub fn key_value_record(name: &str, value: &str, delimiter: &str) -> String {
    format!("{name}{HEREDOC_MARKER}{delimiter}{EOL}{value}{EOL}{delimiter}{EOL}")
}

/// A single `add-path` entry.
pub fn path_record(path: &str) -> String {
    format!("{path}{EOL}")
}

// ---------------------------------------------------------------------------
// Record decoding
// ---------------------------------------------------------------------------

/// A name/value pair read from an env, output or state file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    pub name: String,
    pub value: String,
}

/// Parse the content of an env, output or state file.
///
/// Accepts both the heredoc form (`NAME<<DELIMITER` ... `DELIMITER`) and the
/// single-line `NAME=VALUE` form.
pub fn parse_key_value_records(channel: FileCommand, content: &str) -> Result<Vec<FileRecord>> {
    let malformed = |reason: String| CommandError::MalformedRecord {
        channel: channel.env_var(),
        reason,
    };

    let mut records = Vec::new();
    let mut lines = content.split(EOL);

    while let Some(line) = lines.next() {
        if line.is_empty() {
            continue;
        }

        if let Some((name, delimiter)) = line.split_once(HEREDOC_MARKER) {
            if name.is_empty() || delimiter.is_empty() {
                return Err(malformed(format!("Invalid heredoc header '{line}'")));
            }

            let mut value_lines = Vec::new();
            let mut closed = false;
            for value_line in lines.by_ref() {
                if value_line == delimiter {
                    closed = true;
                    break;
                }
                value_lines.push(value_line);
            }
            if !closed {
                return Err(malformed(format!("Matching delimiter not found '{delimiter}'")));
            }

            records.push(FileRecord {
                name: name.to_string(),
                value: value_lines.join(EOL),
            });
        } else if let Some((name, value)) = line.split_once('=') {
            if name.is_empty() {
                return Err(malformed(format!("Invalid entry (empty name) '{line}'")));
            }
            records.push(FileRecord {
                name: name.to_string(),
                value: value.to_string(),
            });
        } else {
            return Err(malformed(format!("Invalid format '{line}'")));
        }
    }

    Ok(records)
}

/// Read and parse an env, output or state file.
pub fn read_key_value_records(channel: FileCommand, path: &Path) -> Result<Vec<FileRecord>> {
    let content = std::fs::read_to_string(path).map_err(|source| channel.io_error(path, source))?;
    parse_key_value_records(channel, &content)
}

/// Parse the content of a path file: one entry per non-blank line.
pub fn parse_path_records(content: &str) -> Vec<String> {
    content
        .split(EOL)
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
