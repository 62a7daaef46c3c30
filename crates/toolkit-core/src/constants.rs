// Names shared with the runner: environment variables it advertises and the
// workflow command verbs it understands.

// ---------------------------------------------------------------------------
// Variables
// ---------------------------------------------------------------------------

/// Environment variables read by the toolkit.
pub mod variables {
    /// File channel for `set-env`.
    pub const GITHUB_ENV: &str = "GITHUB_ENV";
    /// File channel for `set-output`.
    pub const GITHUB_OUTPUT: &str = "GITHUB_OUTPUT";
    /// File channel for `save-state`.
    pub const GITHUB_STATE: &str = "GITHUB_STATE";
    /// File channel for `add-path`.
    pub const GITHUB_PATH: &str = "GITHUB_PATH";

    /// Set to `1` when step debug logging is enabled.
    pub const RUNNER_DEBUG: &str = "RUNNER_DEBUG";

    pub const ID_TOKEN_REQUEST_URL: &str = "ACTIONS_ID_TOKEN_REQUEST_URL";
    pub const ID_TOKEN_REQUEST_TOKEN: &str = "ACTIONS_ID_TOKEN_REQUEST_TOKEN";

    /// Prefix of action inputs (`INPUT_<NAME>`).
    pub const INPUT_PREFIX: &str = "INPUT_";
    /// Prefix of state saved by the main step (`STATE_<NAME>`).
    pub const STATE_PREFIX: &str = "STATE_";
}

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// Workflow command verbs.
pub mod commands {
    pub const SET_ENV: &str = "set-env";
    pub const SET_OUTPUT: &str = "set-output";
    pub const SAVE_STATE: &str = "save-state";
    pub const ADD_PATH: &str = "add-path";
    pub const ADD_MASK: &str = "add-mask";
    pub const ECHO: &str = "echo";
    pub const DEBUG: &str = "debug";
    pub const ERROR: &str = "error";
    pub const WARNING: &str = "warning";
    pub const NOTICE: &str = "notice";
    pub const GROUP: &str = "group";
    pub const END_GROUP: &str = "endgroup";

    /// Sentinel used when a command is issued without a name.
    pub const MISSING_COMMAND: &str = "missing.command";

    /// Property carrying the variable/output/state name.
    pub const NAME_PROPERTY: &str = "name";
}
