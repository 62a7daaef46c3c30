// toolkit-sdk: Foundation layer for the Actions toolkit.
// This crate has no dependencies on other toolkit crates and provides the
// platform conventions the command protocol is parameterized by.

pub mod path_util;
pub mod platform;

// Re-export commonly used items at crate root
pub use path_util::PathUtil;
pub use platform::{
    Architecture, OsPlatform, CURRENT_ARCHITECTURE, CURRENT_PLATFORM, EOL, PATH_LIST_SEPARATOR,
    PATH_SEPARATOR, PATH_VARIABLE,
};
