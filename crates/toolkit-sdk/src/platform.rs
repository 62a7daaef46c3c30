// Compile-time description of the host the step runs on.
// Line endings and PATH conventions used by the command protocol live here.

use std::fmt;

/// Operating system platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsPlatform {
    Linux,
    MacOS,
    Windows,
}

impl fmt::Display for OsPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label_name())
    }
}

impl OsPlatform {
    /// Display name as used in `runner.os`.
    pub fn label_name(&self) -> &'static str {
        match self {
            OsPlatform::Linux => "Linux",
            OsPlatform::MacOS => "macOS",
            OsPlatform::Windows => "Windows",
        }
    }

    /// Lowercase platform identifier (`linux`, `darwin`, `win32`).
    pub fn id(&self) -> &'static str {
        match self {
            OsPlatform::Linux => "linux",
            OsPlatform::MacOS => "darwin",
            OsPlatform::Windows => "win32",
        }
    }

    pub fn is_windows(&self) -> bool {
        *self == OsPlatform::Windows
    }

    pub fn is_macos(&self) -> bool {
        *self == OsPlatform::MacOS
    }

    pub fn is_linux(&self) -> bool {
        *self == OsPlatform::Linux
    }
}

/// CPU architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Architecture {
    X86,
    X64,
    Arm,
    Arm64,
}

impl fmt::Display for Architecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label_name())
    }
}

impl Architecture {
    /// Display name as used in `runner.arch`.
    pub fn label_name(&self) -> &'static str {
        match self {
            Architecture::X86 => "X86",
            Architecture::X64 => "X64",
            Architecture::Arm => "ARM",
            Architecture::Arm64 => "ARM64",
        }
    }

    /// Lowercase architecture identifier (`x86`, `x64`, `arm`, `arm64`).
    pub fn id(&self) -> &'static str {
        match self {
            Architecture::X86 => "x86",
            Architecture::X64 => "x64",
            Architecture::Arm => "arm",
            Architecture::Arm64 => "arm64",
        }
    }
}

// ---------------------------------------------------------------------------
// Platform detection (compile-time)
// ---------------------------------------------------------------------------

#[cfg(target_os = "linux")]
pub const CURRENT_PLATFORM: OsPlatform = OsPlatform::Linux;
#[cfg(target_os = "macos")]
pub const CURRENT_PLATFORM: OsPlatform = OsPlatform::MacOS;
#[cfg(target_os = "windows")]
pub const CURRENT_PLATFORM: OsPlatform = OsPlatform::Windows;
#[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
pub const CURRENT_PLATFORM: OsPlatform = OsPlatform::Linux;

#[cfg(target_arch = "x86")]
pub const CURRENT_ARCHITECTURE: Architecture = Architecture::X86;
#[cfg(target_arch = "x86_64")]
pub const CURRENT_ARCHITECTURE: Architecture = Architecture::X64;
#[cfg(target_arch = "arm")]
pub const CURRENT_ARCHITECTURE: Architecture = Architecture::Arm;
#[cfg(target_arch = "aarch64")]
pub const CURRENT_ARCHITECTURE: Architecture = Architecture::Arm64;
#[cfg(not(any(
    target_arch = "x86",
    target_arch = "x86_64",
    target_arch = "arm",
    target_arch = "aarch64"
)))]
pub const CURRENT_ARCHITECTURE: Architecture = Architecture::X64;

// ---------------------------------------------------------------------------
// Text and PATH conventions
// ---------------------------------------------------------------------------

/// Line ending terminating every stdout command and file record.
#[cfg(target_os = "windows")]
pub const EOL: &str = "\r\n";
#[cfg(not(target_os = "windows"))]
pub const EOL: &str = "\n";

/// PATH environment variable name.
#[cfg(target_os = "windows")]
pub const PATH_VARIABLE: &str = "Path";
#[cfg(not(target_os = "windows"))]
pub const PATH_VARIABLE: &str = "PATH";

/// Separator between PATH entries.
#[cfg(target_os = "windows")]
pub const PATH_LIST_SEPARATOR: char = ';';
#[cfg(not(target_os = "windows"))]
pub const PATH_LIST_SEPARATOR: char = ':';

/// Separator between components of a single path.
#[cfg(target_os = "windows")]
pub const PATH_SEPARATOR: char = '\\';
#[cfg(not(target_os = "windows"))]
pub const PATH_SEPARATOR: char = '/';

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_platform_flags_are_exclusive() {
        let flags = [
            CURRENT_PLATFORM.is_linux(),
            CURRENT_PLATFORM.is_macos(),
            CURRENT_PLATFORM.is_windows(),
        ];
        assert_eq!(flags.iter().filter(|f| **f).count(), 1);
    }

    #[test]
    fn eol_matches_platform() {
        if CURRENT_PLATFORM.is_windows() {
            assert_eq!(EOL, "\r\n");
        } else {
            assert_eq!(EOL, "\n");
        }
    }

    #[test]
    fn display_uses_label_names() {
        assert_eq!(OsPlatform::MacOS.to_string(), "macOS");
        assert_eq!(OsPlatform::Windows.id(), "win32");
        assert_eq!(Architecture::Arm64.to_string(), "ARM64");
        assert_eq!(Architecture::X64.id(), "x64");
    }
}
