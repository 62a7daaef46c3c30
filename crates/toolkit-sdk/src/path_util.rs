use std::ffi::{OsStr, OsString};

use crate::platform::{PATH_LIST_SEPARATOR, PATH_SEPARATOR};

/// Path string helpers used by `add-path` and by actions that hand paths back
/// to the runner.
pub struct PathUtil;

impl PathUtil {
    /// Prepend `path` to the PATH-style list `current_path` and return the
    /// result. An empty list yields just `path`, so no empty entry (which Unix
    /// shells treat as the current directory) is introduced.
    ///
    /// Works on raw OS strings so entries that are not valid UTF-8 are kept
    /// byte for byte.
    pub fn prepend_path_value(path: impl AsRef<OsStr>, current_path: impl AsRef<OsStr>) -> OsString {
        let current_path = current_path.as_ref();
        let mut result = path.as_ref().to_os_string();
        if !current_path.is_empty() {
            let mut buf = [0u8; 4];
            result.push(PATH_LIST_SEPARATOR.encode_utf8(&mut buf));
            result.push(current_path);
        }
        result
    }

    /// Convert every `\` to `/`.
    pub fn to_posix_path(path: &str) -> String {
        path.replace('\\', "/")
    }

    /// Convert every `/` to `\`.
    pub fn to_win32_path(path: &str) -> String {
        path.replace('/', "\\")
    }

    /// Convert both separator styles to the host separator.
    pub fn to_platform_path(path: &str) -> String {
        path.chars()
            .map(|ch| match ch {
                '/' | '\\' => PATH_SEPARATOR,
                other => other,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepend_path_value_empty() {
        assert_eq!(PathUtil::prepend_path_value("/usr/local/bin", ""), OsString::from("/usr/local/bin"));
    }

    #[test]
    fn prepend_path_value_non_empty() {
        let sep = PATH_LIST_SEPARATOR;
        let result = PathUtil::prepend_path_value("/new", format!("/existing{sep}/other"));
        assert_eq!(result, OsString::from(format!("/new{sep}/existing{sep}/other")));
    }

    #[test]
    fn prepend_path_value_always_prepends() {
        let sep = PATH_LIST_SEPARATOR;
        let result = PathUtil::prepend_path_value("/new", format!("/new{sep}/other"));
        assert_eq!(result, OsString::from(format!("/new{sep}/new{sep}/other")));
    }

    #[cfg(unix)]
    #[test]
    fn prepend_path_value_keeps_non_utf8_entries() {
        use std::os::unix::ffi::OsStringExt;

        let current = OsString::from_vec(b"/usr/bin:/weird\xff/dir:/bin".to_vec());
        let result = PathUtil::prepend_path_value("/opt/tool", &current);
        assert_eq!(result.into_vec(), b"/opt/tool:/usr/bin:/weird\xff/dir:/bin".to_vec());
    }

    #[test]
    fn posix_and_win32_conversion() {
        assert_eq!(PathUtil::to_posix_path(r"C:\a\b/c"), "C:/a/b/c");
        assert_eq!(PathUtil::to_win32_path("/a/b\\c"), r"\a\b\c");
    }

    #[test]
    fn platform_path_uses_host_separator() {
        let sep = PATH_SEPARATOR;
        assert_eq!(
            PathUtil::to_platform_path(r"a/b\c"),
            format!("a{sep}b{sep}c")
        );
    }
}
