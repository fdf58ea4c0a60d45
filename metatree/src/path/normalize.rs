//! Path normalization functions.
//!
//! Two families live here:
//! - lexical normalization of the slash-separated strings that back a
//!   [`ResourcePath`](super::ResourcePath) (no I/O at all)
//! - normalization of user-supplied directories (tilde expansion, making
//!   relative roots absolute) for the CLI and configuration loader

use std::env;
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Separator used by every normalized path string.
pub const SEPARATOR: char = '/';

/// Split a normalized string into its root (`/` or a drive such as `c:/`)
/// and the remainder.
///
/// # Examples
///
/// ```
/// use metatree::path::normalize::split_root;
///
/// assert_eq!(split_root("/home/user"), (Some("/"), "home/user"));
/// assert_eq!(split_root("c:/users"), (Some("c:/"), "users"));
/// assert_eq!(split_root("relative/path"), (None, "relative/path"));
/// ```
#[must_use]
pub fn split_root(path: &str) -> (Option<&str>, &str) {
    if path.starts_with(SEPARATOR) {
        return (Some(&path[..1]), &path[1..]);
    }

    let bytes = path.as_bytes();
    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        if bytes.len() == 2 {
            return (Some(path), "");
        }
        if bytes[2] == b'/' {
            return (Some(&path[..3]), &path[3..]);
        }
    }

    (None, path)
}

/// Normalize a raw path string lexically.
///
/// - Backslashes are converted to forward slashes
/// - Doubled separators collapse into one
/// - A trailing separator is stripped
/// - `.` segments are dropped and `..` segments pop their predecessor
///
/// A `..` that would climb above the root of an absolute path is dropped;
/// leading `..` segments of a relative path are kept.
///
/// # Errors
///
/// Returns [`Error::InvalidPath`] when the input is empty or resolves to
/// nothing (e.g. `a/..`).
///
/// # Examples
///
/// ```
/// use metatree::path::normalize::normalize_str;
///
/// assert_eq!(normalize_str(r"c:\users\\marcus\").unwrap(), "c:/users/marcus");
/// assert_eq!(normalize_str("/a/./b/../c").unwrap(), "/a/c");
/// assert_eq!(normalize_str("/").unwrap(), "/");
/// assert!(normalize_str("").is_err());
/// ```
pub fn normalize_str(raw: &str) -> Result<String> {
    if raw.is_empty() {
        return Err(Error::InvalidPath {
            path: raw.to_string(),
            reason: "path is empty".to_string(),
        });
    }

    let unified = raw.replace('\\', "/");
    let (root, body) = split_root(&unified);
    let root = root.map(|r| {
        let mut r = r.to_string();
        if !r.ends_with(SEPARATOR) {
            r.push(SEPARATOR);
        }
        r
    });

    let mut parts: Vec<&str> = Vec::new();
    for part in body.split(SEPARATOR) {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if root.is_some() => {}
                _ => parts.push(part),
            },
            _ => parts.push(part),
        }
    }

    let joined = parts.join("/");
    match root {
        Some(root) => Ok(format!("{root}{joined}")),
        None if joined.is_empty() => Err(Error::InvalidPath {
            path: raw.to_string(),
            reason: "path resolves to nothing".to_string(),
        }),
        None => Ok(joined),
    }
}

/// Expand tilde (~) to the home directory.
///
/// This function handles `~` and `~/path` but does not support `~user` syntax.
///
/// # Errors
///
/// Returns an error if:
/// - The path contains invalid UTF-8
/// - The home directory cannot be determined
/// - The path uses `~user` syntax (not supported)
///
/// # Examples
///
/// ```
/// use metatree::path::normalize::expand_tilde;
/// use std::path::Path;
///
/// let expanded = expand_tilde(Path::new("~/project")).unwrap();
/// assert!(expanded.is_absolute());
///
/// let expanded = expand_tilde(Path::new("/absolute")).unwrap();
/// assert_eq!(expanded, Path::new("/absolute"));
/// ```
pub fn expand_tilde(path: &Path) -> Result<PathBuf> {
    let path_str = path.to_str().ok_or_else(|| Error::InvalidPath {
        path: path.display().to_string(),
        reason: "path contains invalid UTF-8".to_string(),
    })?;

    if !path_str.starts_with('~') {
        return Ok(path.to_path_buf());
    }

    let home = home::home_dir().ok_or_else(|| Error::InvalidPath {
        path: path_str.to_string(),
        reason: "cannot determine home directory".to_string(),
    })?;

    if path_str == "~" {
        Ok(home)
    } else if path_str.starts_with("~/") || path_str.starts_with("~\\") {
        Ok(home.join(&path_str[2..]))
    } else {
        Err(Error::InvalidPath {
            path: path_str.to_string(),
            reason: "~user syntax is not supported; use ~ or ~/path".to_string(),
        })
    }
}

/// Resolve `.` and `..` components of a filesystem path without touching disk.
#[must_use]
pub fn resolve_components(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            Component::RootDir | Component::Prefix(_) | Component::Normal(_) => {
                result.push(component);
            }
            Component::CurDir => {}
            Component::ParentDir => {
                result.pop();
            }
        }
    }

    result
}

/// Normalize a user-supplied directory to absolute form.
///
/// 1. Expands tilde (~) if present
/// 2. Joins relative paths onto `cwd`
/// 3. Resolves `.` and `..` components
///
/// # Errors
///
/// Returns an error if tilde expansion fails.
///
/// # Examples
///
/// ```
/// use metatree::path::normalize::absolutize;
/// use std::path::Path;
///
/// let abs = absolutize(Path::new("Building/../Asset"), Path::new("/projects")).unwrap();
/// assert_eq!(abs, Path::new("/projects/Asset"));
/// ```
pub fn absolutize(path: &Path, cwd: &Path) -> Result<PathBuf> {
    let expanded = expand_tilde(path)?;
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        cwd.join(expanded)
    };
    Ok(resolve_components(&absolute))
}

/// Like [`absolutize`], using the process working directory.
///
/// # Errors
///
/// Returns an error if the current directory cannot be determined or tilde
/// expansion fails.
pub fn normalize(path: &Path) -> Result<PathBuf> {
    let cwd = env::current_dir().map_err(|e| Error::from_io(".", e))?;
    absolutize(path, &cwd)
}
