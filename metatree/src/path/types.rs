//! Core path types.
//!
//! [`ResourcePath`] is an immutable, I/O-free view of a slash-separated path
//! whose basenames encode identity and type: `<name>[&<option>][.<suffix>]`.
//! [`MetaPath`] is the suffix-independent logical key of an entry inside a
//! container.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::path::normalize::{normalize_str, split_root, SEPARATOR};

/// Name of the reserved directory hosting a location's metadata.
pub const CONTAINER: &str = ".meta";

/// Separator between a name and its type suffix.
pub const EXT: char = '.';

/// Separator between a name and its option (history timestamps).
pub const OPTION_SEPARATOR: char = '&';

/// Split a basename into its key (name plus option) and its suffix.
///
/// Hidden basenames (leading `.`) never carry a suffix.
///
/// # Examples
///
/// ```
/// use metatree::path::split_basename;
///
/// assert_eq!(split_basename("age.int"), ("age", Some("int")));
/// assert_eq!(split_basename("age"), ("age", None));
/// assert_eq!(split_basename(".history"), (".history", None));
/// assert_eq!(split_basename("age&20240101-120000.dict"), ("age&20240101-120000", Some("dict")));
/// ```
#[must_use]
pub fn split_basename(basename: &str) -> (&str, Option<&str>) {
    if basename.starts_with(EXT) {
        return (basename, None);
    }

    match basename.rfind(EXT) {
        Some(idx) if idx + 1 < basename.len() => (&basename[..idx], Some(&basename[idx + 1..])),
        _ => (basename, None),
    }
}

/// Whether a basename is hidden (reserved children such as `.history`).
#[must_use]
pub fn is_hidden(basename: &str) -> bool {
    basename.starts_with(EXT)
}

/// A parsed, normalized path.
///
/// Parsing is lexical only: separators are unified, `.`/`..` segments are
/// resolved, and no filesystem access takes place.
///
/// # Examples
///
/// ```
/// use metatree::ResourcePath;
///
/// let path = ResourcePath::parse("/home/marcus/.meta/group.list/dataset.int").unwrap();
/// assert_eq!(path.name(), "dataset");
/// assert_eq!(path.suffix(), Some("int"));
/// assert_eq!(path.location().as_str(), "/home/marcus");
/// assert_eq!(path.meta().unwrap().to_string(), "/group/dataset");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourcePath {
    raw: String,
}

impl ResourcePath {
    /// Parse and normalize a path string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if the string is empty or resolves to
    /// nothing.
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(Self {
            raw: normalize_str(raw)?,
        })
    }

    /// Build a path from a filesystem path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if the path is not valid UTF-8 or is empty.
    pub fn from_path(path: &Path) -> Result<Self> {
        let s = path.to_str().ok_or_else(|| Error::InvalidPath {
            path: path.display().to_string(),
            reason: "path contains invalid UTF-8".to_string(),
        })?;
        Self::parse(s)
    }

    /// The normalized string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Convert to a platform path for filesystem access.
    #[must_use]
    pub fn to_path_buf(&self) -> PathBuf {
        PathBuf::from(&self.raw)
    }

    /// The root (`/` or a drive such as `c:/`), if absolute.
    #[must_use]
    pub fn root(&self) -> Option<&str> {
        split_root(&self.raw).0
    }

    /// Whether the path starts at a root.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.root().is_some()
    }

    /// Whether the path is relative.
    #[must_use]
    pub fn is_relative(&self) -> bool {
        !self.is_absolute()
    }

    /// Segments after the root.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        split_root(&self.raw)
            .1
            .split(SEPARATOR)
            .filter(|s| !s.is_empty())
    }

    /// The last segment, including option and suffix.
    ///
    /// A bare root is its own basename.
    #[must_use]
    pub fn basename(&self) -> &str {
        let (root, body) = split_root(&self.raw);
        match body.rsplit(SEPARATOR).next() {
            Some(last) if !last.is_empty() => last,
            _ => root.unwrap_or(&self.raw),
        }
    }

    /// The type suffix of the basename, if any.
    #[must_use]
    pub fn suffix(&self) -> Option<&str> {
        if self.segments().next().is_none() {
            return None;
        }
        split_basename(self.basename()).1
    }

    /// Basename without suffix: name plus option.
    ///
    /// This is the key under which a parent stores this path's resource.
    #[must_use]
    pub fn key(&self) -> &str {
        split_basename(self.basename()).0
    }

    /// Basename without suffix and without option.
    #[must_use]
    pub fn name(&self) -> &str {
        let key = self.key();
        if is_hidden(key) {
            return key;
        }
        key.split(OPTION_SEPARATOR).next().unwrap_or(key)
    }

    /// The option following [`OPTION_SEPARATOR`], if any.
    #[must_use]
    pub fn option(&self) -> Option<&str> {
        let key = self.key();
        if is_hidden(key) {
            return None;
        }
        key.split_once(OPTION_SEPARATOR).map(|(_, opt)| opt)
    }

    /// Whether the basename is hidden.
    #[must_use]
    pub fn is_hidden(&self) -> bool {
        is_hidden(self.basename())
    }

    /// The string-level parent, or `None` at a root or for a single
    /// relative segment.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        let (root, body) = split_root(&self.raw);
        if body.is_empty() {
            return None;
        }
        match (body.rfind(SEPARATOR), root) {
            (Some(idx), Some(root)) => Some(Self {
                raw: format!("{root}{}", &body[..idx]),
            }),
            (Some(idx), None) => Some(Self {
                raw: body[..idx].to_string(),
            }),
            (None, Some(root)) => Some(Self {
                raw: root.to_string(),
            }),
            (None, None) => None,
        }
    }

    /// Append a single clean segment without re-parsing.
    #[must_use]
    pub fn child(&self, basename: &str) -> Self {
        debug_assert!(!basename.is_empty() && !basename.contains(SEPARATOR));
        if self.raw.ends_with(SEPARATOR) {
            Self {
                raw: format!("{}{basename}", self.raw),
            }
        } else {
            Self {
                raw: format!("{}{SEPARATOR}{basename}", self.raw),
            }
        }
    }

    /// Append another path, resolving `.` and `..`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if the result resolves to nothing.
    pub fn join(&self, other: &str) -> Result<Self> {
        if other.is_empty() {
            return Ok(self.clone());
        }
        Self::parse(&format!("{}{SEPARATOR}{other}", self.raw))
    }

    /// Append a relative path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPath`] if the result resolves to nothing.
    pub fn join_path(&self, other: &Self) -> Result<Self> {
        self.join(other.as_str())
    }

    /// Copy with the suffix replaced (or added).
    ///
    /// Hidden basenames are returned unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use metatree::ResourcePath;
    ///
    /// let path = ResourcePath::parse("/home/marcus/file.exe").unwrap();
    /// assert_eq!(path.with_suffix("bat").as_str(), "/home/marcus/file.bat");
    ///
    /// let path = ResourcePath::parse("/home/no/suffix").unwrap();
    /// assert_eq!(path.with_suffix("exe").as_str(), "/home/no/suffix.exe");
    /// ```
    #[must_use]
    pub fn with_suffix(&self, suffix: &str) -> Self {
        if self.is_hidden() || self.segments().next().is_none() {
            return self.clone();
        }
        let basename = format!("{}{EXT}{suffix}", self.key());
        self.with_basename(&basename)
    }

    /// Copy with the suffix removed.
    #[must_use]
    pub fn without_suffix(&self) -> Self {
        if self.suffix().is_none() {
            return self.clone();
        }
        let key = self.key().to_string();
        self.with_basename(&key)
    }

    /// Copy with the last segment replaced.
    ///
    /// A bare root has no basename to replace and is returned unchanged.
    #[must_use]
    pub fn with_basename(&self, basename: &str) -> Self {
        match self.parent() {
            Some(parent) => parent.child(basename),
            None if self.segments().next().is_none() => self.clone(),
            None => Self {
                raw: basename.to_string(),
            },
        }
    }

    /// The prefix before the first [`CONTAINER`] segment.
    ///
    /// A path without a container is its own location.
    #[must_use]
    pub fn location(&self) -> Self {
        let mut location = self.root().map_or_else(String::new, str::to_string);
        let mut first = true;
        for segment in self.segments() {
            if segment == CONTAINER {
                break;
            }
            if !first {
                location.push(SEPARATOR);
            }
            location.push_str(segment);
            first = false;
        }
        if location.is_empty() {
            return self.clone();
        }
        Self { raw: location }
    }

    /// The suffix-stripped position relative to the nearest container.
    ///
    /// Returns `None` if the path has no container segment.
    #[must_use]
    pub fn meta(&self) -> Option<MetaPath> {
        let segments: Vec<&str> = self.segments().collect();
        let idx = segments.iter().rposition(|s| *s == CONTAINER)?;
        Some(MetaPath {
            parts: segments[idx + 1..]
                .iter()
                .map(|s| split_basename(s).0.to_string())
                .collect(),
        })
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for ResourcePath {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for ResourcePath {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

impl TryFrom<&Path> for ResourcePath {
    type Error = Error;

    fn try_from(value: &Path) -> Result<Self> {
        Self::from_path(value)
    }
}

impl AsRef<str> for ResourcePath {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

/// A logical, container-relative address such as `/address/city`.
///
/// Segments produced by [`ResourcePath::meta`] never carry suffixes; a
/// metapath parsed from user input may, in which case lookups require the
/// suffix to match.
///
/// # Examples
///
/// ```
/// use metatree::MetaPath;
///
/// let meta = MetaPath::parse("address/city.string");
/// assert_eq!(meta.parts(), ["address", "city.string"]);
/// assert_eq!(meta.to_string(), "/address/city.string");
/// assert!(MetaPath::parse("/").is_root());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct MetaPath {
    parts: Vec<String>,
}

impl MetaPath {
    /// The empty metapath, addressing a location itself.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a metapath; separators may be `/` or `\`, leading and doubled
    /// separators are ignored.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self {
            parts: raw
                .split(['/', '\\'])
                .filter(|p| !p.is_empty() && *p != ".")
                .map(str::to_string)
                .collect(),
        }
    }

    /// The segments.
    #[must_use]
    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    /// Whether this addresses the location itself.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parts.is_empty()
    }

    /// Copy with one more segment.
    #[must_use]
    pub fn join(&self, part: &str) -> Self {
        let mut parts = self.parts.clone();
        parts.push(part.to_string());
        Self { parts }
    }

    /// The parent metapath and the last segment, or `None` for the root.
    #[must_use]
    pub fn split_last(&self) -> Option<(Self, &str)> {
        let (last, init) = self.parts.split_last()?;
        Some((
            Self {
                parts: init.to_vec(),
            },
            last.as_str(),
        ))
    }

    /// Copy with every segment's suffix stripped.
    #[must_use]
    pub fn without_suffixes(&self) -> Self {
        Self {
            parts: self
                .parts
                .iter()
                .map(|p| split_basename(p).0.to_string())
                .collect(),
        }
    }
}

impl fmt::Display for MetaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.parts.is_empty() {
            return f.write_str("/");
        }
        for part in &self.parts {
            write!(f, "/{part}")?;
        }
        Ok(())
    }
}
