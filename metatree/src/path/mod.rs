//! Path handling for resources.
//!
//! Every resource on disk is addressed by a slash-separated path whose
//! basename follows the `<name>[&<option>][.<suffix>]` convention:
//!
//! - the **suffix** names the value's kind (`int`, `dict`, ...)
//! - the **option** distinguishes variants of one name (history imprints
//!   carry their timestamp there)
//! - the **key** (name plus option) is the logical identity under a parent
//!
//! Names beginning with `.` are hidden and never carry a suffix.
//!
//! A location is any directory; its metadata lives under the
//! [`CONTAINER`] directory, and [`MetaPath`] addresses entries relative to
//! that container.
//!
//! # Examples
//!
//! ```
//! use metatree::path::{ResourcePath, MetaPath};
//!
//! let path = ResourcePath::parse("/projects/hulk/.meta/address.dict/city.string").unwrap();
//! assert_eq!(path.key(), "city");
//! assert_eq!(path.location().as_str(), "/projects/hulk");
//! assert_eq!(path.meta(), Some(MetaPath::parse("address/city")));
//! ```

pub mod normalize;
mod types;

#[cfg(all(test, feature = "property-tests"))]
mod proptests;

/// Hidden child of a collection holding its history imprints.
pub const HISTORY: &str = ".history";

/// Hidden child of a collection holding recycled entries.
pub const TRASH: &str = ".trash";

/// Reserved for location versions.
pub const VERSIONS: &str = ".versions";

pub use types::{
    is_hidden, split_basename, MetaPath, ResourcePath, CONTAINER, EXT, OPTION_SEPARATOR,
};
