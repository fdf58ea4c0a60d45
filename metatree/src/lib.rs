#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # metatree
//!
//! Typed metadata stored as a plain directory hierarchy.
//!
//! Any directory can host metadata in a reserved `.meta` container. Each
//! entry is a file or subdirectory whose extension records the value's type
//! (`age.int`, `address.dict/city.string`), so the store can be browsed and
//! edited with ordinary tools. Overwritten values are kept in `.history`,
//! removed ones in `.trash`, and values can be inherited from ancestor
//! directories.
//!
//! ## Core Types
//!
//! - [`ResourcePath`] and [`MetaPath`]: on-disk and logical paths
//! - [`ValueKind`]: the type tags carried as suffixes
//! - [`Tree`] and [`NodeId`]: in-memory resource hierarchies
//! - [`Store`]: pull, flush, history, trash and inheritance
//! - [`Config`] and [`ConfigBuilder`]: layered configuration
//! - [`Error`] and [`Result`]: error handling types
//! - [`Logger`] and [`LogLevel`]: logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use metatree::{PullOptions, ResourcePath, Store, Tree};
//! use serde_json::json;
//!
//! let dir = tempfile::tempdir().unwrap();
//! let store = Store::new();
//!
//! let mut tree = Tree::new();
//! let location = tree.add_location(&ResourcePath::from_path(dir.path()).unwrap()).unwrap();
//! let age = tree.add_entry("age", Some(location)).unwrap();
//! tree.set_value(age, json!(27)).unwrap();
//! store.flush(&mut tree, location).unwrap();
//! assert!(dir.path().join(".meta/age.int").is_file());
//!
//! let mut fresh = Tree::new();
//! let location = fresh.add_location(&ResourcePath::from_path(dir.path()).unwrap()).unwrap();
//! let age = fresh.add_entry("age", Some(location)).unwrap();
//! store.pull(&mut fresh, age, PullOptions::default()).unwrap();
//! assert_eq!(fresh.value(age), json!(27));
//! assert_eq!(fresh.suffix(age), Some("int"));
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod fs;
pub mod kind;
pub mod logging;
pub mod path;
pub mod store;
pub mod tree;

// Re-export key types at crate root for convenience
pub use codec::{Codec, CodecFormat, DecodeError, JsonCodec, YamlCodec};
pub use config::{Config, ConfigBuilder};
pub use error::{Error, Result};
pub use fs::{LocalFs, MemoryFs, OsFs};
pub use kind::ValueKind;
pub use logging::{init_logger, LogLevel, Logger};
pub use path::{MetaPath, ResourcePath};
pub use store::{Imprint, InheritOptions, PullOptions, Reading, Store, StoreOptions};
pub use tree::{Layout, NodeId, NodeKind, NodeValue, Tree};
