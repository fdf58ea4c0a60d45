//! Configuration system for metatree.
//!
//! This module provides layered configuration with support for:
//! - YAML configuration files (user config and project `metatree.yaml`)
//! - Environment variable overrides
//! - Programmatic configuration via builder pattern
//! - Validation of the merged result
//!
//! # Configuration Precedence
//!
//! Configuration is merged from multiple sources with the following precedence
//! (highest to lowest):
//!
//! 1. Programmatic overrides (via `ConfigBuilder::with_config`)
//! 2. Environment variables (`METATREE_*`)
//! 3. Project config (nearest `metatree.yaml` walking up from the working directory)
//! 4. User config (`~/.metatree/config.yaml`)
//! 5. Built-in defaults
//!
//! # Examples
//!
//! Basic usage with defaults:
//!
//! ```no_run
//! use metatree::config::ConfigBuilder;
//!
//! let config = ConfigBuilder::new().build().unwrap();
//! let options = config.store_options();
//! println!("history recorded as {}", options.user);
//! ```
//!
//! Programmatic configuration:
//!
//! ```
//! use metatree::config::{Config, ConfigBuilder};
//!
//! let custom = Config {
//!     user: Some("marcus".to_string()),
//!     track_history: Some(false),
//!     ..Default::default()
//! };
//!
//! let config = ConfigBuilder::new()
//!     .skip_files()
//!     .skip_env()
//!     .with_config(custom)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.user.as_deref(), Some("marcus"));
//! assert!(!config.store_options().track_history);
//! ```

pub mod builder;
pub mod environment;
pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

pub use builder::ConfigBuilder;
pub use environment::EnvironmentConfig;
pub use loader::{ConfigLoader, ConfigSource, PROJECT_CONFIG_FILE, USER_CONFIG_DIR};
pub use merger::ConfigMerger;
pub use schema::Config;
pub use validator::ConfigValidator;
