//! Utility functions for CLI operations.
//!
//! Root resolution, configuration loading, store construction, and value
//! parsing and formatting shared by the commands.

use crate::error::CliError;
use metatree::path::normalize;
use metatree::{
    init_logger, Codec, Config, ConfigBuilder, LocalFs, MetaPath, NodeId, ResourcePath, Store,
    Tree,
};
use serde_json::Value;
use std::env;
use std::path::{Path, PathBuf};

/// Global CLI options shared across all commands.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Directory whose metadata is addressed.
    pub root: Option<PathBuf>,

    /// Override the user configuration directory.
    pub config_dir: Option<PathBuf>,
}

/// Resolve the root directory, using CWD if not specified.
///
/// Relative roots are joined onto the current directory and `~` is
/// expanded. Symlinks are not followed.
pub fn resolve_root(root: Option<&Path>) -> Result<ResourcePath, CliError> {
    let cwd = env::current_dir()?;
    let absolute = match root {
        Some(path) => normalize::absolutize(path, &cwd)?,
        None => cwd,
    };
    Ok(ResourcePath::from_path(&absolute)?)
}

/// Load layered configuration, discovering project files from the root.
pub fn load_configuration(global: &GlobalOptions, root: &ResourcePath) -> Result<Config, CliError> {
    let mut builder = ConfigBuilder::new().with_working_dir(&root.to_path_buf());
    if let Some(ref dir) = global.config_dir {
        builder = builder.with_config_dir(dir);
    }
    builder.build().map_err(|e| CliError::Config(e.to_string()))
}

/// Everything a command needs: the resolved root, configuration and store.
pub struct Session {
    /// The resolved root directory.
    pub root: ResourcePath,
    /// The effective configuration.
    pub config: Config,
    /// Store configured from `config`.
    pub store: Store,
}

impl Session {
    /// Resolve the root, load configuration and build the store.
    pub fn open(global: &GlobalOptions) -> Result<Self, CliError> {
        let root = resolve_root(global.root.as_deref())?;
        let config = load_configuration(global, &root)?;
        let logger = init_logger(global.verbose, global.quiet);
        let store = config.store_with(LocalFs, logger);
        Ok(Self {
            root,
            config,
            store,
        })
    }

    /// Load `metapath` into `tree`, or fail with a semantic error if it is
    /// absent.
    pub fn locate(
        &self,
        tree: &mut Tree,
        metapath: &MetaPath,
        depth: usize,
    ) -> Result<NodeId, CliError> {
        self.store
            .read_into(tree, &self.root, metapath, depth)?
            .ok_or_else(|| absent(metapath))
    }

    /// Encode a value for display: strings print raw, everything else in
    /// the configured codec.
    pub fn format_value(&self, value: &Value) -> Result<String, CliError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Ok(self
                .config
                .codec_format()
                .codec()
                .encode(other)?
                .trim_end()
                .to_string()),
        }
    }
}

/// The error reported when nothing is stored at `metapath`.
pub fn absent(metapath: &MetaPath) -> CliError {
    CliError::Absent(format!("nothing stored at {metapath}"))
}

/// Parse a metapath argument; `/` addresses the location itself.
pub fn parse_metapath(raw: &str) -> Result<MetaPath, CliError> {
    let metapath = MetaPath::parse(raw);
    if metapath.parts().iter().any(|p| p == "..") {
        return Err(CliError::Usage(format!(
            "metapath may not contain '..': {raw}"
        )));
    }
    Ok(metapath)
}

/// Interpret a command-line value: JSON when it parses, otherwise a plain
/// string.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
