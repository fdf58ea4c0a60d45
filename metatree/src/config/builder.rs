//! Builder assembling a [`Config`] from every source.

use std::env;
use std::path::{Path, PathBuf};

use crate::config::environment::EnvironmentConfig;
use crate::config::loader::ConfigLoader;
use crate::config::merger::ConfigMerger;
use crate::config::schema::Config;
use crate::config::validator::ConfigValidator;
use crate::error::{Error, Result};

/// Builds the effective configuration.
///
/// # Examples
///
/// ```
/// use metatree::config::{Config, ConfigBuilder};
///
/// let config = ConfigBuilder::new()
///     .skip_files()
///     .skip_env()
///     .with_config(Config { ignore_case: Some(false), ..Default::default() })
///     .build()
///     .unwrap();
/// assert_eq!(config.ignore_case, Some(false));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    working_dir: Option<PathBuf>,
    config_dir: Option<PathBuf>,
    skip_files: bool,
    skip_env: bool,
    overrides: Vec<Config>,
}

impl ConfigBuilder {
    /// Create a builder that reads files and environment variables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory from which project configuration is discovered.
    /// Defaults to the current directory.
    #[must_use]
    pub fn with_working_dir(mut self, dir: &Path) -> Self {
        self.working_dir = Some(dir.to_path_buf());
        self
    }

    /// Directory holding the user `config.yaml`, instead of `~/.metatree`.
    #[must_use]
    pub fn with_config_dir(mut self, dir: &Path) -> Self {
        self.config_dir = Some(dir.to_path_buf());
        self
    }

    /// Ignore configuration files.
    #[must_use]
    pub fn skip_files(mut self) -> Self {
        self.skip_files = true;
        self
    }

    /// Ignore `METATREE_*` environment variables.
    #[must_use]
    pub fn skip_env(mut self) -> Self {
        self.skip_env = true;
        self
    }

    /// Layer `config` on top of every other source. Later calls win.
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.overrides.push(config);
        self
    }

    /// Load, merge and validate.
    ///
    /// # Errors
    ///
    /// Returns configuration, validation or I/O errors from any source.
    pub fn build(self) -> Result<Config> {
        let mut config = if self.skip_files {
            Config::default()
        } else {
            let working_dir = match self.working_dir {
                Some(dir) => dir,
                None => env::current_dir().map_err(|e| Error::from_io(".", e))?,
            };
            ConfigMerger::merge(ConfigLoader::load_all(
                &working_dir,
                self.config_dir.as_deref(),
            )?)
        };

        if !self.skip_env {
            EnvironmentConfig::apply_overrides(&mut config)?;
        }

        for custom in &self.overrides {
            ConfigMerger::merge_into(&mut config, custom);
        }

        ConfigValidator::validate(&config)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::CodecFormat;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_skip_everything_gives_defaults() {
        let config = ConfigBuilder::new().skip_files().skip_env().build().unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_files_layered() {
        let temp = TempDir::new().unwrap();
        let cfg = temp.path().join("cfg");
        fs::create_dir(&cfg).unwrap();
        fs::write(cfg.join("config.yaml"), "user: from-user\ncodec: yaml\n").unwrap();
        fs::write(temp.path().join("metatree.yaml"), "user: from-project\n").unwrap();

        let config = ConfigBuilder::new()
            .with_working_dir(temp.path())
            .with_config_dir(&cfg)
            .skip_env()
            .build()
            .unwrap();
        assert_eq!(config.user, Some("from-project".to_string()));
        assert_eq!(config.codec, Some(CodecFormat::Yaml));
    }

    #[test]
    fn test_overrides_win_over_files() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("metatree.yaml"), "track_history: true\n").unwrap();

        let config = ConfigBuilder::new()
            .with_working_dir(temp.path())
            .with_config_dir(temp.path())
            .skip_env()
            .with_config(Config {
                track_history: Some(false),
                ..Default::default()
            })
            .build()
            .unwrap();
        assert_eq!(config.track_history, Some(false));
    }

    #[test]
    fn test_invalid_result_rejected() {
        let result = ConfigBuilder::new()
            .skip_files()
            .skip_env()
            .with_config(Config {
                user: Some(String::new()),
                ..Default::default()
            })
            .build();
        assert!(result.is_err());
    }
}
