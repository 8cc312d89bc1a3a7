//! Config loader facade: assembles sources in precedence order

use crate::config::sources::{environment, global_file, workspace_file};
use crate::config::ScandeskConfig;
use config::{Config, ConfigError, File};
use std::path::{Path, PathBuf};

/// Loads `ScandeskConfig` from files and environment
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration for a workspace
    ///
    /// Precedence (lowest to highest): defaults, global file, workspace
    /// files, `SCANDESK__*` variables, plain `DOCUMENT_DIR`-style variables.
    pub fn load(workspace_root: &Path) -> Result<ScandeskConfig, ConfigError> {
        let builder = Config::builder();
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder)?;
        builder.build()?.try_deserialize()
    }

    /// Load configuration from an explicit file; environment still applies on top
    pub fn load_from_file(path: &Path) -> Result<ScandeskConfig, ConfigError> {
        let builder = Config::builder().add_source(File::from(path).required(true));
        let builder = environment::add_to_builder(builder)?;
        builder.build()?.try_deserialize()
    }

    /// Built-in defaults only
    pub fn default() -> ScandeskConfig {
        ScandeskConfig::default()
    }

    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }
}
