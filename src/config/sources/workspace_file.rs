//! Workspace config files: `config/config.toml`, then `config/<env>.toml`
//!
//! The environment name comes from `SCANDESK_ENV` and selects a file inside
//! the workspace `config/` directory only.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File, FileFormat};
use std::path::{Path, PathBuf};
use tracing::debug;

const ENV_VARIABLE: &str = "SCANDESK_ENV";
const DEFAULT_ENV: &str = "development";

/// Environment name selecting the overlay file, from the raw variable value
///
/// Names that could leave the config directory are refused.
fn environment_name(raw: Option<String>) -> Result<String, ConfigError> {
    let name = raw
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_ENV.to_string());
    let plain = name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if !plain {
        return Err(ConfigError::Message(format!(
            "{} must be a plain name, got {:?}",
            ENV_VARIABLE, name
        )));
    }
    Ok(name)
}

/// Workspace config files in increasing precedence
fn config_files(workspace_root: &Path, env_name: &str) -> [PathBuf; 2] {
    let config_dir = workspace_root.join("config");
    [
        config_dir.join("config.toml"),
        config_dir.join(format!("{}.toml", env_name)),
    ]
}

/// Layer the workspace files that exist onto `builder`
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let env_name = environment_name(std::env::var(ENV_VARIABLE).ok())?;

    let builder = config_files(workspace_root, &env_name)
        .into_iter()
        .fold(builder, |builder, path| {
            if path.is_file() {
                debug!(config_path = %path.display(), "Using workspace configuration");
                builder.add_source(File::from(path).format(FileFormat::Toml).required(true))
            } else {
                builder
            }
        });

    Ok(builder)
}
