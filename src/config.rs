//! Configuration System
//!
//! Layered configuration for the document desk: where the inbox and output
//! directories live, where the server binds, how merges are written and how
//! logging behaves. Values come from defaults, config files and environment
//! variables (see `ConfigLoader`), then CLI flags.

use crate::error::ApiError;
use crate::logging::LoggingConfig;
use crate::merge::MergeFormatKind;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;

mod facade;
mod sources;

pub use facade::ConfigLoader;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScandeskConfig {
    /// Directory holding documents to list, rename, delete and merge
    #[serde(default = "default_inbox_dir")]
    pub inbox_dir: PathBuf,

    /// Directory receiving documents moved out of the inbox
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Socket address the HTTP server listens on
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Directory of frontend files served at `/` (disabled when unset)
    #[serde(default)]
    pub static_dir: Option<PathBuf>,

    #[serde(default)]
    pub merge: MergeConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Output format of merged documents: pdf or concat
    #[serde(default)]
    pub format: MergeFormatKind,
}

fn default_inbox_dir() -> PathBuf {
    PathBuf::from("documents")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("documents/out")
}

fn default_bind() -> String {
    "127.0.0.1:3000".to_string()
}

impl Default for ScandeskConfig {
    fn default() -> Self {
        Self {
            inbox_dir: default_inbox_dir(),
            output_dir: default_output_dir(),
            bind: default_bind(),
            static_dir: None,
            merge: MergeConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Directory(String, String),
    Bind(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Directory(key, msg) => write!(f, "{}: {}", key, msg),
            ValidationError::Bind(msg) => write!(f, "bind: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Overrides taken from the command line; `None` keeps the loaded value
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub inbox_dir: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub bind: Option<String>,
    pub static_dir: Option<PathBuf>,
}

impl ScandeskConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.inbox_dir.as_os_str().is_empty() {
            errors.push(ValidationError::Directory(
                "inbox_dir".to_string(),
                "cannot be empty".to_string(),
            ));
        }
        if self.output_dir.as_os_str().is_empty() {
            errors.push(ValidationError::Directory(
                "output_dir".to_string(),
                "cannot be empty".to_string(),
            ));
        }
        if !self.inbox_dir.as_os_str().is_empty() && self.inbox_dir == self.output_dir {
            errors.push(ValidationError::Directory(
                "output_dir".to_string(),
                "must differ from inbox_dir".to_string(),
            ));
        }
        if let Err(e) = self.bind.parse::<SocketAddr>() {
            errors.push(ValidationError::Bind(format!("{:?}: {}", self.bind, e)));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Validate, folding all problems into one `ApiError`
    pub fn validated(self) -> Result<Self, ApiError> {
        self.validate().map_err(|errors| {
            let msgs: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
            ApiError::ConfigError(format!(
                "Configuration validation failed:\n{}",
                msgs.join("\n")
            ))
        })?;
        Ok(self)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(dir) = overrides.inbox_dir {
            self.inbox_dir = dir;
        }
        if let Some(dir) = overrides.output_dir {
            self.output_dir = dir;
        }
        if let Some(bind) = overrides.bind {
            self.bind = bind;
        }
        if let Some(dir) = overrides.static_dir {
            self.static_dir = Some(dir);
        }
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ApiError> {
        self.bind
            .parse()
            .map_err(|e| ApiError::ConfigError(format!("Invalid bind address {:?}: {}", self.bind, e)))
    }
}
