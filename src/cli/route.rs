//! CLI route: single route table and run context. Dispatches to the document store and presentation.

use crate::cli::parse::{Cli, Commands};
use crate::cli::presentation::{format_entries_json, format_entries_text, format_merge_outcome};
use crate::config::{ConfigLoader, ConfigOverrides, ScandeskConfig};
use crate::document::document_id;
use crate::document::path::{bare_name, resolve_directory};
use crate::error::{ApiError, DocumentError};
use crate::merge::MergeEngine;
use crate::server;
use crate::store::{DocumentStore, MergeRequest};
use crate::types::{DocumentId, Location};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Load configuration for a CLI invocation: config files and environment,
/// then the directory flags on top.
pub fn load_config(cli: &Cli) -> Result<ScandeskConfig, ApiError> {
    let mut config = match cli.config {
        Some(ref path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load(&cli.workspace)?,
    };
    config.apply_overrides(ConfigOverrides {
        inbox_dir: cli.inbox.clone(),
        output_dir: cli.output.clone(),
        ..ConfigOverrides::default()
    });
    Ok(config)
}

/// Runtime context for CLI execution: validated config and the document store.
pub struct RunContext {
    config: ScandeskConfig,
    store: Arc<DocumentStore>,
}

impl RunContext {
    pub fn new(config: ScandeskConfig) -> Result<Self, ApiError> {
        let config = config.validated()?;
        let engine = MergeEngine::from_kind(config.merge.format);
        let store = DocumentStore::new(&config.inbox_dir, &config.output_dir, engine)?;
        Ok(Self {
            config,
            store: Arc::new(store),
        })
    }

    pub fn config(&self) -> &ScandeskConfig {
        &self.config
    }

    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Execute a CLI command via the single route table.
    pub fn execute(&self, command: &Commands) -> Result<String, ApiError> {
        match command {
            Commands::Serve { bind, static_dir } => {
                let mut config = self.config.clone();
                config.apply_overrides(ConfigOverrides {
                    bind: bind.clone(),
                    static_dir: static_dir.clone(),
                    ..ConfigOverrides::default()
                });
                let addr = config.bind_addr()?;
                let runtime = tokio::runtime::Builder::new_multi_thread()
                    .enable_all()
                    .build()
                    .map_err(|e| ApiError::ServerError(format!("Failed to start runtime: {}", e)))?;
                runtime.block_on(server::serve(
                    Arc::clone(&self.store),
                    addr,
                    config.static_dir,
                ))?;
                Ok("Server stopped".to_string())
            }
            Commands::List { outdir, format } => {
                let location = if *outdir {
                    Location::Output
                } else {
                    Location::Inbox
                };
                let entries = self.store.list(location)?;
                match format.as_str() {
                    "json" => format_entries_json(&entries),
                    "text" => Ok(format_entries_text(&entries)),
                    other => Err(invalid(format!("Unknown output format: {}", other))),
                }
            }
            Commands::Rename { id, name } => {
                let renamed = self.store.rename(&parse_id(id)?, name)?;
                Ok(format!("Renamed to {}\nId: {}", renamed.name, renamed.id))
            }
            Commands::Delete { id } => {
                self.store.delete(&parse_id(id)?)?;
                Ok("Deleted".to_string())
            }
            Commands::Move { id } => {
                let moved = self.store.move_to_output(&parse_id(id)?)?;
                Ok(format!("Moved {} to output directory\nId: {}", moved.name, moved.id))
            }
            Commands::Merge { name, ids } => {
                let ids = ids
                    .iter()
                    .map(|id| parse_id(id))
                    .collect::<Result<Vec<_>, _>>()?;
                let outcome = self.store.merge(&MergeRequest {
                    ids,
                    name: name.clone(),
                })?;
                info!(?outcome, "Merge command finished");
                Ok(format_merge_outcome(&outcome))
            }
            Commands::Id { path } => Ok(id_for_path(path)?.to_string()),
        }
    }
}

fn invalid(msg: String) -> ApiError {
    ApiError::DocumentError(DocumentError::InvalidRequest(msg))
}

fn parse_id(raw: &str) -> Result<DocumentId, ApiError> {
    raw.parse().map_err(|e: crate::types::MalformedId| invalid(e.to_string()))
}

/// The id a file at `path` has, computed the way a directory scan computes it
fn id_for_path(path: &Path) -> Result<DocumentId, ApiError> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| invalid(format!("Not a file path: {:?}", path)))?;
    let name = bare_name(name).map_err(|e| invalid(e.to_string()))?;
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let dir = resolve_directory(parent)?;
    Ok(document_id(&dir.join(name)))
}
