//! Integration tests for layered configuration loading

use scandesk::config::{ConfigLoader, ScandeskConfig};
use scandesk::merge::MergeFormatKind;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::TempDir;

// Serializes every test that reads or writes process environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const TOUCHED: [&str; 7] = [
    "XDG_CONFIG_HOME",
    "SCANDESK_ENV",
    "SCANDESK__MERGE__FORMAT",
    "DOCUMENT_DIR",
    "DOCUMENT_OUTPUT_DIR",
    "STATIC_DIR",
    "BIND_ADDRESS",
];

/// Run `f` with a clean set of the variables the loader reads and an
/// isolated global config directory, restoring everything afterwards
fn with_clean_env<F, R>(f: F) -> R
where
    F: FnOnce(&TempDir) -> R,
{
    let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let saved: Vec<(&str, Option<String>)> =
        TOUCHED.iter().map(|k| (*k, std::env::var(k).ok())).collect();
    for key in TOUCHED {
        std::env::remove_var(key);
    }

    let xdg = TempDir::new().unwrap();
    std::env::set_var("XDG_CONFIG_HOME", xdg.path());

    let result = f(&xdg);

    for (key, value) in saved {
        match value {
            Some(v) => std::env::set_var(key, v),
            None => std::env::remove_var(key),
        }
    }
    result
}

fn write_workspace_config(workspace: &TempDir, file: &str, contents: &str) {
    let dir = workspace.path().join("config");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(file), contents).unwrap();
}

#[test]
fn test_defaults_without_any_source() {
    with_clean_env(|_| {
        let workspace = TempDir::new().unwrap();
        let config = ConfigLoader::load(workspace.path()).unwrap();
        let defaults = ScandeskConfig::default();
        assert_eq!(config.inbox_dir, defaults.inbox_dir);
        assert_eq!(config.output_dir, defaults.output_dir);
        assert_eq!(config.bind, "127.0.0.1:3000");
        assert_eq!(config.merge.format, MergeFormatKind::Pdf);
    });
}

// The global directory follows XDG_CONFIG_HOME only on Linux.
#[cfg(target_os = "linux")]
#[test]
fn test_workspace_file_overrides_global_file() {
    with_clean_env(|xdg| {
        let global_dir = xdg.path().join("scandesk");
        fs::create_dir_all(&global_dir).unwrap();
        fs::write(
            global_dir.join("config.toml"),
            "inbox_dir = \"/global/inbox\"\nbind = \"0.0.0.0:8080\"\n",
        )
        .unwrap();

        let workspace = TempDir::new().unwrap();
        write_workspace_config(&workspace, "config.toml", "inbox_dir = \"/workspace/inbox\"\n");

        let config = ConfigLoader::load(workspace.path()).unwrap();
        assert_eq!(config.inbox_dir, PathBuf::from("/workspace/inbox"));
        assert_eq!(config.bind, "0.0.0.0:8080");
    });
}

#[test]
fn test_environment_specific_file() {
    with_clean_env(|_| {
        let workspace = TempDir::new().unwrap();
        write_workspace_config(&workspace, "config.toml", "output_dir = \"/base/out\"\n");
        write_workspace_config(&workspace, "production.toml", "output_dir = \"/prod/out\"\n");

        std::env::set_var("SCANDESK_ENV", "production");
        let config = ConfigLoader::load(workspace.path()).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("/prod/out"));
    });
}

#[test]
fn test_plain_variables_win_over_files() {
    with_clean_env(|_| {
        let workspace = TempDir::new().unwrap();
        write_workspace_config(
            &workspace,
            "config.toml",
            "inbox_dir = \"/file/inbox\"\n[merge]\nformat = \"pdf\"\n",
        );

        std::env::set_var("DOCUMENT_DIR", "/env/inbox");
        std::env::set_var("BIND_ADDRESS", "127.0.0.1:9999");
        std::env::set_var("SCANDESK__MERGE__FORMAT", "concat");

        let config = ConfigLoader::load(workspace.path()).unwrap();
        assert_eq!(config.inbox_dir, PathBuf::from("/env/inbox"));
        assert_eq!(config.bind, "127.0.0.1:9999");
        assert_eq!(config.merge.format, MergeFormatKind::Concat);
    });
}

#[test]
fn test_empty_plain_variable_is_ignored() {
    with_clean_env(|_| {
        let workspace = TempDir::new().unwrap();
        std::env::set_var("STATIC_DIR", "");
        let config = ConfigLoader::load(workspace.path()).unwrap();
        assert!(config.static_dir.is_none());
    });
}

#[test]
fn test_environment_name_cannot_leave_config_dir() {
    with_clean_env(|_| {
        let workspace = TempDir::new().unwrap();
        fs::write(workspace.path().join("escape.toml"), "inbox_dir = \"/escaped\"\n").unwrap();
        write_workspace_config(&workspace, "config.toml", "inbox_dir = \"/base\"\n");

        std::env::set_var("SCANDESK_ENV", "../escape");
        assert!(ConfigLoader::load(workspace.path()).is_err());
    });
}
