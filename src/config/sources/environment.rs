//! Environment sources: SCANDESK__* variables and the plain DOCUMENT_DIR family

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::ConfigError;
use config::Environment;

/// Plain variables understood for compatibility with existing deployments,
/// mapped to their configuration keys
const PLAIN_VARIABLES: [(&str, &str); 4] = [
    ("DOCUMENT_DIR", "inbox_dir"),
    ("DOCUMENT_OUTPUT_DIR", "output_dir"),
    ("STATIC_DIR", "static_dir"),
    ("BIND_ADDRESS", "bind"),
];

/// Add environment sources to builder.
/// `SCANDESK__INBOX_DIR`, `SCANDESK__MERGE__FORMAT`, ... map onto nested keys;
/// the plain variables are applied last and win.
pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let mut builder =
        builder.add_source(Environment::with_prefix("SCANDESK").separator("__"));

    for (variable, key) in PLAIN_VARIABLES {
        let value = std::env::var(variable).ok().filter(|v| !v.is_empty());
        builder = builder.set_override_option(key, value)?;
    }

    Ok(builder)
}
