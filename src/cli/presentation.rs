//! CLI presentation: text and json formatters for listings and merges.

use crate::error::ApiError;
use crate::store::MergeOutcome;
use crate::types::DocumentEntry;
use comfy_table::Table;

pub fn format_entries_text(entries: &[DocumentEntry]) -> String {
    if entries.is_empty() {
        return "No documents".to_string();
    }
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(vec!["Name", "Id"]);
    for entry in entries {
        table.add_row(vec![entry.name.clone(), entry.id.to_hex()]);
    }
    table.to_string()
}

pub fn format_entries_json(entries: &[DocumentEntry]) -> Result<String, ApiError> {
    serde_json::to_string_pretty(entries)
        .map_err(|e| ApiError::ServerError(format!("Failed to serialize listing: {}", e)))
}

pub fn format_merge_outcome(outcome: &MergeOutcome) -> String {
    match outcome {
        MergeOutcome::Merged { entry, sources } => {
            let mut s = format!("Created {} from {} document(s):", entry.name, sources.len());
            for (i, name) in sources.iter().enumerate() {
                s.push_str(&format!("\n  {}. {}", i + 1, name));
            }
            s.push_str(&format!("\nId: {}", entry.id));
            s
        }
        MergeOutcome::Skipped => {
            "None of the given ids resolved; nothing was merged".to_string()
        }
    }
}
