//! CLI domain: parse, route, output and presentation only.
//! Document semantics live in the store; the route table just dispatches.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands};
pub use presentation::{format_entries_json, format_entries_text, format_merge_outcome};
pub use route::{load_config, RunContext};
