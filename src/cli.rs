//! CLI domain: parse, route, output, and presentation only.
//! Commands load a fixture into a fresh repository and render a view of it.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands, ExportFormat};
pub use presentation::{format_check_summary, format_export, format_items_table};
pub use route::RunContext;
