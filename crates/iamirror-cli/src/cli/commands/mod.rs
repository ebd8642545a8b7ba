//! CLI command handlers, one file per command.

mod download;
mod validate;

pub use download::run_download;
pub use validate::run_validate;
