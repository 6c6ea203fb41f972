//! CLI command handlers, one file per command.

mod archive;
mod checksum;
mod resolve;

pub use archive::run_archive;
pub use checksum::run_checksum;
pub use resolve::run_resolve;
