pub mod config;
pub mod error;
pub mod logging;

// Filename resolution
pub mod property;
pub mod template;
pub mod unique;

// Archiving
pub mod archive;
pub mod audit;
pub mod checksum;
pub mod message;
pub mod storage;

pub use archive::Archiver;
pub use error::{ArchiveError, Result};
pub use template::{resolve, ResolutionContext};
pub use unique::unique_path;
