//! tidydir - sort the files of a directory into category subdirectories
//!
//! This library resolves a category for each top-level file of a directory
//! (configured extension rules first, MIME type lookup as a fallback), optionally
//! prefixes file names with the current date, and either moves the files or
//! simulates the moves in an in-memory directory tree for a dry-run preview.

pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod naming;
pub mod organizer;
pub mod output;
pub mod tree;

pub use config::{CategoryRules, ConfigError};
pub use file_category::{CategoryResolver, GuessedMime, MimeLookup, NoMimeLookup};
pub use file_organizer::{Mover, OrganizeError, OrganizeResult, PlannedMove};
pub use naming::{Clock, FixedClock, SystemClock};
pub use organizer::{FileOutcome, OrganizeOptions, OrganizeReport, Organizer};
pub use tree::{DirectoryNode, DirectoryTree};

pub use cli::{Args, run_cli};
