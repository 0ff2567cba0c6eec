//! filesift - deterministic, collision-safe directory organization
//!
//! This library assigns every regular file of a directory to a category by
//! extension, resolves destination-name collisions, and either reports the
//! plan (preview) or performs the moves (execute), returning a structured
//! report either way. Category tables and file filters are configurable via
//! TOML.

pub mod classifier;
pub mod cli;
pub mod config;
pub mod organizer;
pub mod output;

pub use classifier::{Category, CategoryTable, FALLBACK_CATEGORY};
pub use config::{CompiledFilters, ConfigError, OrganizerConfig};
pub use organizer::{Mode, Organizer, Report, RunStatus};

pub use cli::{OrganizeCommand, run_cli};
