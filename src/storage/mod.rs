//! # Storage Layer
//!
//! Persistence and configuration for tasktree.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Tasks | JSONL (one node per line, root first) | `{data_dir}/tasks.jsonl` |
//! | Config | TOML | `{config_dir}/config.toml` |
//!
//! ## Write Safety
//!
//! - [`TaskStore`] locks with `fs2` and writes through a temp file + rename
//! - Every save is a full overwrite; a failed save leaves the old file intact
//!
//! ## Key Types
//!
//! - [`ForestStore`] - The persistence handle the engine is given
//! - [`TaskStore`] - File-backed store
//! - [`MemoryStore`] - In-memory store for tests
//! - [`Config`] - User configuration

mod codec;
mod config;
mod jsonl;
mod store;

pub use codec::{decode, encode, CodecError};
pub use config::{Config, ConfigError, OutputFormat, StoreConfig};
pub use jsonl::TaskStore;
pub use store::{ForestStore, MemoryStore};
