//! # typebridge-cli
//!
//! CLI library for generating TypeScript declaration files from RPC
//! surface manifests.
//!
//! ## Architecture
//!
//! - [`config`] - Configuration management and TOML parsing
//! - [`manifest`] - Manifest discovery, loading, and merging
//! - [`writer`] - File output and dry-run support
//! - [`watcher`] - File system watching for development mode
//! - [`error`] - Error types and handling

pub mod config;
pub mod error;
pub mod manifest;
pub mod watcher;
pub mod writer;

// Re-export main types for convenience
pub use config::{CliArgs, Config, ConfigManager};
pub use error::{CliError, CliResult};
pub use manifest::{load_manifest, load_manifests};
pub use watcher::ManifestWatcher;
pub use writer::{FileWriter, WriteResult};
