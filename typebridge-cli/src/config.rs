//! Configuration management for the CLI.
//!
//! This module handles loading configuration from `typebridge.toml` files
//! and merging with command-line arguments.

use crate::error::{CliError, CliResult, ConfigError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "typebridge.toml";

/// Main configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Manifest input configuration.
    pub input: InputConfig,

    /// Output configuration.
    pub output: OutputConfig,

    /// Generation options.
    pub generate: GenerateConfig,
}

/// Manifest input configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Glob patterns for surface manifest files.
    pub manifests: Vec<String>,
}

/// Output configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory for generated files.
    pub dir: PathBuf,

    /// Output filename.
    pub file: String,
}

/// Generation options.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Registry to generate declarations for.
    pub registry: String,

    /// Event table to include, if any.
    pub events: Option<String>,

    /// Treat degradable diagnostics as errors.
    pub strict: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            manifests: vec!["*.manifest.json".to_string()],
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./generated"),
            file: "rpc.d.ts".to_string(),
        }
    }
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            registry: "default".to_string(),
            events: None,
            strict: false,
        }
    }
}

/// Configuration manager for loading and merging configs.
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from a file path.
    ///
    /// If the path is None, attempts to load from the default location.
    /// If no config file exists, returns default configuration.
    pub fn load(path: Option<&Path>) -> CliResult<Config> {
        let config_path = path
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILENAME));

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::invalid_toml(config_path, e.to_string()))?;

        Ok(config)
    }

    /// Merge CLI arguments into configuration.
    ///
    /// CLI arguments take precedence over config file values.
    pub fn merge_cli_args(mut config: Config, args: &CliArgs) -> Config {
        if !args.manifests.is_empty() {
            config.input.manifests = args.manifests.clone();
        }

        if let Some(ref output) = args.output {
            config.output.dir = output.clone();
        }

        if let Some(ref file) = args.output_file {
            config.output.file = file.clone();
        }

        if let Some(ref registry) = args.registry {
            config.generate.registry = registry.clone();
        }

        if let Some(ref events) = args.events {
            config.generate.events = Some(events.clone());
        }

        if args.strict {
            config.generate.strict = true;
        }

        config
    }

    /// Write the commented default configuration file.
    ///
    /// Refuses to overwrite an existing file unless `force` is set.
    pub fn init(path: &Path, force: bool) -> CliResult<()> {
        if path.exists() && !force {
            return Err(CliError::Init(format!(
                "Configuration file already exists: {}",
                path.display()
            )));
        }
        std::fs::write(path, Self::default_config_content())?;
        Ok(())
    }

    /// Generate default configuration file content with comments.
    pub fn default_config_content() -> &'static str {
        r#"# typebridge configuration file

[input]
# Glob patterns for surface manifest files, relative to this file
manifests = ["*.manifest.json"]

[output]
# Output directory for the generated declaration file
dir = "./generated"

# Output file name
file = "rpc.d.ts"

[generate]
# Registry to generate declarations for
registry = "default"

# Event table to include as a ServerToClientEvents interface
# events = "push"

# Treat unresolved types and dangling references as errors
strict = false
"#
    }
}

/// CLI arguments that can override configuration.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Manifest pattern overrides.
    pub manifests: Vec<String>,

    /// Output directory override.
    pub output: Option<PathBuf>,

    /// Output filename override.
    pub output_file: Option<String>,

    /// Registry override.
    pub registry: Option<String>,

    /// Event table override.
    pub events: Option<String>,

    /// Strict mode flag.
    pub strict: bool,
}
