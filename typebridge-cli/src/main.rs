//! # typebridge
//!
//! CLI tool for generating TypeScript declaration files from RPC surface
//! manifests.
//!
//! ## Usage
//!
//! ```bash
//! # Generate declarations from manifests in the current directory
//! typebridge generate
//!
//! # Pick a registry and event table
//! typebridge generate --registry api --events push
//!
//! # Watch mode for development
//! typebridge generate --watch
//!
//! # Dry run to preview changes
//! typebridge generate --dry-run
//!
//! # Initialize configuration
//! typebridge init
//!
//! # Verify declarations are up-to-date
//! typebridge check
//! ```

use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

use typebridge::{Diagnostics, GenerateOptions, Generator, Outcome};
use typebridge_cli::{
    config::{CliArgs, Config, ConfigManager},
    error::CliError,
    manifest::load_manifests,
    watcher::ManifestWatcher,
    writer::{FileWriter, WriteResult},
};

#[derive(Parser)]
#[command(name = "typebridge")]
#[command(author, version, about = "Generate TypeScript declarations from RPC surface manifests", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate TypeScript declarations from surface manifests
    Generate {
        /// Base directory for manifest patterns
        #[arg(short, long, default_value = ".")]
        input: PathBuf,

        /// Manifest glob patterns (overrides configuration)
        #[arg(short, long)]
        manifest: Vec<String>,

        /// Output directory for the generated declaration file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Registry to generate declarations for
        #[arg(short, long)]
        registry: Option<String>,

        /// Event table to include as a ServerToClientEvents interface
        #[arg(short, long)]
        events: Option<String>,

        /// Treat unresolved types and dangling references as errors
        #[arg(long)]
        strict: bool,

        /// Watch for manifest changes and regenerate
        #[arg(short, long)]
        watch: bool,

        /// Preview changes without writing files
        #[arg(long)]
        dry_run: bool,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Initialize a new typebridge configuration file
    Init {
        /// Output path for configuration file
        #[arg(short, long, default_value = "typebridge.toml")]
        output: PathBuf,

        /// Overwrite existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Verify that generated declarations are up-to-date
    Check {
        /// Base directory for manifest patterns
        #[arg(short, long, default_value = ".")]
        input: PathBuf,

        /// Path to the generated declaration file
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            match e {
                CliError::Check(_) => ExitCode::from(2),
                _ => ExitCode::FAILURE,
            }
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Generate {
            input,
            manifest,
            output,
            registry,
            events,
            strict,
            watch,
            dry_run,
            config,
        } => {
            let config = ConfigManager::load(config.as_deref())?;
            let config = ConfigManager::merge_cli_args(
                config,
                &CliArgs {
                    manifests: manifest,
                    output,
                    registry,
                    events,
                    strict,
                    ..Default::default()
                },
            );

            if watch {
                run_watch_mode(&input, &config, dry_run)
            } else {
                run_generate(&input, &config, dry_run)
            }
        }

        Commands::Init { output, force } => cmd_init(output, force),

        Commands::Check {
            input,
            path,
            config,
        } => cmd_check(input, path, config),
    }
}

/// Run declaration generation once.
fn run_generate(input: &PathBuf, config: &Config, dry_run: bool) -> Result<(), CliError> {
    println!("{}", "Loading surface manifests...".cyan());

    let mut diag = Diagnostics::new(config.generate.strict);
    let manifest = load_manifests(input, &config.input.manifests, &mut diag)?;

    println!(
        "  Found {} registr{}, {} model(s)",
        manifest.registries.len().to_string().green(),
        if manifest.registries.len() == 1 { "y" } else { "ies" },
        manifest.models.len().to_string().green()
    );

    println!("{}", "Generating declarations...".cyan());

    let generator = Generator::new(GenerateOptions {
        registry: config.generate.registry.clone(),
        events: config.generate.events.clone(),
        strict: config.generate.strict,
    });
    let generated = generator.generate(&manifest, &mut diag)?;

    if !generated.warnings.is_empty() {
        println!(
            "{} {} warning(s):",
            "Warning:".yellow(),
            generated.warnings.len()
        );
        for warning in &generated.warnings {
            println!("  {warning}");
        }
    }

    let output_path = config.output.dir.join(&config.output.file);
    let writer = FileWriter::new(dry_run);

    match writer.write(&output_path, &generated.content)? {
        WriteResult::Written { path, bytes } => {
            println!(
                "{} Written {} bytes to {}",
                "✓".green(),
                bytes,
                path.display()
            );
        }
        WriteResult::DryRun { content, path } => {
            println!(
                "{} Would write to {}:",
                "[dry-run]".yellow(),
                path.display()
            );
            println!("{}", "─".repeat(60).dimmed());
            println!("{content}");
            println!("{}", "─".repeat(60).dimmed());
        }
    }

    if generated.outcome == Outcome::SuccessWithWarnings {
        println!("{}", "Completed with warnings".yellow());
    }

    Ok(())
}

/// Run in watch mode.
fn run_watch_mode(input: &PathBuf, config: &Config, dry_run: bool) -> Result<(), CliError> {
    println!("{}", "Starting watch mode...".cyan());
    println!("  Watching: {}", input.display());
    println!("  Press Ctrl+C to stop\n");

    // Initial generation
    run_generate(input, config, dry_run)?;

    let watcher = ManifestWatcher::new(input);
    let (_debouncer, rx) = watcher.watch()?;

    println!("\n{}", "Watching for changes...".cyan());

    while let Ok(event) = rx.recv() {
        if event.is_error() {
            println!(
                "{} {}",
                "Watch error:".red(),
                event.error_message().unwrap_or("Unknown error")
            );
            continue;
        }

        if let Some(path) = event.path() {
            println!("\n{} {}", "Manifest changed:".cyan(), path.display());
        }

        if let Err(e) = run_generate(input, config, dry_run) {
            println!("{} {}", "Generation error:".red(), e);
        }

        println!("\n{}", "Watching for changes...".cyan());
    }

    Ok(())
}

/// Init command implementation.
fn cmd_init(output: PathBuf, force: bool) -> Result<(), CliError> {
    match ConfigManager::init(&output, force) {
        Ok(()) => {
            println!(
                "{} Created configuration file: {}",
                "✓".green(),
                output.display()
            );
            Ok(())
        }
        Err(e) => {
            if matches!(&e, CliError::Init(_)) {
                println!("  Use --force to overwrite");
            }
            Err(e)
        }
    }
}

/// Check command implementation.
fn cmd_check(
    input: PathBuf,
    path: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<(), CliError> {
    println!("{}", "Checking declarations...".cyan());

    let config = ConfigManager::load(config_path.as_deref())?;
    let declaration_path = path.unwrap_or_else(|| config.output.dir.join(&config.output.file));

    if !declaration_path.exists() {
        return Err(CliError::Check(format!(
            "Declaration file not found: {}",
            declaration_path.display()
        )));
    }

    let existing_content = std::fs::read_to_string(&declaration_path)?;

    let mut diag = Diagnostics::new(config.generate.strict);
    let manifest = load_manifests(&input, &config.input.manifests, &mut diag)?;

    let generator = Generator::new(GenerateOptions {
        registry: config.generate.registry.clone(),
        events: config.generate.events.clone(),
        strict: config.generate.strict,
    });
    let generated = generator.generate(&manifest, &mut diag)?;

    if existing_content.trim() == generated.content.trim() {
        println!("{} Declarations are up-to-date", "✓".green());
        Ok(())
    } else {
        println!("{} Declarations are out of date", "✗".red());
        println!("  Run 'typebridge generate' to update");
        Err(CliError::Check("Declarations are out of date".to_string()))
    }
}
