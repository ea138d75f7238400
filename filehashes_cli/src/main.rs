use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use filehashes_cli::config::{CliOverrides, ConfigManager};
use filehashes_cli::orchestrators::hash_orchestrator::{HashOptions, HashOrchestrator};
use filehashes_cli::output::{OutputFormat, create_formatter};
use filehashes_core::AlgorithmRegistry;
use std::io::IsTerminal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "filehashes")]
#[command(author, version, about = "Concurrent, resumable file hashing", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Configuration file to use instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Hash algorithm to use (repeatable or comma separated)
    #[arg(short = 'a', long = "algorithm", value_name = "ALG", value_delimiter = ',')]
    algorithms: Vec<String>,

    /// Number of files hashed at the same time
    #[arg(short, long, value_name = "N")]
    concurrency: Option<usize>,

    /// Read buffer size per file in bytes
    #[arg(long, value_name = "BYTES")]
    buffer_size: Option<usize>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Continue the requests saved by an interrupted run
    #[arg(long, value_name = "FILE")]
    resume: Option<PathBuf>,

    /// Where to save stopped requests when interrupted
    #[arg(long, value_name = "FILE")]
    save_state: Option<PathBuf>,

    /// Print the available algorithms and exit
    #[arg(long)]
    list_algorithms: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Files to hash
    files: Vec<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            algorithms: self.algorithms.clone(),
            concurrency: self.concurrency,
            buffer_size: self.buffer_size,
            format: self.format,
            save_state: self.save_state.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on debug flag
    if cli.debug {
        env_logger::Builder::from_env(env_logger::Env::default())
            .filter_level(log::LevelFilter::Debug)
            .filter_module("filehashes_core", log::LevelFilter::Debug)
            .filter_module("filehashes_cli", log::LevelFilter::Debug)
            .format_timestamp_millis()
            .init();
        eprintln!("Debug logging enabled");
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let config_manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let mut config = config_manager.load()?;
    config.apply_cli_overrides(&cli.overrides());
    log::debug!("Configuration: {config:?}");

    let registry = AlgorithmRegistry::builtin();
    if cli.list_algorithms {
        list_algorithms(&registry);
        return Ok(());
    }

    let use_color = config.output.color_enabled && !cli.no_color && std::io::stdout().is_terminal();
    colored::control::set_override(use_color);
    let formatter = create_formatter(config.output.format, use_color);

    let orchestrator = HashOrchestrator::new(config, registry)?;
    let options = HashOptions {
        files: cli.files,
        resume: cli.resume,
    };
    let summary = orchestrator
        .run(&options, formatter.as_ref(), ctrl_c())
        .await
        .context("Hashing failed")?;

    if let Some(path) = &summary.saved_to {
        eprintln!(
            "{}",
            format!(
                "Saved {} stopped file(s); continue with --resume {}",
                summary.stopped.len(),
                path.display()
            )
            .yellow()
        );
    }

    let code = summary.exit_code();
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}

/// Resolves on Ctrl-C; never resolves if the signal cannot be watched
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::warn!("Cannot listen for Ctrl-C: {e}");
        std::future::pending::<()>().await;
    }
}

fn list_algorithms(registry: &AlgorithmRegistry) {
    for id in registry.list() {
        let Some(algorithm) = registry.get(&id) else {
            continue;
        };
        let note = if algorithm.supports_resume() {
            String::new()
        } else {
            " (not resumable)".dimmed().to_string()
        };
        let name = format!("{:<8}", id.as_str());
        println!("{} {}{note}", name.bold(), algorithm.display_name());
    }
}
