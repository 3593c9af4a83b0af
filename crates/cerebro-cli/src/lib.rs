use std::path::{Path, PathBuf};

use anyhow::Result;
use cerebro_config::{Config, LoadOptions};
use cerebro_core::{read_document, section_names, DocumentChange, ExitCode, FsTemplateStore};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

pub mod commands;

pub use commands::{CommandError, CommandResult, Commands, ImportOutcome};

#[derive(Parser, Debug)]
#[command(
    name = "cerebro",
    author,
    version,
    about = "Manage markdown files with a configurable template library"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Template library directory (overrides CEREBRO_TEMPLATE_PATH)
    #[arg(long = "templates", value_name = "DIR", global = true)]
    templates: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    /// Suppress informational output
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a template section to a markdown file
    Add(TargetArgs),
    /// Remove a section from a markdown file
    Remove(TargetArgs),
    /// List all available templates in the library
    List,
    /// Import/update a template section from an existing file
    Import(ImportArgs),
}

#[derive(Args, Debug)]
struct TargetArgs {
    /// Name of the section
    #[arg(value_name = "SECTION")]
    section: String,

    /// Target markdown file
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    file: Option<PathBuf>,

    /// Print a diff instead of writing the file
    #[arg(long = "dry-run")]
    dry_run: bool,
}

#[derive(Args, Debug)]
struct ImportArgs {
    /// Name of the section to import
    #[arg(value_name = "SECTION")]
    section: String,

    /// Source file to import from
    #[arg(value_name = "FILE")]
    file: PathBuf,
}

/// Entry point for CLI execution. Returns the desired exit code.
pub fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let mut options = LoadOptions::from_env();
    if let Some(path) = &cli.templates {
        options = options.with_override_path(path);
    }
    let config = Config::load(options)?;
    tracing::debug!(
        template_dir = %config.template_dir.display(),
        source = %config.source.describe(),
        "configuration loaded"
    );

    let mut commands = Commands::new(FsTemplateStore::new(&config.template_dir));
    let code = match cli.command {
        Command::Add(args) => handle_add(&commands, &config, args, cli.quiet),
        Command::Remove(args) => handle_remove(&commands, &config, args, cli.quiet),
        Command::List => handle_list(&commands),
        Command::Import(args) => handle_import(&mut commands, args, cli.quiet),
    };

    Ok(code as i32)
}

/// Installs a stderr subscriber. `RUST_LOG` wins over the verbosity flags.
pub fn init_logging(verbose: bool, quiet: bool) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_add(
    commands: &Commands<FsTemplateStore>,
    config: &Config,
    args: TargetArgs,
    quiet: bool,
) -> ExitCode {
    let file = args.file.unwrap_or_else(|| config.default_document.clone());
    match commands.add(&args.section, &file, args.dry_run) {
        Ok(change) => {
            if args.dry_run {
                print_dry_run(&change);
            } else if !quiet {
                println!("Added section '{}' to {}", args.section, file.display());
            }
            ExitCode::Success
        }
        Err(err) => report("adding section", &err),
    }
}

fn handle_remove(
    commands: &Commands<FsTemplateStore>,
    config: &Config,
    args: TargetArgs,
    quiet: bool,
) -> ExitCode {
    let file = args.file.unwrap_or_else(|| config.default_document.clone());
    match commands.remove(&args.section, &file, args.dry_run) {
        Ok(change) => {
            if args.dry_run {
                print_dry_run(&change);
            } else if !quiet {
                println!("Removed section '{}' from {}", args.section, file.display());
            }
            ExitCode::Success
        }
        Err(err) => {
            let exit = report("removing section", &err);
            if matches!(&err, CommandError::Core(core) if core.is_not_found()) {
                print_candidates(&file);
            }
            exit
        }
    }
}

fn handle_list(commands: &Commands<FsTemplateStore>) -> ExitCode {
    match commands.list() {
        Ok(names) if names.is_empty() => {
            println!("No templates found in library");
            ExitCode::Success
        }
        Ok(names) => {
            println!("Available templates:");
            for name in names {
                println!("  - {name}");
            }
            ExitCode::Success
        }
        Err(err) => report("listing templates", &err),
    }
}

fn handle_import(
    commands: &mut Commands<FsTemplateStore>,
    args: ImportArgs,
    quiet: bool,
) -> ExitCode {
    match commands.import(&args.section, &args.file) {
        Ok(outcome) => {
            if !quiet {
                let verb = match outcome {
                    ImportOutcome::Imported => "Imported",
                    ImportOutcome::Updated => "Updated",
                };
                println!(
                    "{verb} template '{}' from {}",
                    args.section,
                    args.file.display()
                );
            }
            ExitCode::Success
        }
        Err(err) => report("importing section", &err),
    }
}

fn report(action: &str, err: &CommandError) -> ExitCode {
    eprintln!("Error {action}: {err}");
    err.exit_code()
}

fn print_dry_run(change: &DocumentChange) {
    match &change.diff {
        Some(diff) => print!("{diff}"),
        None => println!("No changes (dry run)"),
    }
}

fn print_candidates(file: &Path) {
    let Ok(content) = read_document(file) else {
        return;
    };
    let names = section_names(&content);
    if names.is_empty() {
        return;
    }
    eprintln!("Sections in {}:", file.display());
    for name in names.iter().take(20) {
        eprintln!("  - {name}");
    }
}
