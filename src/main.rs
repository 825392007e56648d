use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dirstat_cleanup::app::{handle_fatal_error, init_logging, AppConfig};
use dirstat_cleanup::cleanup::{
    CleanupAction, CleanupCatalog, CleanupExecutor, ConfirmationPrompt, ConsoleReporter,
    ExecutionResult, FixedAnswer, RefreshDispatcher, Selection, StdinPrompter,
};
use dirstat_cleanup::config::ConfigLoader;
use dirstat_cleanup::subprocess::SubprocessManager;
use dirstat_cleanup::CleanupError;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Run disk cleanup actions on files and directories
#[derive(Parser)]
#[command(name = "dirstat-cleanup")]
#[command(about = "Run configurable cleanup actions on files and directories", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List every action in the catalog
    Actions {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// List the actions applicable to a selection
    List {
        /// Treat directory arguments as their dot entry (the files directly inside)
        #[arg(long)]
        dot_entry: bool,

        /// Print as JSON
        #[arg(long)]
        json: bool,

        /// Selected files and directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
    /// Run one action on a selection
    Run {
        /// Action id, e.g. cleanupMoveToTrash
        action: String,

        /// Treat directory arguments as their dot entry (the files directly inside)
        #[arg(long)]
        dot_entry: bool,

        /// Answer yes to the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Selected files and directories
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    if let Err(e) = run(cli).await {
        handle_fatal_error(e, verbose);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let loader = match &cli.config {
        Some(path) => ConfigLoader::with_path(path),
        None => ConfigLoader::new(),
    };
    let engine_config = loader.load(cli.config.is_some()).await?;

    let app_config =
        AppConfig::new(cli.verbose).with_log_filter(engine_config.log_filter.clone());
    init_logging(&app_config);
    debug!("Using shell {}", engine_config.shell);

    let catalog = CleanupCatalog::from_config(&engine_config)?;

    match cli.command {
        Commands::Actions { json } => print_actions(catalog.iter(), json),
        Commands::List {
            dot_entry,
            json,
            paths,
        } => {
            let selection = Selection::from_paths(&paths, dot_entry)?;
            print_actions(catalog.applicable_actions(&selection).into_iter(), json)
        }
        Commands::Run {
            action,
            dot_entry,
            yes,
            paths,
        } => {
            let selection = Selection::from_paths(&paths, dot_entry)?;
            let action = catalog
                .get(&action)
                .ok_or_else(|| CleanupError::UnknownAction(action.clone()))?;

            let prompt: Arc<dyn ConfirmationPrompt> = if yes {
                Arc::new(FixedAnswer::yes())
            } else {
                Arc::new(StdinPrompter::new())
            };
            let (dispatcher, mut refresh_rx) = RefreshDispatcher::channel();
            let executor = CleanupExecutor::from_config(
                &engine_config,
                SubprocessManager::production(),
                dispatcher,
            )
            .with_prompt(prompt)
            .with_reporter(Arc::new(ConsoleReporter));

            let result = executor
                .execute(action, &selection)
                .await
                .with_context(|| format!("Cannot run {}", action.id()))?;
            drop(executor);

            while let Some(instruction) = refresh_rx.recv().await {
                println!(
                    "refresh: {:?} {}",
                    instruction.kind,
                    instruction.path.display()
                );
            }

            match result {
                ExecutionResult::Cancelled => {
                    println!("Cancelled.");
                    Ok(())
                }
                ExecutionResult::Completed(report) if report.all_succeeded() => Ok(()),
                ExecutionResult::Completed(report) => {
                    for failure in report.failures() {
                        eprintln!("{}: {}", failure.entry.display(), failure.status);
                    }
                    anyhow::bail!(
                        "{} of {} command(s) failed",
                        report.failures().count(),
                        report.outcomes.len()
                    )
                }
            }
        }
    }
}

fn print_actions<'a>(actions: impl Iterator<Item = &'a CleanupAction>, json: bool) -> Result<()> {
    if json {
        let specs: Vec<_> = actions.map(CleanupAction::spec).collect();
        println!("{}", serde_json::to_string_pretty(&specs)?);
        return Ok(());
    }

    for action in actions {
        println!(
            "{:<28} {}{}",
            action.id(),
            action.clean_title(),
            if action.is_enabled() { "" } else { " (disabled)" }
        );
    }
    Ok(())
}
