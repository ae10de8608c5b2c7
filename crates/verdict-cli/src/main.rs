//! Verdict CLI - take the claim/evidence survey and manage its data.

use clap::Parser;
use tracing_subscriber::EnvFilter;
use verdict_cli::commands;
use verdict_cli::repl;
use verdict_cli::{Cli, Command, Config, Formatter};
use verdict_domain::SurveyStore;
use verdict_store::SqliteStore;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> verdict_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load or create config
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load_or_init()?,
    };

    // Initialize tracing (log to stderr so it never mixes with survey output)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.settings.log_level));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    // Create formatter
    let formatter = Formatter::new(format, color_enabled);

    // Open the survey store
    let db_path = config.database_path(cli.db.as_deref())?;
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    tracing::debug!(path = %db_path.display(), "Opening survey store");
    let mut store = SqliteStore::new(&db_path)?;

    // Handle commands
    match cli.command {
        None => {
            let catalog = store.load_catalog()?;
            repl::run_repl(&mut store, catalog, None, &config, &formatter)?;
        }
        Some(Command::Take(args)) => {
            let catalog = store.load_catalog()?;
            repl::run_repl(&mut store, catalog, args.user, &config, &formatter)?;
        }
        Some(Command::Import(args)) => {
            commands::execute_import(args, &mut store, &formatter)?;
        }
        Some(Command::Export(args)) => {
            commands::execute_export(args, &store, &formatter)?;
        }
        Some(Command::Results(args)) => {
            commands::execute_results(args, &store, &formatter)?;
        }
    }

    Ok(())
}
