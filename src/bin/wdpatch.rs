//! wdpatch CLI: apply an RDF patch document to Wikidata.
//!
//! Usage:
//!   wdpatch [--input FILE] [--dry-run] [--username USER] [--summary TEXT]
//!           [--config PATH] [--verbose]
//!
//! Reads Turtle from FILE or stdin. Exit status is 0 when every edit
//! succeeded, 1 when an item's edit or a triple's wiki lookup failed, 2 when
//! the run was aborted.

use clap::Parser;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use wdpatch::{page_blocklist, CommitDriver, CommitMode, Config, PatchEngine, WikiClient};

const EXIT_ABORTED: i32 = 2;

#[derive(Parser)]
#[command(name = "wdpatch", version, about = "Apply RDF patches to Wikidata claims")]
struct Cli {
    /// Turtle document to apply (default: stdin)
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// Print the per-item diff without editing
    #[arg(short = 'n', long)]
    dry_run: bool,
    /// Bot-password user name (overrides config and environment)
    #[arg(short, long)]
    username: Option<String>,
    /// Edit summary for items whose patch carries none
    #[arg(short, long)]
    summary: Option<String>,
    /// Path to config.yaml
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_input(path: Option<&Path>) -> std::io::Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

fn cmd_patch(cli: Cli) -> i32 {
    let mut config = match Config::discover(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_ABORTED;
        }
    };
    if let Some(username) = cli.username {
        config.username = Some(username);
    }
    let mut blocklist = match config.blocked_items() {
        Ok(items) => items,
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_ABORTED;
        }
    };
    let mode = if cli.dry_run { CommitMode::DryRun } else { CommitMode::Live };
    if mode == CommitMode::Live {
        if let Err(e) = config.credentials() {
            eprintln!("Error: {}", e);
            return EXIT_ABORTED;
        }
    }

    let input = match read_input(cli.input.as_deref()) {
        Ok(input) => input,
        Err(e) => {
            eprintln!("Error: cannot read input: {}", e);
            return EXIT_ABORTED;
        }
    };

    let wiki: Arc<dyn WikiClient> = match config.api_client() {
        Ok(client) => Arc::new(client),
        Err(e) => {
            eprintln!("Error: {}", e);
            return EXIT_ABORTED;
        }
    };

    if let Some(title) = &config.blocklist_page {
        match page_blocklist(wiki.as_ref(), title) {
            Ok(items) => blocklist.extend(items),
            Err(e) => {
                eprintln!("Error: cannot load blocklist page {}: {}", title, e);
                return EXIT_ABORTED;
            }
        }
    }

    let summary = cli.summary.or_else(|| config.default_summary.clone());
    let mut engine = PatchEngine::new(wiki.clone()).with_default_summary(summary);
    if let Err(e) = engine.process_document(&input) {
        eprintln!("Error: {}", e);
        return EXIT_ABORTED;
    }
    let triples_failed = engine.failed_triples() > 0;
    if triples_failed {
        error!("{} triples skipped after wiki errors", engine.failed_triples());
    }
    let edits = engine.finalize();
    if edits.is_empty() {
        info!("No changes");
        return i32::from(triples_failed);
    }

    let driver = CommitDriver::new(wiki, mode).with_blocklist(blocklist);
    let stdout = std::io::stdout();
    match driver.commit(&edits, &mut stdout.lock()) {
        Ok(report) => {
            info!("{}", report);
            report.exit_code().max(i32::from(triples_failed))
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            EXIT_ABORTED
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let code = cmd_patch(cli);
    std::process::exit(code);
}
