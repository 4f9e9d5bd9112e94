//! Check Cloud Support CLI
//!
//! Annotates API reference documents with the national clouds that
//! support them, based on each cloud's OpenAPI description.

mod report;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use cloud_support_analyzer::{EditionTrees, Reconciler, SpecTree};
use cloud_support_annotator::{IncludeAnnotator, DEFAULT_INCLUDE_DIRECTORY};
use cloud_support_common::ApiOverrides;
use cloud_support_parser::{ApiDocument, DocSet};
use colored::*;
use report::UnprocessedReport;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "check-cloud-support")]
#[command(version, about = "Check Microsoft Graph national cloud support", long_about = None)]
#[command(args_conflicts_with_subcommands = true, subcommand_negates_reqs = true)]
#[command(after_help = "EXAMPLES:\n  \
    # Annotate v1.0 API docs\n  \
    check-cloud-support -o ./openapi/v1.0 -a ./api-reference/v1.0/api\n\n  \
    # Re-place existing INCLUDE lines and log failures\n  \
    check-cloud-support -o ./openapi/beta -a ./api-reference/beta/api -r -f unprocessed.csv")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[command(flatten)]
    run: RunArgs,

    /// If specified, existing INCLUDE placement is ignored
    #[arg(short, long)]
    remove_old_includes: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run copilot tasks
    ///
    /// Reads `v1.0` and `beta` subfolders of the OpenAPI folder and
    /// reconciles each document per edition.
    Copilot {
        #[command(flatten)]
        run: RunArgs,

        /// The path to a folder containing INCLUDE files
        #[arg(short, long)]
        include_directory: String,
    },
}

/// Options shared by every mode
#[derive(Args, Debug)]
struct RunArgs {
    /// The path to a folder containing the OpenAPI descriptions
    #[arg(short, long = "open-api", required = true)]
    open_api: Option<PathBuf>,

    /// The path to a folder containing the API docs
    #[arg(short, long = "api-docs", required = true)]
    api_docs: Option<PathBuf>,

    /// The path to a JSON file containing API overrides
    #[arg(short = 'd', long)]
    overrides: Option<PathBuf>,

    /// The path to a JSON file containing cloud exclusions
    #[arg(short, long)]
    excludes: Option<PathBuf>,

    /// If specified, process will pause after the specified size, allowing you to modify docs in batches
    #[arg(short, long, default_value_t = 0)]
    batch_size: usize,

    /// If specified, all files that were not processed are logged to this file
    #[arg(short = 'f', long)]
    out_file: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl RunArgs {
    fn folders(&self) -> Result<(&Path, &Path)> {
        let open_api = self
            .open_api
            .as_deref()
            .context("The --open-api option cannot be empty")?;
        let api_docs = self
            .api_docs
            .as_deref()
            .context("The --api-docs option cannot be empty")?;
        Ok((open_api, api_docs))
    }
}

/// URL trees the documents are checked against
enum Trees {
    /// One tree for the whole run
    Single(SpecTree),
    /// v1.0 and beta trees, chosen per operation
    ByEdition(EditionTrees),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        None => check_command(&cli.run, cli.remove_old_includes),
        Some(Commands::Copilot {
            run,
            include_directory,
        }) => copilot_command(&run, &include_directory),
    }
}

fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { Level::TRACE } else { Level::WARN };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to initialize logging")?;

    if verbose {
        println!("{} Verbose mode enabled", "→".cyan());
    }

    Ok(())
}

fn print_settings(title: &str, run: &RunArgs, open_api: &Path, api_docs: &Path) {
    println!("{}", title.bold());
    println!("  OpenAPI folder: {}", open_api.display());
    println!("  Docs folder: {}", api_docs.display());
    if run.batch_size > 0 {
        println!("  Batching with batch size: {}", run.batch_size);
    }

    let describe = |path: &Option<PathBuf>| {
        path.as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "NONE".to_string())
    };
    println!("  API overrides file: {}", describe(&run.overrides));
    println!("  Cloud exclusions file: {}", describe(&run.excludes));
}

fn check_command(run: &RunArgs, remove_old_includes: bool) -> Result<()> {
    init_logging(run.verbose)?;
    let (open_api, api_docs) = run.folders()?;
    print_settings("Check Microsoft Graph cloud support", run, open_api, api_docs);

    println!("{} Loading OpenAPI descriptions...", "→".cyan());
    let tree = SpecTree::from_directory(open_api).with_context(|| {
        format!("Failed to load OpenAPI descriptions from {}", open_api.display())
    })?;

    let annotator = IncludeAnnotator::new(DEFAULT_INCLUDE_DIRECTORY, remove_old_includes)
        .context("Failed to create annotator")?;

    process_documents(run, api_docs, &Trees::Single(tree), annotator)
}

fn copilot_command(run: &RunArgs, include_directory: &str) -> Result<()> {
    init_logging(run.verbose)?;
    let (open_api, api_docs) = run.folders()?;
    print_settings("Check Copilot APIs cloud support", run, open_api, api_docs);
    println!("  Include directory: {}", include_directory);

    println!("{} Loading v1.0 and beta OpenAPI descriptions...", "→".cyan());
    let trees = EditionTrees::from_directory(open_api).with_context(|| {
        format!("Failed to load OpenAPI descriptions from {}", open_api.display())
    })?;

    let annotator =
        IncludeAnnotator::new(include_directory, true).context("Failed to create annotator")?;

    process_documents(run, api_docs, &Trees::ByEdition(trees), annotator)
}

fn process_documents(
    run: &RunArgs,
    api_docs: &Path,
    trees: &Trees,
    mut annotator: IncludeAnnotator,
) -> Result<()> {
    let overrides = ApiOverrides::load(run.overrides.as_deref(), run.excludes.as_deref())
        .context("Failed to load API overrides and cloud exclusions")?;
    println!(
        "{} Loaded {} API overrides and {} cloud exclusions",
        "→".cyan(),
        overrides.overrides().len(),
        overrides.exclusions().len()
    );
    let mut report = UnprocessedReport::new(run.out_file.clone())?;

    let docs = DocSet::from_directory(api_docs)
        .with_context(|| format!("Failed to load API docs from {}", api_docs.display()))?;
    println!(
        "{} Checking {} API docs...",
        "→".cyan(),
        docs.documents.len()
    );

    let reconciler = Reconciler::new(&overrides);
    let mut processed = 0;

    for doc in &docs.documents {
        if let Err(e) = annotate(&reconciler, trees, doc, &mut annotator) {
            tracing::error!("Error adding INCLUDE to {}: {}", doc.file_path.display(), e);
            report.record(doc.file_name(), e.to_string());
        }

        processed += 1;

        if run.batch_size > 0 && processed >= run.batch_size {
            report.flush()?;
            wait_for_resume(run.batch_size)?;
            processed = 0;
        }
    }

    report.flush()?;

    println!(
        "\n{} Annotated {} of {} API docs",
        "✓".green().bold(),
        annotator.annotated(),
        docs.documents.len()
    );
    if reconciler.mismatches() > 0 {
        println!(
            "{} {} operations disagreed with their document's support status",
            "⚠".yellow(),
            reconciler.mismatches()
        );
    }
    if report.total() > 0 {
        println!(
            "{} {} API docs were not processed",
            "⚠".yellow(),
            report.total()
        );
        if let Some(out_file) = &run.out_file {
            println!("  See {}", out_file.display());
        }
    }

    Ok(())
}

fn annotate(
    reconciler: &Reconciler<'_>,
    trees: &Trees,
    doc: &ApiDocument,
    annotator: &mut IncludeAnnotator,
) -> cloud_support_common::Result<()> {
    let status = match trees {
        Trees::Single(tree) => reconciler.annotate_document(tree, doc, annotator)?,
        Trees::ByEdition(trees) => reconciler.annotate_document_by_edition(trees, doc, annotator)?,
    };
    tracing::info!("{} support status: {}", doc.file_path.display(), status);
    Ok(())
}

fn wait_for_resume(batch_size: usize) -> Result<()> {
    print!(
        "Reached batch size {}. Press Enter to resume processing.",
        batch_size
    );
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;

    Ok(())
}
