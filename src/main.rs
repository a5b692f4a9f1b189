//! PDF link and text scrubbing CLI.
//!
//! Removes every hyperlink whose target contains a pattern and redacts the
//! pattern wherever it appears in the page text, writing `<name>_clean.pdf`
//! next to the input.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pdf_scrub::{ErrorKind, RedactionOptions, RedactionReport, RedactionService};

/// PDF Link & Text Scrubber
///
/// Remove links and replace text in a PDF. Links are matched on their
/// target URI ignoring case; page text is matched literally.
#[derive(Parser)]
#[command(name = "pdf-scrub")]
#[command(version, about, long_about = None)]
struct Cli {
    /// The source PDF file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// The text/URL pattern to remove
    #[arg(value_name = "PATTERN")]
    pattern: String,

    /// Text to put in place of the removed text (e.g. '[REDACTED]')
    #[arg(short, long, value_name = "TEXT")]
    replace: Option<String>,

    /// Preview changes without writing a file
    #[arg(long)]
    dry_run: bool,

    /// Hard cap on text matches redacted per page (default: every match)
    #[arg(long, value_name = "N")]
    max_hits: Option<u32>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Runs the MuPDF-backed service and prints its report.
struct ScrubHandler {
    service: RedactionService,
    verbose: bool,
}

impl ScrubHandler {
    fn new(verbose: bool) -> Self {
        Self {
            service: RedactionService::with_mupdf(),
            verbose,
        }
    }

    /// Runs one scrub and prints the outcome.
    fn scrub(&self, input: &Path, options: &RedactionOptions) -> Result<()> {
        if self.verbose {
            println!("Input:   {}", input.display());
            println!("Pattern: {}", options.pattern);
        }

        let report = self
            .service
            .redact(input, options)
            .map_err(|e| match e.kind() {
                ErrorKind::UserInput => anyhow::Error::new(e),
                ErrorKind::Processing => anyhow::Error::new(e).context("Redaction failed"),
            })?;

        print_report(&report, options, self.verbose);
        Ok(())
    }
}

fn print_report(report: &RedactionReport, options: &RedactionOptions, verbose: bool) {
    let summary = &report.summary;

    if verbose {
        println!("\nSummary:");
        println!("  Pages processed: {}", summary.pages_processed);
        println!("  Pages modified:  {}", summary.pages_modified);
    }

    if report.dry_run {
        println!("🔎 Dry Run Results for '{}':", options.pattern);
        println!("   - Links to be removed: {}", summary.links_removed);
        println!(
            "   - Text instances to be scrubbed: {}",
            summary.text_instances_redacted
        );
        return;
    }

    println!("✅ Process Complete");
    println!("   - Removed {} links.", summary.links_removed);
    println!(
        "   - Replaced {} text instances with '{}'.",
        summary.text_instances_redacted,
        options.replacement_label()
    );
    if let Some(output) = &report.output {
        println!("📁 Saved to: {}", output.display());
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "pdf_scrub=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_options(cli: &Cli) -> RedactionOptions {
    RedactionOptions::new(cli.pattern.clone())
        .with_replacement(cli.replace.clone())
        .with_dry_run(cli.dry_run)
        .with_max_hits(cli.max_hits)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let handler = ScrubHandler::new(cli.verbose);
    let options = build_options(&cli);

    match handler.scrub(&cli.file, &options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("❌ Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
