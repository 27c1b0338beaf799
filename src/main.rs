pub mod analyzer;
pub mod fallback;
pub mod parser;
pub mod records;
pub mod report;
pub mod utils;
pub mod visitor;

use crate::analyzer::CodeAnalyzer;
use anyhow::Result;
use clap::Parser;
use colored::*;
use std::fs;
use std::path::PathBuf;

/// Command line interface configuration using `clap`.
/// This struct defines the arguments and flags accepted by the program.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Root directory of the JavaScript tree to analyze.
    directory: PathBuf,

    /// Path the rendered report is written to.
    output: PathBuf,

    /// File extension to scan for (without the dot).
    #[arg(long, default_value = "js")]
    extension: String,

    /// Write the full report as JSON instead of Markdown.
    /// This is useful for integrating with other tools or CI/CD pipelines.
    #[arg(long)]
    json: bool,
}

/// Main entry point of the application.
///
/// Exits with status 0 whenever the root directory exists, even if
/// individual files failed to read or parse; only a missing directory is
/// a hard error.
fn main() -> Result<()> {
    let cli = Cli::parse();

    println!("Analyzing directory: {}", cli.directory.display());
    println!("Output file: {}\n", cli.output.display());

    let analyzer = CodeAnalyzer::new(&cli.extension);
    let analysis = analyzer.analyze(&cli.directory)?;

    let rendered = if cli.json {
        serde_json::to_string_pretty(&analysis)?
    } else {
        report::render_markdown(&analysis)
    };
    fs::write(&cli.output, rendered)?;

    println!("{}", "Analysis complete!".bold());
    println!(" * Files analyzed: {}", analysis.summary.total_files);
    println!(" * Functions: {}", analysis.summary.total_functions);
    println!(" * Classes: {}", analysis.summary.total_classes);
    println!(" * Exports: {}", analysis.summary.total_exports);
    println!(" * IPC handlers: {}", analysis.summary.handler_count);
    println!(" * Event listeners: {}", analysis.summary.listener_count);
    if analysis.summary.parse_failures > 0 {
        println!(
            " * {} file(s) fell back to pattern-based extraction",
            analysis.summary.parse_failures
        );
    }
    if analysis.summary.read_failures > 0 {
        println!(" * {} file(s) skipped as unreadable", analysis.summary.read_failures);
    }
    println!("\nReport saved to: {}", cli.output.display());

    Ok(())
}
