//! # CLI Module
//!
//! Command-line interface for finding identical-looking images.
//!
//! ## Usage
//! ```bash
//! # Group images in the current directory by average hash
//! find-similar-images ahash
//!
//! # Daubechies wavelet hash over another directory
//! find-similar-images whash-db4 ~/Photos
//!
//! # JSON output
//! find-similar-images phash ~/Photos --output json
//! ```
//!
//! Each group of two or more images with the same fingerprint is printed on
//! one line, paths separated by spaces.

use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};
use console::{style, Term};
use imagehash::core::duplicates::{find_identical_with_progress, DuplicateReport};
use imagehash::core::hasher::{HashAlgorithmKind, HasherConfig};
use imagehash::core::transform::Wavelet;
use imagehash::error::{ImageHashError, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;

/// Identifies similar images in the directory.
#[derive(Parser, Debug)]
#[command(name = "find-similar-images")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Hash method
    method: Method,

    /// Directory to search
    #[arg(default_value = ".")]
    directory: PathBuf,

    /// Hash size (bits per side)
    #[arg(long, default_value = "8")]
    hash_size: u32,

    /// Output format
    #[arg(short, long, default_value = "plain")]
    output: OutputFormat,

    /// Hide the progress bar
    #[arg(short, long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Method {
    /// Average hash
    Ahash,
    /// Perceptual hash
    Phash,
    /// Difference hash
    Dhash,
    /// Haar wavelet hash
    WhashHaar,
    /// Daubechies wavelet hash
    WhashDb4,
}

impl Method {
    fn config(self) -> HasherConfig {
        let config = HasherConfig::new();
        match self {
            Method::Ahash => config.algorithm(HashAlgorithmKind::Average),
            Method::Phash => config.algorithm(HashAlgorithmKind::Perceptual),
            Method::Dhash => config.algorithm(HashAlgorithmKind::Difference),
            Method::WhashHaar => config
                .algorithm(HashAlgorithmKind::Wavelet)
                .wavelet(Wavelet::Haar),
            Method::WhashDb4 => config
                .algorithm(HashAlgorithmKind::Wavelet)
                .wavelet(Wavelet::Daubechies4),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One group per line, paths separated by spaces
    Plain,
    /// JSON output for scripting
    Json,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            tracing::debug!("Invalid arguments: {}", e);
            usage()
        }
    };

    let hasher = cli.method.config().hash_size(cli.hash_size).build()?;

    let progress = if cli.quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new(0);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .map_err(|e| ImageHashError::Config(e.to_string()))?
                .progress_chars("█▓░"),
        );
        pb.set_message(format!("{}", hasher.kind()));
        pb
    };

    let report = find_identical_with_progress(&cli.directory, hasher.as_ref(), |done, total| {
        progress.set_length(total as u64);
        progress.set_position(done as u64);
    })?;
    progress.finish_and_clear();

    match cli.output {
        OutputFormat::Plain => print_plain_results(&report),
        OutputFormat::Json => print_json_results(&report)?,
    }

    if !report.failures.is_empty() && !cli.quiet {
        Term::stderr()
            .write_line(&format!(
                "{} {} of {} images could not be read",
                style("!").yellow().bold(),
                report.failures.len(),
                report.total_images
            ))
            .ok();
    }

    Ok(())
}

/// Print the synopsis to stderr and exit with status 1
fn usage() -> ! {
    let program = std::env::args()
        .next()
        .unwrap_or_else(|| "find-similar-images".to_string());

    let term = Term::stderr();
    term.write_line(&format!(
        "SYNOPSIS: {} [ahash|phash|dhash|...] [<directory>]",
        program
    ))
    .ok();
    term.write_line("").ok();
    term.write_line("Identifies similar images in the directory.").ok();
    term.write_line("").ok();
    term.write_line("Method: ").ok();
    for method in Method::value_variants() {
        if let Some(value) = method.to_possible_value() {
            term.write_line(&format!(
                "  {:<11} {}",
                format!("{}:", value.get_name()),
                value.get_help().map(|h| h.to_string()).unwrap_or_default()
            ))
            .ok();
        }
    }

    std::process::exit(1)
}

fn print_plain_results(report: &DuplicateReport) {
    for group in &report.groups {
        let line: Vec<String> = group
            .paths
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        println!("{}", line.join(" "));
    }
}

fn print_json_results(report: &DuplicateReport) -> Result<()> {
    let output =
        serde_json::to_string_pretty(report).map_err(|e| ImageHashError::Output(e.to_string()))?;
    println!("{}", output);
    Ok(())
}
