use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use rust_pbir::batch::print_summary;
use rust_pbir::{export_metadata, rename_report_attributes, MetadataOptions, RenameOptions};

#[derive(Parser)]
#[command(name = "rust-pbir")]
#[command(author, version, about = "Bulk table and column renames for Power BI report definitions")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a CSV of table/column renames to every document of a report
    Rename {
        /// Root directory of the report definition
        #[arg(short, long)]
        report_dir: PathBuf,

        /// CSV file with columns old_tbl, old_col, new_tbl, new_col
        #[arg(short, long)]
        mapping: PathBuf,

        /// Glob pattern (relative to the report directory) of documents to skip
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Report what would change without writing any file
        #[arg(long)]
        dry_run: bool,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Export the tables, columns and measures used by reports to CSV
    Metadata {
        /// Directory containing one or more report definitions
        #[arg(short, long)]
        report_dir: PathBuf,

        /// Output path for the CSV file
        #[arg(short, long)]
        output: PathBuf,

        /// Enable verbose output
        #[arg(short, long)]
        verbose: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(default_level.into())
        .from_env_lossy();

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Rename {
            report_dir,
            mapping,
            exclude,
            dry_run,
            verbose,
        } => {
            init_logging(verbose);

            let options = RenameOptions {
                report_dir,
                mapping_path: mapping,
                exclude,
                dry_run,
            };

            let summary = rename_report_attributes(options)?;
            print_summary(&summary);

            if summary.has_failures() {
                bail!(
                    "{} document(s) could not be processed",
                    summary.failed_count()
                );
            }
        }
        Commands::Metadata {
            report_dir,
            output,
            verbose,
        } => {
            init_logging(verbose);

            let options = MetadataOptions {
                report_dir,
                output_path: output,
            };

            let rows = export_metadata(options)?;
            println!("Wrote {} metadata rows", rows);
        }
    }

    Ok(())
}
