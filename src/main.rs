use anyhow::{Context, Result};
use bcs_extractor::{
    extract_dir, extract_file, format_dir, format_file, ExtractOptions, FormatOptions, Outcome,
};
use clap::{Parser, Subcommand};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "bcs-extractor")]
#[command(about = "Extract and reflow CSV scripts from BCS containers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract .csv scripts from .bcs files. Extracts from every
    /// recognizable .bcs file if given a directory.
    Extract {
        /// File or directory containing .bcs files
        input: PathBuf,

        /// Output directory. Defaults to the current working directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite existing files in the output path
        #[arg(long)]
        overwrite: bool,

        /// Print more details
        #[arg(short, long)]
        verbose: bool,
    },

    /// Format .csv scripts for word wrapping purposes. Works on every
    /// .csv file if given a directory.
    Format {
        /// File or directory containing .csv files
        input: PathBuf,

        /// Output directory. Defaults to the current working directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite existing files in the output path
        #[arg(long)]
        overwrite: bool,

        /// Print more details
        #[arg(short, long)]
        verbose: bool,

        /// Keep the old newlines (\n) in the file, otherwise they are
        /// removed before formatting
        #[arg(long)]
        keep_newlines: bool,

        /// Number of characters in a row until it should wrap
        #[arg(short = 'w', long, default_value_t = 50)]
        wrap_length: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Extract {
            input,
            output,
            overwrite,
            verbose,
        } => {
            let out_dir = resolve_output(output)?;
            let opts = ExtractOptions { overwrite };
            run_batch(
                &input,
                verbose,
                |path| extract_file(path, &out_dir, &opts),
                |path| extract_dir(path, &out_dir, &opts),
            )
        }
        Commands::Format {
            input,
            output,
            overwrite,
            verbose,
            keep_newlines,
            wrap_length,
        } => {
            let out_dir = resolve_output(output)?;
            let opts = FormatOptions {
                overwrite,
                keep_newlines,
                wrap_length,
            };
            run_batch(
                &input,
                verbose,
                |path| format_file(path, &out_dir, &opts),
                |path| format_dir(path, &out_dir, &opts),
            )
        }
    }
}

/// Create the output directory if given, otherwise use the current one.
fn resolve_output(output: Option<PathBuf>) -> Result<PathBuf> {
    match output {
        Some(dir) => {
            fs::create_dir_all(&dir)
                .with_context(|| format!("cannot create output directory {}", dir.display()))?;
            Ok(dir)
        }
        None => env::current_dir().context("cannot determine current directory"),
    }
}

/// Run one operation over a file or every file of a directory.
///
/// Per-file failures are reported and counted but never abort the batch;
/// the process exits nonzero only if at least one file actually failed.
fn run_batch<F, D>(input: &Path, verbose: bool, on_file: F, on_dir: D) -> Result<()>
where
    F: Fn(&Path) -> bcs_extractor::Result<Outcome>,
    D: Fn(&Path) -> bcs_extractor::Result<Vec<(PathBuf, bcs_extractor::Result<Outcome>)>>,
{
    let meta =
        fs::metadata(input).with_context(|| format!("cannot read input {}", input.display()))?;

    let results = if meta.is_dir() {
        on_dir(input).with_context(|| format!("cannot list {}", input.display()))?
    } else {
        vec![(input.to_path_buf(), on_file(input))]
    };

    let mut failures = 0;
    for (path, result) in results {
        report(&path, &result, verbose);
        if result.is_err() {
            failures += 1;
        }
    }
    if failures > 0 {
        anyhow::bail!("{failures} file(s) failed");
    }
    Ok(())
}

fn report(path: &Path, result: &bcs_extractor::Result<Outcome>, verbose: bool) {
    match result {
        Ok(Outcome::Written(dest)) => {
            if verbose {
                println!("Finished {} -> {}", path.display(), dest.display());
            }
        }
        Ok(Outcome::AlreadyExists(dest)) => {
            println!(
                "Skipping {} because {} already exists",
                path.display(),
                dest.display()
            );
        }
        Ok(Outcome::NotRecognized) => {
            if verbose {
                println!(
                    "Skipping {} because it is not a recognized input",
                    path.display()
                );
            }
        }
        Ok(Outcome::NoTextColumn) => {
            if verbose {
                println!("Skipping {} because it has no text field", path.display());
            }
        }
        Err(e) => {
            eprintln!("Failed on {}: {}", path.display(), e);
        }
    }
}
