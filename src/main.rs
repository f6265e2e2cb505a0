//! Command-line front end: `material-table <INPUT_DIR> [-o output.csv]`.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use material_table::convert::{convert_directory, ConvertOptions};
use material_table::observability::{CompositeObserver, ConversionObserver, FileObserver, TracingObserver};
use material_table::source::DEFAULT_PATTERN;
use material_table::ConversionError;

/// Flatten a directory of material definition JSON files into one CSV table.
#[derive(Debug, Parser)]
#[command(name = "material-table", version, about)]
struct Args {
    /// Directory containing the JSON documents (not searched recursively).
    input_dir: PathBuf,

    /// CSV file to write.
    #[arg(short, long, default_value = "output.csv")]
    output: PathBuf,

    /// Glob matched against file names in the input directory.
    #[arg(long, default_value = DEFAULT_PATTERN)]
    pattern: String,

    /// Also append diagnostics to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Only report errors.
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let level = if args.quiet { Level::ERROR } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();

    let mut observers: Vec<Arc<dyn ConversionObserver>> = vec![Arc::new(TracingObserver)];
    if let Some(log_file) = &args.log_file {
        observers.push(Arc::new(FileObserver::new(log_file)));
    }
    let options = ConvertOptions {
        pattern: args.pattern.clone(),
        observer: Some(Arc::new(CompositeObserver::new(observers))),
        ..Default::default()
    };

    match convert_directory(&args.input_dir, &args.output, &options) {
        Ok(report) => {
            println!("Data from JSON files written to {} ({report})", args.output.display());
            Ok(ExitCode::SUCCESS)
        }
        Err(ConversionError::NoRecords { .. }) => {
            println!("No valid JSON data found in the directory.");
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => Err(err).with_context(|| {
            format!(
                "failed to convert '{}' into '{}'",
                args.input_dir.display(),
                args.output.display()
            )
        }),
    }
}
