use clap::Parser;
use std::env;
use std::path::PathBuf;
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

use csvsplit::run_split;

const MAPPING_FILENAME: &str = "mapping.csv";

/// Splits a csv file in parts of 797 records, replacing values of its first column.
#[derive(Parser)]
#[command(name = "csvsplit")]
#[command(version, about, long_about = None)]
struct Cli {
    /// CSV file to split
    input: PathBuf,

    /// CSV file with 'Find' and 'Replace' columns (default: mapping.csv next
    /// to this program, if present)
    #[arg(short, long)]
    mapping: Option<PathBuf>,
}

/// Looks for a mapping file sitting next to the executable.
fn discover_mapping() -> Option<PathBuf> {
    let exe = env::current_exe().ok()?;
    let candidate = exe.parent()?.join(MAPPING_FILENAME);

    if candidate.is_file() {
        Some(candidate)
    } else {
        None
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mapping = cli.mapping.or_else(|| {
        discover_mapping().map(|path| {
            info!(path = %path.display(), "Auto-detected {}", MAPPING_FILENAME);
            path
        })
    });

    match run_split(&cli.input, mapping.as_ref()) {
        Ok(summary) => {
            println!("{}", summary);
            println!("Saved in: {}", summary.output_dir.display());
        }
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}
