//! Defines the command-line interface for the application.

use bibcite_lib::split::{DEFAULT_INPUT, DEFAULT_OUT_DIR, DEFAULT_PUBLIC_COPY};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "bibcite",
    version,
    about = "Generate one BibTeX citation file per bibliography entry."
)]
pub struct Cli {
    /// Project root that relative paths are resolved against. [default: current directory]
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// The bibliography to split.
    #[arg(short, long, value_name = "FILE_PATH", default_value = DEFAULT_INPUT)]
    pub input: PathBuf,

    /// Directory receiving one `<key>.bib` file per entry.
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUT_DIR)]
    pub out_dir: PathBuf,

    /// Where to publish a verbatim copy of the full bibliography.
    #[arg(long, value_name = "FILE_PATH", default_value = DEFAULT_PUBLIC_COPY)]
    pub public_copy: PathBuf,

    /// Parse and report what would be generated without writing any file.
    #[arg(long)]
    pub dry_run: bool,
}
