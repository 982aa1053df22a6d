//! CLI argument definitions using clap.
//!
//! ```text
//! i18ngen <TEMPLATE_DIR> <RESOURCE_DIR> [ENCODING] [--keep-going] [--dry-run] [-v]
//! ```

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    /// Directory containing the templates (searched recursively)
    pub template_dir: PathBuf,

    /// Directory containing the messages_xx.properties files
    pub resource_dir: PathBuf,

    /// Character encoding of the templates (overrides config file)
    pub encoding: Option<String>,

    /// Skip templates that cannot be processed instead of aborting the run
    #[arg(long)]
    pub keep_going: bool,

    /// Process and report, but do not write any file
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}
