//! CLI argument parsing via clap.

use clap::Parser;
use riski::build_info;

/// Ask the RIS agent a question and follow its progress.
#[derive(Debug, Parser)]
#[command(
    name = "riski",
    version,
    long_version = build_info::LONG_VERSION,
    after_help = build_info::HELP_BUILD_METADATA
)]
pub struct Args {
    /// Question to ask. Read from stdin when omitted.
    pub question: Option<String>,

    /// Path to config file (default: ./riski.toml or ~/.config/riski/riski.toml).
    #[arg(short = 'c', long = "config")]
    pub config: Option<String>,

    /// Override agent base URL.
    #[arg(long = "base-url")]
    pub base_url: Option<String>,

    /// Print the final answer as JSON.
    #[arg(long = "json")]
    pub json: bool,

    /// Do not render progress on stderr.
    #[arg(short = 'q', long = "quiet")]
    pub quiet: bool,

    /// Disable color output.
    #[arg(long = "no-color")]
    pub no_color: bool,
}
