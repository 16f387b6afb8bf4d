use crate::config::{DEFAULT_GAP_MULTIPLIER, DEFAULT_SESSION_GAP};
use anyhow::Result;
use clap::{Args, Parser};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "git-hours")]
#[command(about = "Estimate hours worked on a git repository from commit timestamps")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[arg(long, help = "Output as JSON")]
    pub json: bool,

    #[arg(long, short, help = "Log debug details to stderr (RUST_LOG overrides)")]
    pub verbose: bool,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, help = "Path to git repository")]
    pub repo: Option<PathBuf>,

    #[arg(
        long,
        help = "Count commits after this date or revision (RFC3339, YYYY-MM-DD, natural language, \
                or a ref) [default: first day of last month]"
    )]
    pub since: Option<String>,

    #[arg(
        long,
        help = "Count commits before this date or revision [default: last day of last month]"
    )]
    pub before: Option<String>,

    #[arg(long, help = "Author name pattern; separate several authors with commas")]
    pub author: Option<String>,

    #[arg(
        long,
        env = "GIT_HOURS_DURATION",
        default_value = DEFAULT_SESSION_GAP,
        help = "Session gap credited after an idle break (e.g. 1h, 45m)"
    )]
    pub duration: String,

    #[arg(
        long,
        default_value_t = DEFAULT_GAP_MULTIPLIER,
        help = "Gaps shorter than duration x multiplier count as continuous work"
    )]
    pub multiplier: u32,

    #[arg(long, help = "Print each commit with its elapsed time and contribution")]
    pub debug: bool,

    #[arg(long, help = "Show the list of active periods")]
    pub periods: bool,

    #[arg(long, help = "Include all branches in git log")]
    pub all: bool,

    #[arg(long, help = "Walk reflog entries in git log")]
    pub reflog: bool,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        crate::hours::exec(self.common, self.json)
    }
}
