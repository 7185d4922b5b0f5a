use clap::{Args, Parser, Subcommand, ValueEnum};
use docsearch::engine::config::HighlightPolicy;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "Tony Kan, Ted Yu",
    version,
    about = "docsearch CLI - Search, highlight and navigate rendered manual pages from the command line.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Filter a page by a query and highlight every match.
    Search(SearchArgs),
    /// Replay a scripted user interaction against a page.
    Replay(ReplayArgs),
    /// List the sections, navigation links and anchors of a page.
    Inspect(InspectArgs),
}

/// Controller configuration shared by the commands that drive a page.
#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override how markers from earlier queries are treated.
    #[arg(long, value_enum, value_name = "POLICY")]
    pub highlight_policy: Option<PolicyArg>,

    /// Override the scroll offset past which the back-to-top button is shown.
    #[arg(long, value_name = "PIXELS")]
    pub back_to_top_threshold: Option<f64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S search.marker-class=hit
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyArg {
    Recompute,
    Retain,
}

impl From<PolicyArg> for HighlightPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Recompute => HighlightPolicy::Recompute,
            PolicyArg::Retain => HighlightPolicy::Retain,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Csv,
    Toml,
}

/// Arguments for the `search` subcommand.
#[derive(Args, Debug)]
pub struct SearchArgs {
    /// Path to the rendered HTML page.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// The text to search for. An empty query clears every highlight.
    #[arg(long, required = true, value_name = "TEXT", allow_hyphen_values = true)]
    pub query: String,

    /// Path for the highlighted page.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Path for the section report. Printed to stdout when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub report: Option<PathBuf>,

    /// Format of the section report.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Arguments for the `replay` subcommand.
#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Path to the rendered HTML page.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path to the interaction script in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub script: PathBuf,

    /// Path for the page as left by the interaction.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Location fragment the page is opened with (e.g. '#section-1').
    #[arg(long, value_name = "FRAGMENT", allow_hyphen_values = true)]
    pub fragment: Option<String>,

    /// Vertical scroll offset the page is opened at.
    #[arg(long, value_name = "PIXELS")]
    pub scroll_offset: Option<f64>,

    /// Document offset of an element, used when a link scrolls it into view.
    /// Can be used multiple times. Example: --layout section-2=1800
    #[arg(long = "layout", value_name = "ID=PIXELS")]
    pub layout: Vec<String>,

    /// Re-evaluate the active navigation link whenever the fragment changes.
    #[arg(long)]
    pub track_fragment_changes: bool,

    /// Format of the final state report.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Path to the rendered HTML page.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}
