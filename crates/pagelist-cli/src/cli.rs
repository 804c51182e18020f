use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "pagelist",
    about = "Append to and inspect paged lists kept in a key-value state file",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// State snapshot file
    #[arg(long, global = true, default_value = "pagelist-state.json")]
    pub store: PathBuf,

    /// TOML list configuration (page_size, encoding)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the configured page size
    #[arg(long, global = true)]
    pub page_size: Option<u64>,

    /// Log debug output to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, colored
    Text,
    /// One JSON document per result
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Append one or more values
    Push(PushArgs),
    /// Show the element at an index
    Get(GetArgs),
    /// Show the last element
    Last(ListArgs),
    /// Show one page
    Page(PageArgs),
    /// Show the element count
    Len(ListArgs),
    /// Show a range of elements
    Range(RangeArgs),
    /// Show the metadata record
    Meta(ListArgs),
}

#[derive(Args)]
pub struct ListArgs {
    /// List identity
    pub list: String,
}

#[derive(Args)]
pub struct PushArgs {
    /// List identity
    pub list: String,
    /// Values to append, in order
    #[arg(required = true)]
    pub values: Vec<String>,
}

#[derive(Args)]
pub struct GetArgs {
    /// List identity
    pub list: String,
    /// Zero-based element index
    pub index: u64,
}

#[derive(Args)]
pub struct PageArgs {
    /// List identity
    pub list: String,
    /// Page number, starting at 1
    pub page: u64,
}

#[derive(Args)]
pub struct RangeArgs {
    /// List identity
    pub list: String,
    /// First index to show
    #[arg(default_value_t = 0)]
    pub start: u64,
    /// Exclusive end; omit for the end of the list
    pub end: Option<u64>,
}
