//! # seqwise-demo
//!
//! Lists the files of a directory, ordered by size, using seqwise queries.
//!
//! Try:
//!   seqwise-demo files .
//!   seqwise-demo files . --ascending --limit 5
//!   seqwise-demo files . --group-by-extension --format json
//!   RUST_LOG=seqwise=debug seqwise-demo files .

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use seqwise_demo::{
    list, render_listing, render_summary, scan, summarize, Format, ListOptions, SortOrder,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "seqwise-demo", version, about = "Query a directory listing")]
struct Cli {
    /// Log query evaluation to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the files of a directory by size
    Files(FilesArgs),
}

#[derive(Args)]
struct FilesArgs {
    /// Directory to list
    dir: PathBuf,

    /// Smallest files first
    #[arg(long, conflicts_with = "descending")]
    ascending: bool,

    /// Largest files first (the default)
    #[arg(long)]
    descending: bool,

    /// Show at most this many files
    #[arg(short, long)]
    limit: Option<usize>,

    /// Print one line per extension with file count and total size
    #[arg(long)]
    group_by_extension: bool,

    /// Output format
    #[arg(long, value_enum, env = "SEQWISE_FORMAT", default_value = "text")]
    format: Format,
}

impl FilesArgs {
    fn sort_order(&self) -> SortOrder {
        match (self.ascending, self.descending) {
            (true, false) => SortOrder::Ascending,
            (false, true) => SortOrder::Descending,
            _ => SortOrder::default(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Files(args) => run_files(args),
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run_files(args: FilesArgs) -> Result<()> {
    let entries = scan(&args.dir)?;

    let output = if args.group_by_extension {
        render_summary(&summarize(entries)?, args.format)?
    } else {
        let options = ListOptions {
            order: args.sort_order(),
            limit: args.limit,
        };
        render_listing(&list(entries, &options)?, args.format)?
    };

    print!("{output}");
    Ok(())
}
