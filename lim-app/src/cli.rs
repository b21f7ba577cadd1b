use clap::{Parser, Subcommand};
use std::ops::Range;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "lim", version, about = "Plain-text notes with Wikipedia lookups")]
pub struct Cli {
    /// Config file (defaults: ./lim.yaml, then the user config dir)
    #[arg(long, global = true, env = "LIM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Mirror log events to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the summary for a topic
    Lookup {
        /// Emit {"found", "summary", "locator"} as JSON
        #[arg(long)]
        json: bool,
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
    /// Append the summary for a topic to a text file
    Insert {
        file: PathBuf,
        /// Use characters START..END of the file as the query
        #[arg(long, value_name = "START..END", value_parser = parse_selection, conflicts_with = "query")]
        select: Option<Range<usize>>,
        #[arg(required_unless_present = "select")]
        query: Vec<String>,
    },
    /// Create an empty document
    New {
        file: PathBuf,
        /// Replace a file that already has content
        #[arg(long)]
        force: bool,
    },
}

pub fn parse_selection(raw: &str) -> Result<Range<usize>, String> {
    let (start, end) = raw
        .split_once("..")
        .ok_or_else(|| format!("expected START..END, got {raw:?}"))?;
    let start: usize = start
        .trim()
        .parse()
        .map_err(|e| format!("bad selection start {start:?}: {e}"))?;
    let end: usize = end
        .trim()
        .parse()
        .map_err(|e| format!("bad selection end {end:?}: {e}"))?;
    if start > end {
        return Err(format!("selection start {start} is after end {end}"));
    }
    Ok(start..end)
}
