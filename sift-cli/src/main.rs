//! Sift CLI
//!
//! Loads markup, runs one or more selectors against it and prints the
//! matches. Every selector after the first is a nested query inside the
//! previous result.

mod report;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use sift_common::logging::init_logging;
use sift_dom::{parse_markup, print_tree};
use sift_select::Selection;

use crate::report::MatchRecord;

#[derive(Debug, Parser)]
#[command(name = "sift", version, about = "Query markup with CSS-subset selectors")]
#[command(group(ArgGroup::new("source").required(true).args(["file", "html"])))]
struct Cli {
    /// Markup file to load.
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Inline markup instead of a file.
    #[arg(long)]
    html: Option<String>,

    /// Selectors; each one after the first searches inside the previous result.
    #[arg(required = true)]
    selectors: Vec<String>,

    /// Print matches as a JSON array.
    #[arg(long)]
    json: bool,

    /// Print the loaded document outline before the matches.
    #[arg(long)]
    tree: bool,

    /// Disable colored output.
    #[arg(long)]
    no_color: bool,

    /// Increase log verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, !cli.no_color);

    let markup = if let Some(path) = &cli.file {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?
    } else {
        cli.html.clone().context("no markup given; pass --file or --html")?
    };

    let tree = parse_markup(&markup).context("failed to load markup")?;
    tracing::info!(nodes = tree.len(), "loaded document");

    if cli.tree {
        println!("=== Document ===");
        print_tree(&tree, tree.root());
        println!();
    }

    let (first, rest) = cli
        .selectors
        .split_first()
        .context("at least one selector is required")?;
    let mut selection = Selection::select(&tree, first)
        .with_context(|| format!("invalid selector `{first}`"))?;
    for selector in rest {
        selection = selection
            .find(selector)
            .with_context(|| format!("invalid selector `{selector}`"))?;
    }

    let records: Vec<MatchRecord> = selection
        .iter()
        .enumerate()
        .filter_map(|(index, node)| MatchRecord::new(&tree, index, node))
        .collect();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        for record in &records {
            println!("{}", record.to_line(!cli.no_color));
        }
        println!("{} match(es)", records.len());
    }

    Ok(())
}
