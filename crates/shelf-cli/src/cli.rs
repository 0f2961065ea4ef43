use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use shelf_types::RecordId;

#[derive(Parser)]
#[command(
    name = "shelf",
    about = "Shelf: file-backed record collections",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Collection path: a `.json` file, or a directory of per-note files
    #[arg(short, long, global = true)]
    pub store: Option<PathBuf>,

    /// TOML configuration file (defaults to ./shelf.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Add a note
    Add(AddArgs),
    /// Show one note
    Get(GetArgs),
    /// List notes
    List(ListArgs),
    /// Replace fields of a note
    Update(UpdateArgs),
    /// Delete a note
    Delete(DeleteArgs),
    /// Show collection layout and size
    Info,
}

#[derive(Args)]
pub struct AddArgs {
    #[arg(short, long)]
    pub title: String,
    #[arg(short, long, default_value = "")]
    pub body: String,
    #[arg(long = "tag")]
    pub tags: Vec<String>,
}

#[derive(Args)]
pub struct GetArgs {
    pub id: RecordId,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only notes carrying this tag
    #[arg(long)]
    pub tag: Option<String>,
    /// id, creationDate or modificationDate
    #[arg(long)]
    pub sort_by: Option<String>,
    /// asc or desc
    #[arg(long)]
    pub order: Option<String>,
}

#[derive(Args)]
pub struct UpdateArgs {
    pub id: RecordId,
    #[arg(short, long)]
    pub title: Option<String>,
    #[arg(short, long)]
    pub body: Option<String>,
    /// Replace the note's tags
    #[arg(long = "tag")]
    pub tags: Vec<String>,
    #[arg(long, conflicts_with = "tags")]
    pub clear_tags: bool,
}

#[derive(Args)]
pub struct DeleteArgs {
    pub id: RecordId,
}
