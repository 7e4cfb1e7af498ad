use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

#[derive(Debug, Parser)]
#[command(
    name = "quire",
    about = "A personal document catalog with content-addressed storage and trigram search"
)]
pub struct Cli {
    /// Override the XDG data directory
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a document file to the catalog
    Add(AddArgs),
    /// Retrieve a document by its identifier
    Get(GetArgs),
    /// Search the catalog with a free-text query
    Search(SearchArgs),
    /// Delete a document by its identifier
    Delete(DeleteArgs),
    /// List all documents in identifier order
    List(ListArgs),
    /// Save the catalog to a JSON backup file
    Save(BackupArgs),
    /// Load documents from a JSON backup file
    Load(BackupArgs),
    /// Show the data directory and document count
    Status(StatusArgs),
    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsArgs),
}

// -- Add --

#[derive(Debug, Parser)]
pub struct AddArgs {
    /// Path to the document file (must have an extension)
    pub path: PathBuf,

    /// Title of the document
    #[arg(short = 't', long)]
    pub title: String,

    /// Author of the document (repeatable)
    #[arg(short = 'a', long = "author", value_name = "AUTHOR")]
    pub authors: Vec<String>,

    /// Keyword for the document (repeatable)
    #[arg(short = 'k', long = "keyword", value_name = "KEYWORD")]
    pub keywords: Vec<String>,
}

// -- Get --

#[derive(Debug, Parser)]
pub struct GetArgs {
    /// Document identifier (decimal)
    pub id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Search --

#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// The search query
    pub query: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Output only document identifiers (one per line)
    #[arg(long)]
    pub ids: bool,
}

// -- Delete --

#[derive(Debug, Parser)]
pub struct DeleteArgs {
    /// Document identifier (decimal)
    pub id: String,
}

// -- List --

#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Save / Load --

#[derive(Debug, Parser)]
pub struct BackupArgs {
    /// Path of the backup file
    pub path: PathBuf,
}

// -- Status --

#[derive(Debug, Parser)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Completions --

#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsArgs {
    /// Generate shell completions and print to stdout.
    pub fn generate(&self) {
        let mut cmd = Cli::command();
        clap_complete::generate(
            self.shell,
            &mut cmd,
            "quire",
            &mut std::io::stdout(),
        );
    }
}
