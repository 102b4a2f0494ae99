use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "folio", about = "Folio -- multi-locale page store", version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file. A missing file means built-in defaults.
    #[arg(short, long, global = true, default_value = "folio.toml")]
    pub config: PathBuf,

    /// Locale to work in when a command is not given one explicitly.
    #[arg(long, global = true)]
    pub current_locale: Option<String>,

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
    /// Write the new-page template to the store
    Init(InitArgs),
    /// Create a page in the current locale
    Create(CreateArgs),
    /// Show a page by key or permalink
    Get(GetArgs),
    /// List pages, optionally filtered by title
    Search(SearchArgs),
    /// Print the content document of a page
    Content(ContentArgs),
    /// Replace the content document of a page from a JSON file
    SetContent(SetContentArgs),
    /// Delete one locale of a page, or the page itself
    Delete(DeleteArgs),
    /// Delete a page with all its locales and content
    Purge(KeyArgs),
    /// List the locales a page has
    Locales(KeyArgs),
}

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing template.
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct CreateArgs {
    pub permalink: String,
    #[arg(short, long)]
    pub title: String,
    #[arg(short, long, default_value = "")]
    pub description: String,
    #[arg(short, long, default_value = "")]
    pub keywords: String,
}

#[derive(Args)]
pub struct GetArgs {
    #[arg(long, conflicts_with = "permalink", required_unless_present = "permalink")]
    pub key: Option<String>,
    #[arg(long)]
    pub permalink: Option<String>,
    #[arg(short, long)]
    pub locale: Option<String>,
}

#[derive(Args)]
pub struct SearchArgs {
    pub pattern: Option<String>,
    #[arg(short, long)]
    pub locale: Option<String>,
}

#[derive(Args)]
pub struct ContentArgs {
    pub key: String,
    #[arg(short, long)]
    pub locale: Option<String>,
}

#[derive(Args)]
pub struct SetContentArgs {
    pub key: String,
    pub file: PathBuf,
    #[arg(short, long)]
    pub locale: Option<String>,
}

#[derive(Args)]
pub struct DeleteArgs {
    pub key: String,
    #[arg(short, long)]
    pub locale: Option<String>,
}

#[derive(Args)]
pub struct KeyArgs {
    pub key: String,
}
