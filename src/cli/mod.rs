pub mod bootstrap;
pub mod init;
pub mod migrate;
pub mod publish;
pub mod serve;
pub mod story;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "breachpress")]
#[command(version)]
#[command(about = "Backend for a whistleblower journalism site", long_about = None)]
pub struct Cli {
    #[arg(short, long, default_value = "breachpress.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Scaffold a new site directory with a default config
    Init {
        #[arg(default_value = ".")]
        path: PathBuf,
        #[arg(long)]
        name: Option<String>,
    },
    /// Run the JSON API server
    Serve {
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
    /// Apply pending schema migrations
    Migrate,
    /// One-time idempotent setup: seed site chrome and the first operator
    Bootstrap {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        /// Read from BREACHPRESS_PASSWORD or prompted when omitted
        #[arg(long, env = "BREACHPRESS_PASSWORD")]
        password: Option<String>,
    },
    /// Review and promote visitor-submitted stories
    Story {
        #[command(subcommand)]
        command: StoryCommand,
    },
    /// Create an article directly, without going through a submission
    Publish {
        #[arg(long)]
        title: String,
        #[arg(long)]
        summary: String,
        /// Markdown file holding the article body
        #[arg(long)]
        body_file: PathBuf,
        #[arg(long, default_value = "")]
        category: String,
        #[arg(long)]
        author: Option<String>,
        #[arg(long)]
        meta_description: Option<String>,
        #[arg(long = "tag")]
        tags: Vec<String>,
        #[arg(long)]
        featured: bool,
        /// Store unpublished instead of going live immediately
        #[arg(long)]
        draft: bool,
    },
}

#[derive(Subcommand)]
pub enum StoryCommand {
    /// List submissions, pending ones only unless --all
    List {
        #[arg(long)]
        all: bool,
    },
    /// Publish a pending submission as an article
    Promote { slug: String },
}
