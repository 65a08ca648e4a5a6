//! CLI argument definitions for Portal.

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "portal",
    version,
    about = "Pull reusable UI blocks into your project",
    long_about = "Portal fetches a block from a local directory or git repository, checks its \
                  dependencies against your package.json, installs what is missing and copies \
                  the block sources into src/."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Pull a block into the current project
    Pull {
        /// Local block directory or git url (e.g. https://github.com/org/blocks/tree/master/login)
        url: String,
        /// Route path the block is mounted at (defaults to /<block name>)
        #[arg(short, long)]
        path: Option<String>,
        /// Git branch to pull from
        #[arg(short, long)]
        branch: Option<String>,
        /// Package manager used to install missing dependencies
        #[arg(long)]
        npm_client: Option<String>,
        /// Check dependencies without installing or writing files
        #[arg(long)]
        dry_run: bool,
        /// Skip the dependency check and installation
        #[arg(long)]
        skip_dependencies: bool,
    },
}

pub fn parse() -> Cli {
    Cli::parse()
}
